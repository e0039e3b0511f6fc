// src/models/intake.rs

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::business::PublicBusiness;

/// Formulário público já extraído do multipart.
#[derive(Debug, Clone, Default, Validate)]
pub struct ReviewSubmission {
    #[validate(length(min = 1, message = "required"))]
    pub customer_name: String,
    #[validate(email(message = "invalid_email"))]
    pub customer_email: String,
    // Ausente ou 0 = cliente não escolheu estrelas
    pub rating: Option<i32>,
    #[validate(length(min = 1, message = "required"))]
    pub review_text: String,
    pub photo: Option<Bytes>,
}

// Documenta o corpo multipart no Swagger
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmissionForm {
    #[schema(example = "John Doe")]
    pub customer_name: String,
    #[schema(example = "john@example.com")]
    pub customer_email: String,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    #[schema(example = "Atendimento excelente!")]
    pub review_text: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    #[schema(example = "twitter")]
    pub platform: &'static str,
    pub url: String,
    #[schema(example = 600)]
    pub popup_width: u32,
    #[schema(example = 400)]
    pub popup_height: u32,
}

// Tela de agradecimento após o envio
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouResponse {
    pub message: String,
    pub business: PublicBusiness,
    pub share_text: String,
    pub share_links: Vec<ShareLink>,
}
