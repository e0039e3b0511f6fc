// src/services/social_card.rs

use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessStore, ReviewStore, SocialCardStore},
    models::{
        business::Business,
        review::Review,
        social_card::{NewSocialCard, SocialPlatform},
    },
    services::storage::{BlobStorage, UploadOptions, SOCIAL_CARDS_BUCKET},
};

pub const CAPTION_LIMIT: usize = 200;
const DEVICE_SCALE_FACTOR: u32 = 2;

/// Converte um documento HTML de tamanho fixo em PNG.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardRasterizer: Send + Sync {
    async fn render(&self, html: &str, width: u32, height: u32) -> Result<Bytes, AppError>;
}

#[derive(Template)]
#[template(path = "social_card.html")]
pub struct CardDocument {
    pub width: u32,
    pub height: u32,
    pub stars: String,
    pub caption: String,
    pub customer_name: String,
    pub business_name: String,
    pub logo_url: Option<String>,
}

impl CardDocument {
    pub fn new(review: &Review, business: &Business, platform: SocialPlatform) -> Self {
        let (width, height) = platform.dimensions();
        Self {
            width,
            height,
            stars: stars(review.rating),
            caption: truncate_caption(&review.review_text),
            customer_name: review.customer_name.clone(),
            business_name: business.business_name.clone(),
            logo_url: business.logo_url.clone(),
        }
    }

    // Vazio quando o negócio não tem logo
    pub fn logo(&self) -> &str {
        self.logo_url.as_deref().unwrap_or_default()
    }
}

/// `rating` estrelas cheias seguidas das vazias, sempre cinco no total.
pub fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

// Conta caracteres, não bytes
pub fn truncate_caption(text: &str) -> String {
    if text.chars().count() <= CAPTION_LIMIT {
        return text.to_string();
    }
    let head: String = text.chars().take(CAPTION_LIMIT).collect();
    format!("{head}...")
}

pub fn attachment_filename(review_id: Uuid) -> String {
    format!("review-{review_id}-social-card.png")
}

// --- Rasterizador HTTP ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    html: &'a str,
    width: u32,
    height: u32,
    device_scale_factor: u32,
}

#[derive(Clone)]
pub struct HttpCardRasterizer {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCardRasterizer {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl CardRasterizer for HttpCardRasterizer {
    async fn render(&self, html: &str, width: u32, height: u32) -> Result<Bytes, AppError> {
        let request = RenderRequest {
            html,
            width,
            height,
            device_scale_factor: DEVICE_SCALE_FACTOR,
        };

        self.http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::CardGenerationFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::CardGenerationFailed(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| AppError::CardGenerationFailed(e.to_string()))
    }
}

// --- Serviço ---

#[derive(Clone)]
pub struct SocialCardService {
    reviews: Arc<dyn ReviewStore>,
    businesses: Arc<dyn BusinessStore>,
    cards: Arc<dyn SocialCardStore>,
    storage: Arc<dyn BlobStorage>,
    rasterizer: Arc<dyn CardRasterizer>,
}

impl SocialCardService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        businesses: Arc<dyn BusinessStore>,
        cards: Arc<dyn SocialCardStore>,
        storage: Arc<dyn BlobStorage>,
        rasterizer: Arc<dyn CardRasterizer>,
    ) -> Self {
        Self { reviews, businesses, cards, storage, rasterizer }
    }

    /// Gera o PNG do card. O registro em `social_cards` é feito depois, sem afetar a resposta.
    pub async fn generate(
        &self,
        business: &Business,
        review_id: Uuid,
        platform: SocialPlatform,
    ) -> Result<Bytes, AppError> {
        let review = self
            .reviews
            .find(business.id, review_id)
            .await?
            .ok_or(AppError::ReviewNotFound)?;

        // O logo pode ter mudado desde o login
        let business = self
            .businesses
            .find_by_user(business.user_id)
            .await?
            .unwrap_or_else(|| business.clone());

        let document = CardDocument::new(&review, &business, platform);
        let html = document.render()?;

        let png = self
            .rasterizer
            .render(&html, document.width, document.height)
            .await?;

        match image::guess_format(&png) {
            Ok(image::ImageFormat::Png) => Ok(png),
            _ => Err(AppError::CardGenerationFailed(
                "o rasterizador não devolveu um PNG".into(),
            )),
        }
    }

    /// Guarda o PNG e grava a linha em `social_cards`. Falhas só vão para o log.
    pub async fn record(&self, review_id: Uuid, platform: SocialPlatform, png: Bytes) {
        let path = format!("{}/{}.png", review_id, Utc::now().timestamp_millis());

        if let Err(e) = self
            .storage
            .upload(SOCIAL_CARDS_BUCKET, &path, png, UploadOptions::default())
            .await
        {
            tracing::warn!(%review_id, "⚠️ Falha ao guardar o social card: {}", e);
            return;
        }

        let card = NewSocialCard {
            review_id,
            card_url: self.storage.public_url(SOCIAL_CARDS_BUCKET, &path),
            platform,
        };

        if let Err(e) = self.cards.insert(card).await {
            tracing::warn!(%review_id, "⚠️ Falha ao registrar o social card: {}", e);
        }
    }
}
