// src/services/intake_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{BusinessStore, ReviewStore},
    models::{
        business::{Business, PublicBusiness},
        intake::{ReviewSubmission, ShareLink, ThankYouResponse},
        review::{NewReview, Review},
    },
    services::storage::{image_extension, BlobStorage, UploadOptions, REVIEW_PHOTOS_BUCKET},
};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
const SHARE_POPUP: (u32, u32) = (600, 400);

/// Página pública de coleta de um negócio.
pub fn collection_url(base_url: &str, widget_id: &str) -> String {
    format!("{}/review/{}", base_url.trim_end_matches('/'), widget_id)
}

pub fn share_text(business_name: &str) -> String {
    format!("I just left a review for {business_name}!")
}

pub fn share_links(text: &str, url: &str) -> Vec<ShareLink> {
    let text = urlencoding::encode(text);
    let url = urlencoding::encode(url);
    let (popup_width, popup_height) = SHARE_POPUP;

    [
        ("twitter", format!("https://twitter.com/intent/tweet?text={text}&url={url}")),
        ("facebook", format!("https://www.facebook.com/sharer/sharer.php?u={url}")),
        ("linkedin", format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")),
    ]
    .into_iter()
    .map(|(platform, url)| ShareLink { platform, url, popup_width, popup_height })
    .collect()
}

/// Tudo que pode ser checado sem tocar em banco ou storage.
pub fn validate_submission(submission: &ReviewSubmission) -> Result<(), AppError> {
    match submission.rating {
        None | Some(0) => return Err(AppError::RatingRequired),
        Some(rating) if !(1..=5).contains(&rating) => return Err(AppError::RatingOutOfRange),
        Some(_) => {}
    }

    submission.validate()?;

    if let Some(photo) = &submission.photo {
        if photo.len() > MAX_PHOTO_BYTES {
            return Err(AppError::PhotoTooLarge);
        }
        image_extension(photo)?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct IntakeService {
    businesses: Arc<dyn BusinessStore>,
    reviews: Arc<dyn ReviewStore>,
    storage: Arc<dyn BlobStorage>,
    public_base_url: String,
}

impl IntakeService {
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        reviews: Arc<dyn ReviewStore>,
        storage: Arc<dyn BlobStorage>,
        public_base_url: String,
    ) -> Self {
        Self { businesses, reviews, storage, public_base_url }
    }

    async fn resolve(&self, widget_id: &str) -> Result<Business, AppError> {
        self.businesses
            .find_by_widget_id(widget_id)
            .await?
            .ok_or(AppError::BusinessNotFound)
    }

    pub async fn public_profile(&self, widget_id: &str) -> Result<PublicBusiness, AppError> {
        let business = self.resolve(widget_id).await?;
        Ok(PublicBusiness::from(&business))
    }

    /// Valida, guarda a foto (se houver) e grava a review como `pending`.
    pub async fn submit(
        &self,
        widget_id: &str,
        submission: ReviewSubmission,
    ) -> Result<(Business, Review), AppError> {
        // 1. Validação antes de qualquer colaborador
        validate_submission(&submission)?;
        let rating = submission.rating.ok_or(AppError::RatingRequired)?;

        // 2. Negócio dono do link
        let business = self.resolve(widget_id).await?;

        // 3. Foto: falha no upload não impede a review
        let photo_url = match submission.photo {
            Some(photo) => self.store_photo(&business, photo).await,
            None => None,
        };

        // 4. Sempre entra como pendente
        let review = self
            .reviews
            .insert(NewReview {
                business_id: business.id,
                customer_name: submission.customer_name,
                customer_email: submission.customer_email,
                rating,
                review_text: submission.review_text,
                photo_url,
            })
            .await?;

        tracing::info!(business_id = %business.id, review_id = %review.id, "⭐ Nova review recebida");
        Ok((business, review))
    }

    pub fn thank_you(&self, business: &Business, message: String) -> ThankYouResponse {
        let text = share_text(&business.business_name);
        let url = collection_url(&self.public_base_url, &business.widget_id);
        ThankYouResponse {
            message,
            business: PublicBusiness::from(business),
            share_links: share_links(&text, &url),
            share_text: text,
        }
    }

    async fn store_photo(&self, business: &Business, photo: bytes::Bytes) -> Option<String> {
        // Já validado; aqui só recupera a extensão
        let extension = image_extension(&photo).ok()?;
        // Sufixo aleatório: dois envios no mesmo milissegundo não colidem
        let path = format!(
            "{}/{}-{}.{}",
            business.id,
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            extension
        );

        match self
            .storage
            .upload(REVIEW_PHOTOS_BUCKET, &path, photo, UploadOptions::default())
            .await
        {
            Ok(()) => Some(self.storage.public_url(REVIEW_PHOTOS_BUCKET, &path)),
            Err(e) => {
                tracing::warn!(business_id = %business.id, "⚠️ Falha no upload da foto, seguindo sem ela: {}", e);
                None
            }
        }
    }
}
