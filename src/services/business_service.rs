// src/services/business_service.rs

use std::sync::Arc;

use bytes::Bytes;
use qrcode::{render::svg, QrCode};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::BusinessStore,
    models::{
        billing::{BillingOverview, PlanInfo},
        business::{Business, PlanTier, UpdateSettingsRequest},
        widget::EmbedInfo,
    },
    services::{
        intake_service::collection_url,
        storage::{image_extension, BlobStorage, UploadOptions, BUSINESS_LOGOS_BUCKET},
    },
};

pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

fn plan(key: PlanTier, name: &str, price: &str, period: &str, features: &[&str], popular: bool) -> PlanInfo {
    PlanInfo {
        key,
        name: name.to_string(),
        price: price.to_string(),
        period: period.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        popular,
    }
}

/// Catálogo fixo exibido na página de planos.
pub fn plan_catalog() -> Vec<PlanInfo> {
    vec![
        plan(
            PlanTier::Free,
            "Free",
            "$0",
            "forever",
            &["10 reviews per month", "Basic widget", "Email support", "ProofViral branding"],
            false,
        ),
        plan(
            PlanTier::Pro,
            "Pro",
            "$49",
            "per month",
            &[
                "Unlimited reviews",
                "AI sentiment analysis",
                "Social card generator",
                "Custom branding",
                "Advanced analytics",
                "Priority support",
            ],
            true,
        ),
        plan(
            PlanTier::Enterprise,
            "Enterprise",
            "$99",
            "per month",
            &[
                "Everything in Pro",
                "White-label solution",
                "API access",
                "Custom integrations",
                "Dedicated account manager",
                "99.9% SLA",
            ],
            false,
        ),
    ]
}

/// Snippet colado no site do cliente: container + loader.
pub fn embed_code(base_url: &str, widget_id: &str) -> String {
    format!(
        "<!-- ProofViral Review Widget -->\n\
         <div id=\"proofviral-widget-{widget_id}\"></div>\n\
         <script src=\"{base_url}/widget.js\" data-widget-id=\"{widget_id}\" async></script>"
    )
}

#[derive(Clone)]
pub struct BusinessService {
    businesses: Arc<dyn BusinessStore>,
    storage: Arc<dyn BlobStorage>,
    public_base_url: String,
}

impl BusinessService {
    pub fn new(businesses: Arc<dyn BusinessStore>, storage: Arc<dyn BlobStorage>, public_base_url: String) -> Self {
        Self {
            businesses,
            storage,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn update_settings(
        &self,
        business_id: uuid::Uuid,
        mut input: UpdateSettingsRequest,
    ) -> Result<Business, AppError> {
        input.validate()?;

        // Logo em branco = sem logo
        input.logo_url = input
            .logo_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        self.businesses.update_profile(business_id, &input).await
    }

    /// Sobe o logo (sobrescrevendo o anterior) e grava a URL pública.
    pub async fn upload_logo(&self, business: &Business, data: Bytes) -> Result<String, AppError> {
        if data.len() > MAX_LOGO_BYTES {
            return Err(AppError::LogoTooLarge);
        }
        let extension = image_extension(&data)?;
        let path = format!("{}/logo.{}", business.id, extension);

        self.storage
            .upload(BUSINESS_LOGOS_BUCKET, &path, data, UploadOptions { upsert: true })
            .await?;

        let logo_url = self.storage.public_url(BUSINESS_LOGOS_BUCKET, &path);
        self.businesses.update_logo(business.id, &logo_url).await?;

        tracing::info!(business_id = %business.id, "🖼️ Logo atualizado");
        Ok(logo_url)
    }

    pub fn billing(&self, business: &Business) -> BillingOverview {
        BillingOverview {
            current_plan: business.plan,
            plans: plan_catalog(),
            payment_provider_enabled: false,
        }
    }

    // Sem cobrança: só troca o campo
    pub async fn change_plan(&self, business: &Business, plan: PlanTier) -> Result<BillingOverview, AppError> {
        let business = self.businesses.update_plan(business.id, plan).await?;
        tracing::info!(business_id = %business.id, plan = ?business.plan, "💳 Plano alterado");
        Ok(self.billing(&business))
    }

    pub fn embed_info(&self, business: &Business) -> Result<EmbedInfo, AppError> {
        let collection_url = collection_url(&self.public_base_url, &business.widget_id);

        let code = QrCode::new(collection_url.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        let collection_qr_svg = code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .build();

        Ok(EmbedInfo {
            widget_id: business.widget_id.clone(),
            widget_url: format!("{}/widget/{}", self.public_base_url, business.widget_id),
            embed_code: embed_code(&self.public_base_url, &business.widget_id),
            collection_url,
            collection_qr_svg,
        })
    }
}
