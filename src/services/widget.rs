// src/services/widget.rs

use std::{sync::Arc, time::Duration};

use askama::Template;

use crate::{
    common::error::AppError,
    db::{BusinessStore, ReviewStore},
    models::{
        business::Business,
        review::{Review, ReviewQuery},
        widget::{Carousel, WidgetReview, WidgetView},
    },
    services::intake_service::collection_url,
};

pub const MAX_WIDGET_REVIEWS: i64 = 10;
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(5000);
const POWERED_BY_URL: &str = "https://proofviral.com";

pub fn summary_line(count: usize) -> String {
    let noun = if count == 1 { "review" } else { "reviews" };
    format!("5 out of 5 stars • {count} {noun}")
}

#[derive(Clone)]
pub struct WidgetService {
    businesses: Arc<dyn BusinessStore>,
    reviews: Arc<dyn ReviewStore>,
    public_base_url: String,
}

impl WidgetService {
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        reviews: Arc<dyn ReviewStore>,
        public_base_url: String,
    ) -> Self {
        Self { businesses, reviews, public_base_url }
    }

    /// Nunca falha: token desconhecido, zero reviews ou erro de banco viram o estado vazio.
    pub async fn load(&self, widget_id: &str) -> WidgetView {
        match self.fetch(widget_id).await {
            Ok(Some((business, reviews))) => self.view(widget_id, Some(&business), &reviews),
            Ok(None) => self.view(widget_id, None, &[]),
            Err(e) => {
                tracing::warn!(widget_id, "⚠️ Falha ao carregar o widget: {}", e);
                self.view(widget_id, None, &[])
            }
        }
    }

    async fn fetch(&self, widget_id: &str) -> Result<Option<(Business, Vec<Review>)>, AppError> {
        let Some(business) = self.businesses.find_by_widget_id(widget_id).await? else {
            return Ok(None);
        };
        let reviews = self
            .reviews
            .list(business.id, ReviewQuery::showcase(MAX_WIDGET_REVIEWS))
            .await?;
        Ok(Some((business, reviews)))
    }

    fn view(&self, widget_id: &str, business: Option<&Business>, reviews: &[Review]) -> WidgetView {
        let count = reviews.len();
        let reviews: Vec<WidgetReview> = reviews
            .iter()
            .enumerate()
            .map(|(index, review)| WidgetReview::new(review, Carousel::at(index, count)))
            .collect();

        WidgetView {
            widget_id: widget_id.to_string(),
            business_name: business.map(|b| b.business_name.clone()),
            logo_url: business.and_then(|b| b.logo_url.clone()),
            review_count: count,
            summary: summary_line(count),
            show_controls: count > 1,
            rotation_interval_ms: ROTATION_INTERVAL.as_millis() as u64,
            cta_url: collection_url(&self.public_base_url, widget_id),
            powered_by_url: POWERED_BY_URL.to_string(),
            reviews,
        }
    }
}

/// Fragmento HTML servido em `/widget/{id}` (pensado para iframe).
#[derive(Template)]
#[template(path = "widget.html")]
pub struct WidgetPage<'a> {
    pub view: &'a WidgetView,
}

impl WidgetPage<'_> {
    pub fn logo(&self) -> &str {
        self.view.logo_url.as_deref().unwrap_or_default()
    }

    pub fn business_name(&self) -> &str {
        self.view.business_name.as_deref().unwrap_or_default()
    }
}

pub fn render_page(view: &WidgetView) -> Result<String, AppError> {
    Ok(WidgetPage { view }.render()?)
}
