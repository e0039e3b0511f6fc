// src/models/widget.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::review::Review;

/// Estado renderizável do widget público. Sem negócio ou sem reviews, `reviews` vem vazio.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub widget_id: String,
    pub business_name: Option<String>,
    pub logo_url: Option<String>,
    pub reviews: Vec<WidgetReview>,
    pub review_count: usize,
    #[schema(example = "5 out of 5 stars • 3 reviews")]
    pub summary: String,
    // Setas anterior/próxima só aparecem com mais de uma review
    pub show_controls: bool,
    #[schema(example = 5000)]
    pub rotation_interval_ms: u64,
    pub cta_url: String,
    pub powered_by_url: String,
}

impl WidgetView {
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Índice da review exibida. Com `count > 0` vale sempre `0 <= index < count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    count: usize,
}

impl Carousel {
    pub fn at(index: usize, count: usize) -> Self {
        let index = if count == 0 { 0 } else { index % count };
        Self { index, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    // O timer avança igual ao botão "próxima"
    pub fn next(&mut self) -> usize {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
        self.index
    }

    pub fn previous(&mut self) -> usize {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
        self.index
    }
}

// Só o que é seguro expor publicamente (sem e-mail do cliente)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetReview {
    pub customer_name: String,
    pub review_text: String,
    pub photo_url: Option<String>,
    #[schema(example = "2025-03-01")]
    pub date: String,
    // Posição no carrossel e vizinhos (com volta nas duas pontas)
    pub index: usize,
    pub next: usize,
    pub previous: usize,
}

impl WidgetReview {
    pub fn new(review: &Review, slide: Carousel) -> Self {
        let mut forward = slide;
        let mut backward = slide;
        Self {
            customer_name: review.customer_name.clone(),
            review_text: review.review_text.clone(),
            photo_url: review.photo_url.clone(),
            date: review.created_at.format("%Y-%m-%d").to_string(),
            index: slide.index(),
            next: forward.next(),
            previous: backward.previous(),
        }
    }

    pub fn photo(&self) -> &str {
        self.photo_url.as_deref().unwrap_or_default()
    }
}

// Página "Widget" do painel: link de coleta + código de incorporação
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbedInfo {
    pub widget_id: String,
    pub collection_url: String,
    pub widget_url: String,
    pub embed_code: String,
    // QR code do link de coleta, em SVG
    pub collection_qr_svg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_wraps_both_ways() {
        let mut carousel = Carousel::at(0, 3);
        assert_eq!(carousel.previous(), 2);
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.next(), 1);
        assert_eq!(carousel.next(), 2);
        assert_eq!(carousel.next(), 0);
    }

    #[test]
    fn carousel_index_stays_in_range() {
        let mut carousel = Carousel::at(0, 4);
        let steps = [1, -1, -1, 1, 1, 1, 1, -1, 1, -1, -1, -1, 1];
        for step in steps {
            let index = if step > 0 { carousel.next() } else { carousel.previous() };
            assert!(index < 4);
            assert_eq!(index, carousel.index());
        }
    }

    #[test]
    fn carousel_rebases_out_of_range_index() {
        assert_eq!(Carousel::at(7, 3).index(), 1);
        assert_eq!(Carousel::at(5, 0).index(), 0);
    }

    #[test]
    fn empty_carousel_stays_at_zero() {
        let mut carousel = Carousel::at(0, 0);
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.previous(), 0);
    }
}
