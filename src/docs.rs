// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Reviews ---
        handlers::reviews::list_reviews,
        handlers::reviews::update_status,
        handlers::reviews::analyze_sentiment,
        handlers::reviews::generate_social_card,

        // --- Public ---
        handlers::public::get_business,
        handlers::public::submit_review,

        // --- Widget ---
        handlers::widget::get_widget_data,
        handlers::widget::render_widget,
        handlers::widget::get_embed_info,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::settings::upload_logo,

        // --- Billing ---
        handlers::billing::get_billing,
        handlers::billing::change_plan,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::SignupPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Business ---
            models::business::PlanTier,
            models::business::Business,
            models::business::PublicBusiness,
            models::business::UpdateSettingsRequest,
            models::business::LogoUploadResponse,

            // --- Reviews ---
            models::review::ReviewStatus,
            models::review::SentimentLabel,
            models::review::Sentiment,
            models::review::Review,
            models::review::StatusFilter,
            models::review::UpdateStatusPayload,
            models::review::SentimentOutcome,

            // --- Social cards ---
            models::social_card::SocialPlatform,
            models::social_card::GenerateCardPayload,

            // --- Public ---
            models::intake::ReviewSubmissionForm,
            models::intake::ShareLink,
            models::intake::ThankYouResponse,

            // --- Widget ---
            models::widget::WidgetView,
            models::widget::WidgetReview,
            models::widget::EmbedInfo,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Billing ---
            models::billing::PlanInfo,
            models::billing::BillingOverview,
            models::billing::ChangePlanPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e sessão"),
        (name = "Reviews", description = "Moderação, sentimento e social cards"),
        (name = "Public", description = "Página pública de coleta de reviews"),
        (name = "Widget", description = "Widget incorporável e código de embed"),
        (name = "Dashboard", description = "Resumo do painel"),
        (name = "Settings", description = "Perfil do negócio"),
        (name = "Billing", description = "Planos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
