// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{BusinessRepository, BusinessStore, ReviewRepository, ReviewStore, SocialCardRepository, SocialCardStore, UserRepository, UserStore},
    services::{
        auth::AuthService,
        business_service::BusinessService,
        dashboard_service::DashboardService,
        intake_service::IntakeService,
        review_service::ReviewService,
        sentiment::{AnthropicClient, SentimentAnalyzer},
        social_card::{CardRasterizer, HttpCardRasterizer, SocialCardService},
        storage::{BlobStorage, LocalBlobStorage},
        widget::WidgetService,
    },
};

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub public_base_url: String,
    pub storage_root: PathBuf,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_base_url: String,
    pub rasterizer_url: String,
    pub db_max_connections: u32,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let anthropic_max_tokens = var_or("ANTHROPIC_MAX_TOKENS", "1024")
            .parse()
            .context("ANTHROPIC_MAX_TOKENS deve ser um número")?;
        let db_max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse()
            .context("DB_MAX_CONNECTIONS deve ser um número")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            storage_root: PathBuf::from(var_or("STORAGE_ROOT", "./storage")),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok().filter(|key| !key.is_empty()),
            anthropic_model: var_or("ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022"),
            anthropic_max_tokens,
            anthropic_base_url: var_or("ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
            rasterizer_url: var_or("RASTERIZER_URL", "http://localhost:9000/render"),
            db_max_connections,
        })
    }
}

/// Stores e colaboradores externos. Em produção: Postgres, disco local e HTTP.
pub struct Backends {
    pub users: Arc<dyn UserStore>,
    pub businesses: Arc<dyn BusinessStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub social_cards: Arc<dyn SocialCardStore>,
    pub storage: Arc<dyn BlobStorage>,
    pub analyzer: Arc<dyn SentimentAnalyzer>,
    pub rasterizer: Arc<dyn CardRasterizer>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub review_service: ReviewService,
    pub social_card_service: SocialCardService,
    pub intake_service: IntakeService,
    pub widget_service: WidgetService,
    pub dashboard_service: DashboardService,
    pub business_service: BusinessService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<(Self, PgPool)> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let backends = Backends {
            users: Arc::new(UserRepository::new(db_pool.clone())),
            businesses: Arc::new(BusinessRepository::new(db_pool.clone())),
            reviews: Arc::new(ReviewRepository::new(db_pool.clone())),
            social_cards: Arc::new(SocialCardRepository::new(db_pool.clone())),
            storage: Arc::new(LocalBlobStorage::new(config.storage_root.clone(), &config.public_base_url)),
            analyzer: Arc::new(AnthropicClient::new(
                &config.anthropic_base_url,
                config.anthropic_api_key.clone(),
                &config.anthropic_model,
                config.anthropic_max_tokens,
            )),
            rasterizer: Arc::new(HttpCardRasterizer::new(&config.rasterizer_url)),
        };

        if config.anthropic_api_key.is_none() {
            tracing::warn!("⚠️ ANTHROPIC_API_KEY ausente: a análise de sentimento vai falhar");
        }

        let state = Self::with_backends(config, backends)?;
        Ok((state, db_pool))
    }

    pub fn with_backends(config: Config, backends: Backends) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;
        let base_url = config.public_base_url.clone();

        Ok(Self {
            auth_service: AuthService::new(backends.users, backends.businesses.clone(), config.jwt_secret.clone()),
            review_service: ReviewService::new(backends.reviews.clone(), backends.analyzer),
            social_card_service: SocialCardService::new(
                backends.reviews.clone(),
                backends.businesses.clone(),
                backends.social_cards,
                backends.storage.clone(),
                backends.rasterizer,
            ),
            intake_service: IntakeService::new(
                backends.businesses.clone(),
                backends.reviews.clone(),
                backends.storage.clone(),
                base_url.clone(),
            ),
            widget_service: WidgetService::new(backends.businesses.clone(), backends.reviews.clone(), base_url.clone()),
            dashboard_service: DashboardService::new(backends.reviews, base_url.clone()),
            business_service: BusinessService::new(backends.businesses, backends.storage, base_url),
            i18n_store,
            config,
        })
    }
}
