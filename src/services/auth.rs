// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessStore, UserStore},
    middleware::auth::SessionContext,
    models::{
        auth::{Claims, LoginUserPayload, SignupPayload},
        business::NewBusiness,
    },
};

const SESSION_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    businesses: Arc<dyn BusinessStore>,
    jwt_secret: String,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, businesses: Arc<dyn BusinessStore>, jwt_secret: String) -> Self {
        Self {
            users,
            businesses,
            jwt_secret,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    // Custo baixo só para deixar os testes rápidos
    #[cfg(test)]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Cria conta + negócio e já abre a sessão.
    pub async fn signup(&self, payload: SignupPayload) -> Result<String, AppError> {
        // 1. Hashing fora do runtime async
        let password = payload.password;
        let cost = self.hash_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Usuário e negócio na mesma transação
        let business = NewBusiness {
            business_name: payload.business_name,
            business_url: payload.business_url,
            widget_id: Uuid::new_v4().to_string(),
        };
        let (user, business) = self
            .users
            .create_account(&payload.email, &hashed_password, business)
            .await?;

        tracing::info!(user_id = %user.id, widget_id = %business.widget_id, "🆕 Conta criada");

        self.open_session(user.id).await
    }

    pub async fn login(&self, payload: LoginUserPayload) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = payload.password;
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.open_session(user.id).await
    }

    /// Encerra a sessão: o token deixa de valer mesmo antes de expirar.
    pub async fn logout(&self, session: &SessionContext) -> Result<(), AppError> {
        self.users.delete_session(session.session_id).await
    }

    /// Token -> sessão viva -> usuário -> negócio.
    pub async fn resolve_session(&self, token: &str) -> Result<SessionContext, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        let session = self
            .users
            .find_session(claims.sid)
            .await?
            .filter(|s| s.user_id == claims.sub && s.expires_at > Utc::now())
            .ok_or(AppError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let business = self
            .businesses
            .find_by_user(user.id)
            .await?
            .ok_or(AppError::BusinessNotFound)?;

        Ok(SessionContext {
            session_id: session.id,
            user,
            business,
        })
    }

    async fn open_session(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(SESSION_DAYS);

        // Aproveita o login para limpar as sessões vencidas do usuário
        let removed = self.users.delete_expired_sessions(user_id, now).await?;
        if removed > 0 {
            tracing::debug!(%user_id, removed, "🧹 Sessões vencidas removidas");
        }

        let session = self.users.create_session(user_id, expires_at).await?;
        self.create_token(user_id, session.id, now.timestamp(), expires_at.timestamp())
    }

    fn create_token(&self, user_id: Uuid, session_id: Uuid, iat: i64, exp: i64) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            exp: exp as usize,
            iat: iat as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> AuthService {
        AuthService::new(store.clone(), store.clone(), "segredo-de-teste".into())
            .with_hash_cost(4 /* bcrypt MIN_COST (private in bcrypt 0.18) */)
    }

    fn signup_payload(email: &str) -> SignupPayload {
        SignupPayload {
            email: email.into(),
            password: "segredo123".into(),
            business_name: "Acme".into(),
            business_url: "https://acme.com".into(),
        }
    }

    #[tokio::test]
    async fn signup_opens_a_session_with_a_fresh_business() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(&store);

        let token = auth.signup(signup_payload("dono@acme.com")).await.unwrap();
        let session = auth.resolve_session(&token).await.unwrap();

        assert_eq!(session.user.email, "dono@acme.com");
        assert_eq!(session.business.business_name, "Acme");
        assert!(Uuid::parse_str(&session.business.widget_id).is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(&store);

        auth.signup(signup_payload("dono@acme.com")).await.unwrap();
        let result = auth.signup(signup_payload("dono@acme.com")).await;
        assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn login_checks_the_password() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(&store);
        auth.signup(signup_payload("dono@acme.com")).await.unwrap();

        let wrong = auth
            .login(LoginUserPayload { email: "dono@acme.com".into(), password: "errada123".into() })
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let token = auth
            .login(LoginUserPayload { email: "dono@acme.com".into(), password: "segredo123".into() })
            .await
            .unwrap();
        assert!(auth.resolve_session(&token).await.is_ok());
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(&store);

        let token = auth.signup(signup_payload("dono@acme.com")).await.unwrap();
        let session = auth.resolve_session(&token).await.unwrap();
        auth.logout(&session).await.unwrap();

        assert!(matches!(auth.resolve_session(&token).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let token = service(&store).signup(signup_payload("dono@acme.com")).await.unwrap();

        let other = AuthService::new(store.clone(), store.clone(), "outro-segredo".into())
            .with_hash_cost(4 /* bcrypt MIN_COST (private in bcrypt 0.18) */);
        assert!(matches!(other.resolve_session(&token).await, Err(AppError::InvalidToken)));
        assert!(matches!(other.resolve_session("lixo").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn login_sweeps_expired_sessions() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(&store);
        let token = auth.signup(signup_payload("dono@acme.com")).await.unwrap();
        let session = auth.resolve_session(&token).await.unwrap();
        let user_id = session.user.id;

        // Duas sessões já vencidas e uma de outro usuário
        store.create_session(user_id, Utc::now() - Duration::days(1)).await.unwrap();
        store.create_session(user_id, Utc::now() - Duration::hours(1)).await.unwrap();
        store.create_session(Uuid::new_v4(), Utc::now() - Duration::days(1)).await.unwrap();
        assert_eq!(store.session_count(), 4);

        auth.login(LoginUserPayload { email: "dono@acme.com".into(), password: "segredo123".into() })
            .await
            .unwrap();

        // Sobram a sessão do cadastro, a nova e a do outro usuário
        assert_eq!(store.session_count(), 3);
        assert!(auth.resolve_session(&token).await.is_ok());
    }
}
