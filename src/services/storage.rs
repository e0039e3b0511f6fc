// src/services/storage.rs

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use tokio::fs;

use crate::common::error::AppError;

pub const REVIEW_PHOTOS_BUCKET: &str = "review-photos";
pub const BUSINESS_LOGOS_BUCKET: &str = "business-logos";
pub const SOCIAL_CARDS_BUCKET: &str = "social-cards";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    // Sobrescreve o objeto se já existir (usado no logo)
    pub upsert: bool,
}

/// Descobre o formato pelo conteúdo e devolve a extensão usada no caminho do objeto.
pub fn image_extension(data: &[u8]) -> Result<&'static str, AppError> {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Png) => Ok("png"),
        Ok(image::ImageFormat::Jpeg) => Ok("jpg"),
        Ok(image::ImageFormat::Gif) => Ok("gif"),
        Ok(image::ImageFormat::WebP) => Ok("webp"),
        _ => Err(AppError::UnsupportedImage),
    }
}

/// Armazenamento de arquivos com URL pública.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> Result<(), AppError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Buckets viram diretórios dentro de `root`, servidos em `{base_url}/storage`.
pub struct LocalBlobStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStorage {
    pub fn new(root: PathBuf, base_url: &str) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // Só aceita caminhos relativos simples (sem "..", sem raiz)
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(bucket).join(path);
        let is_safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if !is_safe || bucket.is_empty() || path.is_empty() {
            return Err(AppError::StorageError(format!("caminho inválido: {bucket}/{path}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> Result<(), AppError> {
        let target = self.resolve(bucket, path)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::StorageError(e.to_string()))?;
        }

        if !options.upsert && fs::try_exists(&target).await.unwrap_or(false) {
            return Err(AppError::StorageError(format!("objeto já existe: {bucket}/{path}")));
        }

        fs::write(&target, &data)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        tracing::debug!(bucket, path, size = data.len(), "arquivo salvo");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/{}/{}", self.base_url, bucket, path)
    }
}
