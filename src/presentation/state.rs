use std::sync::Arc;

use crate::{
    domain::repositories::{MediaRepository, UserRepository},
    infrastructure::{
        auth::JwtService,
        config::AppConfig,
        storage::{MediaStore, PresignedUrlService},
    },
};

/// Shared state handed to every handler
///
/// Built once at startup; everything inside is immutable or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub media_store: Arc<MediaStore>,
    pub jwt: Arc<JwtService>,
    /// Present only when blobs are served by this process through `/files`
    pub url_signer: Option<Arc<PresignedUrlService>>,
}
