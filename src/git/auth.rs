use std::sync::Arc;

use http::Uri;
use http::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use octocrab::service::middleware::base_uri::BaseUriLayer;
use octocrab::service::middleware::extra_headers::ExtraHeadersLayer;
use octocrab::{AuthState, Octocrab, OctocrabBuilder};
use url::Url;

use super::tls::insecure_client_config;

const GITHUB_API: &str = "https://api.github.com";

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Failed to build octocrab client: {0}")]
    ClientBuild(#[from] octocrab::Error),
    #[error("Failed to configure TLS: {0}")]
    Tls(#[from] rustls::Error),
    #[error("Invalid API URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error("Token contains characters not allowed in an HTTP header")]
    InvalidToken(#[from] http::header::InvalidHeaderValue),
    #[error("Failed to assemble HTTP client: {0}")]
    Service(String),
}

/// API and upload endpoints of a GitHub Enterprise Server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseUrls {
    pub base: Url,
    pub upload: Url,
}

impl EnterpriseUrls {
    /// Accepts either the server root or the full API path for each URL
    pub fn new(base_url: &str, upload_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: with_api_suffix(base_url, "/api/v3")?,
            upload: with_api_suffix(upload_url, "/api/uploads")?,
        })
    }

    fn base_uri(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn upload_uri(&self) -> &str {
        self.upload.as_str().trim_end_matches('/')
    }
}

fn with_api_suffix(raw: &str, suffix: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.ends_with(suffix) {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}{suffix}"))
    }
}

pub fn create_authenticated_client(
    token: &str,
    enterprise: Option<&EnterpriseUrls>,
    insecure: bool,
) -> Result<Octocrab, AuthError> {
    // Fails only when a provider is already installed, which is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    if insecure {
        log::warn!("TLS certificate verification is disabled");
        return build_insecure_client(token, enterprise);
    }
    build_client_with_token(token, enterprise)
}

fn build_client_with_token(
    token: &str,
    enterprise: Option<&EnterpriseUrls>,
) -> Result<Octocrab, AuthError> {
    match enterprise {
        None => Ok(Octocrab::builder()
            .personal_token(token.to_string())
            .build()?),
        Some(urls) => {
            log::debug!(
                "Using GitHub Enterprise at {} (uploads: {})",
                urls.base_uri(),
                urls.upload_uri()
            );
            Ok(Octocrab::builder()
                .base_uri(urls.base_uri())?
                .upload_uri(urls.upload_uri())?
                .personal_token(token.to_string())
                .build()?)
        }
    }
}

// The default octocrab client pins certificate verification on, so skipping it
// means assembling the service stack by hand.
fn build_insecure_client(
    token: &str,
    enterprise: Option<&EnterpriseUrls>,
) -> Result<Octocrab, AuthError> {
    let base_uri: Uri = match enterprise {
        Some(urls) => urls.base_uri().parse()?,
        None => Uri::from_static(GITHUB_API),
    };
    log::debug!("Building unverified TLS client for {}", base_uri);

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(insecure_client_config()?)
        .https_or_http()
        .enable_http1()
        .build();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let headers = vec![
        (USER_AGENT, HeaderValue::from_static("github-commenter")),
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {token}"))?,
        ),
    ];

    OctocrabBuilder::new_empty()
        .with_service(client)
        .with_layer(&BaseUriLayer::new(base_uri))
        .with_layer(&ExtraHeadersLayer::new(Arc::new(headers)))
        .with_auth(AuthState::None)
        .build()
        .map_err(|e| AuthError::Service(e.to_string()))
}
