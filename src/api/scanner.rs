// ============================================================================
// API Client : service de scan LiquidScan
// ============================================================================
// Deux appels distants seulement :
// - GET  {base}/scan      -> { "active_setups": [...] }
// - POST {base}/waitlist  <- { "email": "..." }
//
// Pas de retry, pas de cache, pas de déduplication : requête/réponse pure.
// Le tri hot-first n'est PAS fait ici, il est appliqué une seule fois par
// le pipeline (voir crate::pipeline).
// ============================================================================

use std::net::IpAddr;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::api::error::{FetchError, SubmitError};
use crate::config::Config;
use crate::models::{ScanResponse, ServiceBanner, Setup, WaitlistRequest};

// ============================================================================
// Trait ScanApi
// ============================================================================
// CONCEPT RUST : Trait objects + async_trait
// - Le pipeline ne connaît que `dyn ScanApi`
// - Les tests injectent une fausse implémentation sans réseau
// ============================================================================

/// Contrat du service de scan tel que consommé par le dashboard
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Récupère la liste brute (non triée) des setups actifs
    async fn fetch_setups(&self) -> Result<Vec<Setup>, FetchError>;

    /// Inscrit un email sur la waitlist (réponse non inspectée)
    async fn submit_waitlist_email(&self, email: &str) -> Result<(), SubmitError>;
}

/// Client HTTP du service de scan
///
/// CONCEPT RUST : réutilisation du reqwest::Client
/// - Le Client garde un pool de connexions
/// - On le crée une fois et on le clone à bas coût (Arc interne)
#[derive(Debug, Clone)]
pub struct ScannerClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScannerClient {
    /// Crée un client pointant sur `config.api_url`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        // Pas de timeout explicite : défauts du transport
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("liquidscan/", env!("CARGO_PKG_VERSION")));

        // Un backend local ne doit pas passer par HTTP(S)_PROXY
        if is_loopback(&config.api_url) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Interroge `GET /` pour un log de diagnostic au démarrage
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<String, FetchError> {
        let response = self.client.get(self.url("/")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let banner: ServiceBanner = serde_json::from_str(&body)?;
        Ok(banner.message)
    }
}

/// L'URL désigne-t-elle la machine locale ?
fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            let host = url.host_str()?.trim_matches(|c| c == '[' || c == ']').to_string();
            Some(
                host.eq_ignore_ascii_case("localhost")
                    || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback()),
            )
        })
        .unwrap_or(false)
}

/// Parse le corps de `GET /scan`
///
/// CONCEPT : parsing séparé du transport
/// - On lit d'abord le texte, puis serde_json
/// - Un JSON invalide devient FetchError::Malformed, pas Transport
pub fn parse_scan_body(body: &str) -> Result<Vec<Setup>, FetchError> {
    let parsed: ScanResponse = serde_json::from_str(body)?;
    Ok(parsed.active_setups)
}

#[async_trait]
impl ScanApi for ScannerClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_setups(&self) -> Result<Vec<Setup>, FetchError> {
        debug!("Sending scan request");
        let response = self.client.get(self.url("/scan")).send().await?;

        let status = response.status();
        debug!(status = %status, "Received scan response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Scan service returned error status");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let setups = parse_scan_body(&body)?;

        info!(count = setups.len(), "Scan response received");
        Ok(setups)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn submit_waitlist_email(&self, email: &str) -> Result<(), SubmitError> {
        debug!("Sending waitlist request");
        let response = self
            .client
            .post(self.url("/waitlist"))
            .json(&WaitlistRequest { email })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Waitlist service returned error status");
            return Err(SubmitError::Status(status));
        }

        info!("Waitlist submission accepted");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
