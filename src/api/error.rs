// ============================================================================
// Erreurs de la couche API
// ============================================================================
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error + Display
// - #[from] génère la conversion automatique pour l'opérateur ?
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Échec de `GET /scan`
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connexion impossible, coupure réseau, corps illisible...
    #[error("scan request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scan service returned HTTP {0}")]
    Status(StatusCode),

    /// Corps non JSON ou sans champ `active_setups`
    #[error("malformed scan response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Échec de `POST /waitlist`
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("waitlist request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("waitlist service returned HTTP {0}")]
    Status(StatusCode),
}
