// ============================================================================
// Configuration
// ============================================================================
// Lue depuis l'environnement (et un éventuel fichier .env)
//
// Variables :
// - LIQUIDSCAN_API_URL (ou API_URL)  : origine du service de scan
// - LIQUIDSCAN_REFRESH_SECS          : période de rafraîchissement (> 0)
// - LIQUIDSCAN_LOG_DIR               : répertoire des logs
// ============================================================================

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Adresse du service de scan quand rien n'est configuré
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Période de rafraîchissement par défaut (60 secondes)
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Origine du service (sans '/' final)
    pub api_url: String,

    /// Intervalle entre deux scans automatiques
    pub refresh_interval: Duration,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Charge .env s'il existe, puis lit les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // Un .env absent n'est pas une erreur
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture de variables
    ///
    /// CONCEPT RUST : injection d'une closure
    /// - En prod : |k| env::var(k).ok()
    /// - En test : lecture dans une HashMap, sans toucher l'environnement global
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("LIQUIDSCAN_API_URL")
            .or_else(|| lookup("API_URL"))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let refresh_secs: u64 = match lookup("LIQUIDSCAN_REFRESH_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("LIQUIDSCAN_REFRESH_SECS invalide : {:?}", raw))?,
            None => DEFAULT_REFRESH_SECS,
        };

        if refresh_secs == 0 {
            bail!("LIQUIDSCAN_REFRESH_SECS doit être supérieur à 0");
        }

        let log_dir = lookup("LIQUIDSCAN_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            refresh_interval: Duration::from_secs(refresh_secs),
            log_dir,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            log_dir: default_log_dir(),
        }
    }
}

/// Répertoire de logs par défaut
///
/// - Linux/WSL : ~/.local/share/liquidscan/logs
/// - macOS : ~/Library/Application Support/liquidscan/logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("liquidscan").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests
// ============================================================================
