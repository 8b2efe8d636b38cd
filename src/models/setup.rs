// ============================================================================
// Structure : Setup
// ============================================================================
// Représente un "setup" détecté par le service de scan pour un instrument
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : le JSON du backend est mappé directement
// 2. Immutabilité : un Setup n'est jamais modifié après réception,
//    la liste complète est remplacée à chaque scan réussi
// ============================================================================

use serde::{Deserialize, Serialize};

/// Un signal de trading détecté pour un instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    /// Identifiant de l'instrument (ex: "EURUSD=X", "XAUUSD=X")
    pub symbol: String,

    /// Libellé libre du signal (ex: "🔥 ICT BUY SETUP", "UPTREND ↗")
    pub status: String,

    /// Dernier prix coté
    pub price: f64,

    /// Setup prioritaire (affiché en premier et mis en avant)
    pub is_hot: bool,

    /// Horodatage de détection, opaque pour le client (affiché tel quel)
    pub time: String,
}

impl Setup {
    pub fn new(
        symbol: impl Into<String>,
        status: impl Into<String>,
        price: f64,
        is_hot: bool,
        time: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            status: status.into(),
            price,
            is_hot,
            time: time.into(),
        }
    }

    /// Tonalité d'affichage dérivée du libellé de statut
    pub fn tone(&self) -> StatusTone {
        StatusTone::from_status(&self.status)
    }

    /// Symbole sans le suffixe de cotation "=X" du service de scan
    ///
    /// CONCEPT RUST : strip_suffix retourne Option<&str>
    /// - Some(reste) si le suffixe est présent
    /// - None sinon, on garde le symbole tel quel
    pub fn display_symbol(&self) -> &str {
        self.symbol.strip_suffix("=X").unwrap_or(&self.symbol)
    }
}

// ============================================================================
// Enum : StatusTone
// ============================================================================
// Couleur d'affichage déduite des mots-clés du statut.
// Priorité : ICT > UPTREND > DOWNTREND > neutre
// ============================================================================

/// Catégorie visuelle d'un statut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// Setup ICT (liquidity sweep) : jaune, gras
    Ict,
    /// Tendance haussière : vert
    Uptrend,
    /// Tendance baissière : rouge
    Downtrend,
    /// Tout le reste : gris
    Neutral,
}

impl StatusTone {
    pub fn from_status(status: &str) -> Self {
        if status.contains("ICT") {
            Self::Ict
        } else if status.contains("UPTREND") {
            Self::Uptrend
        } else if status.contains("DOWNTREND") {
            Self::Downtrend
        } else {
            Self::Neutral
        }
    }
}

// ============================================================================
// Structures du contrat HTTP
// ============================================================================

/// Corps de la réponse de `GET /scan`
///
/// `active_setups` est obligatoire : un corps sans ce champ est rejeté
/// par serde, ce qui donne un FetchError::Malformed côté client.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    pub active_setups: Vec<Setup>,
}

/// Corps de la requête `POST /waitlist`
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistRequest<'a> {
    pub email: &'a str,
}

/// Bannière retournée par `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceBanner {
    pub message: String,
}

// ============================================================================
// Tests
// ============================================================================
