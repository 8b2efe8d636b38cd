// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données échangées avec le backend
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod setup; // Déclaration du module setup (fichier setup.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use liquidscan::models::setup::Setup;
// On peut faire : use liquidscan::models::Setup;
pub use setup::{ScanResponse, ServiceBanner, Setup, StatusTone, WaitlistRequest};
