// ============================================================================
// LiquidScan - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;           // Client du service de scan
pub mod app;           // État de l'application
pub mod commands;      // Clavier -> commandes worker
pub mod config;        // Configuration (env / .env)
pub mod models;        // Structures de données
pub mod notifications; // Messages à acquitter
pub mod ordering;      // Tri hot-first stable
pub mod pipeline;      // Appels distants -> transitions d'état
pub mod scheduler;     // Rafraîchissement périodique
pub mod ui;            // Interface utilisateur
pub mod waitlist;      // Formulaire waitlist
