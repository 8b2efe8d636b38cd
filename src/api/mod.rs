// ============================================================================
// Module : api
// ============================================================================
// Client du service de scan distant (liste des setups + waitlist)
// ============================================================================

pub mod error;   // FetchError / SubmitError
pub mod scanner; // Client HTTP et trait ScanApi

// Re-export des éléments principaux
pub use error::{FetchError, SubmitError};
pub use scanner::{parse_scan_body, ScanApi, ScannerClient};
