// ============================================================================
// Waitlist : formulaire d'inscription par email
// ============================================================================
// Machine à états courte autour d'un seul appel async :
//
//   Idle --begin_submit()--> Submitting --finish_submit()--> Idle
//
// Pendant Submitting, le bouton est désactivé et affiche un libellé
// d'attente. En sortie, le libellé d'origine est TOUJOURS restauré,
// que l'appel ait réussi ou non.
// ============================================================================

use tracing::{error, info};

use crate::api::SubmitError;
use crate::notifications::{Notification, NotificationQueue};

/// Libellé du bouton au repos
pub const SUBMIT_LABEL: &str = "Join Waitlist";

/// Libellé pendant l'envoi
pub const BUSY_LABEL: &str = "Joining...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Submitting,
}

/// État du formulaire waitlist
#[derive(Debug, Clone)]
pub struct WaitlistForm {
    /// Contenu du champ email
    pub email: String,

    /// Libellé actuel du bouton
    pub label: String,

    /// Libellé capturé au début de l'envoi, restauré à la fin
    original_label: Option<String>,

    state: SubmitState,
}

impl WaitlistForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            label: SUBMIT_LABEL.to_string(),
            original_label: None,
            state: SubmitState::Idle,
        }
    }

    /// Le bouton est verrouillé pendant l'envoi
    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    pub fn append_char(&mut self, c: char) {
        self.email.push(c);
    }

    pub fn backspace(&mut self) {
        self.email.pop();
    }

    /// Passe en Submitting et retourne l'email à envoyer
    ///
    /// Retourne None (sans rien changer) si un envoi est déjà en cours
    /// (bouton désactivé) ou si le champ est vide.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_submitting() {
            return None;
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            return None;
        }

        self.original_label = Some(std::mem::replace(&mut self.label, BUSY_LABEL.to_string()));
        self.state = SubmitState::Submitting;
        Some(email)
    }

    /// Termine l'envoi : notifie l'utilisateur puis restaure le bouton
    ///
    /// - Succès : message avec l'email, champ vidé
    /// - Échec : message d'erreur, champ conservé pour réessayer
    pub fn finish_submit(
        &mut self,
        email: &str,
        result: Result<(), SubmitError>,
        notifications: &mut NotificationQueue,
    ) {
        match result {
            Ok(()) => {
                info!(email = %email, "Joined waitlist");
                notifications.push(Notification::success(format!(
                    "Success! {} has been added to the waitlist.",
                    email
                )));
                self.email.clear();
            }
            Err(e) => {
                error!(email = %email, error = %e, "Failed to join waitlist");
                notifications.push(Notification::failure(
                    "Something went wrong. Please try again.",
                ));
            }
        }

        self.restore();
    }

    /// Abandonne un envoi sans notifier (tâche interrompue)
    pub fn abandon_submit(&mut self) {
        self.restore();
    }

    /// Retour à Idle avec le libellé d'origine
    fn restore(&mut self) {
        if let Some(label) = self.original_label.take() {
            self.label = label;
        }
        self.state = SubmitState::Idle;
    }
}

impl Default for WaitlistForm {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationKind;
    use reqwest::StatusCode;

    fn form_with(email: &str) -> WaitlistForm {
        let mut form = WaitlistForm::new();
        form.email = email.to_string();
        form
    }

    #[test]
    fn test_begin_submit_locks_control() {
        let mut form = form_with("a@b.com");

        let email = form.begin_submit();
        assert_eq!(email.as_deref(), Some("a@b.com"));
        assert!(form.is_submitting());
        assert_eq!(form.label, BUSY_LABEL);

        // Bouton désactivé : un second submit est ignoré
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn test_empty_email_is_not_submitted() {
        let mut form = form_with("   ");
        assert!(form.begin_submit().is_none());
        assert!(!form.is_submitting());
        assert_eq!(form.label, SUBMIT_LABEL);
    }

    #[test]
    fn test_success_clears_field_and_restores_label() {
        let mut form = form_with("a@b.com");
        let mut notifications = NotificationQueue::new();

        let email = form.begin_submit().unwrap();
        form.finish_submit(&email, Ok(()), &mut notifications);

        assert!(form.email.is_empty());
        assert_eq!(form.label, SUBMIT_LABEL);
        assert!(!form.is_submitting());

        let note = notifications.current().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert!(note.message.contains("a@b.com"));
    }

    #[test]
    fn test_failure_keeps_field_and_restores_label() {
        let mut form = form_with("a@b.com");
        let mut notifications = NotificationQueue::new();

        let email = form.begin_submit().unwrap();
        form.finish_submit(
            &email,
            Err(SubmitError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            &mut notifications,
        );

        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.label, SUBMIT_LABEL);
        assert!(!form.is_submitting());
        assert_eq!(notifications.current().unwrap().kind, NotificationKind::Failure);

        // Retry possible avec la même valeur
        assert_eq!(form.begin_submit().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_custom_label_is_restored() {
        let mut form = form_with("a@b.com");
        form.label = "Notify me".to_string();
        let mut notifications = NotificationQueue::new();

        let email = form.begin_submit().unwrap();
        form.finish_submit(&email, Ok(()), &mut notifications);
        assert_eq!(form.label, "Notify me");
    }
}
