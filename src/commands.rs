// ============================================================================
// Commandes : clavier -> état local + travail async
// ============================================================================
// CONCEPT : Command pattern avec channels
// - handle_event modifie l'état local (navigation, saisie, verrou du bouton)
// - Le travail réseau est décrit par une AppCommand envoyée au worker
// ============================================================================

use tracing::{debug, info};

use crate::app::App;
use crate::ui::events::{
    get_char_from_event, is_backspace_event, is_down_event, is_email_char_event,
    is_enter_event, is_escape_event, is_quit_event, is_refresh_event, is_up_event,
    is_waitlist_event, Event,
};

/// Travail demandé au worker async
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Refresh manuel (bouton "Refresh Scan")
    RefreshNow,

    /// Envoi de l'email ; le formulaire est déjà verrouillé
    SubmitWaitlist { email: String },

    /// Démontage : arrêt du scheduler et du worker
    Shutdown,
}

/// Traite un événement et retourne la commande éventuelle pour le worker
///
/// Priorité : notification affichée > formulaire waitlist > dashboard
pub fn handle_event(app: &mut App, event: &Event) -> Option<AppCommand> {
    if matches!(event, Event::Tick) {
        return None;
    }

    // Popup modale : seules Enter / Esc la ferment
    if app.has_notification() {
        if is_enter_event(event) || is_escape_event(event) {
            app.dismiss_notification();
        }
        return None;
    }

    if app.is_on_waitlist() {
        return handle_waitlist_event(app, event);
    }

    handle_dashboard_event(app, event)
}

fn handle_waitlist_event(app: &mut App, event: &Event) -> Option<AppCommand> {
    if is_escape_event(event) {
        debug!("User closed waitlist form");
        app.close_waitlist();
        return None;
    }

    if is_enter_event(event) {
        return match app.waitlist.begin_submit() {
            Some(email) => {
                info!(email = %email, "User submitted waitlist form");
                Some(AppCommand::SubmitWaitlist { email })
            }
            None => {
                debug!("Waitlist submit ignored (busy or empty)");
                None
            }
        };
    }

    // Champ verrouillé pendant l'envoi
    if app.waitlist.is_submitting() {
        return None;
    }

    if is_backspace_event(event) {
        app.waitlist.backspace();
    } else if is_email_char_event(event) {
        if let Some(c) = get_char_from_event(event) {
            app.waitlist.append_char(c);
        }
    }

    None
}

fn handle_dashboard_event(app: &mut App, event: &Event) -> Option<AppCommand> {
    if is_quit_event(event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
            return Some(AppCommand::Shutdown);
        }
        info!("User requested quit (awaiting confirmation)");
        app.request_quit();
        return None;
    }

    // Toute autre touche annule la confirmation de quit
    app.cancel_quit();

    if is_refresh_event(event) {
        // Bouton désactivé pendant un chargement
        if app.is_loading() {
            debug!("Manual refresh ignored while loading");
            return None;
        }
        info!("User requested manual refresh");
        return Some(AppCommand::RefreshNow);
    }

    if is_waitlist_event(event) {
        info!("User opened waitlist form");
        app.open_waitlist();
    } else if is_up_event(event) {
        app.navigate_up();
    } else if is_down_event(event) {
        app.navigate_down();
    }

    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Notification;
    use crate::waitlist::{BUSY_LABEL, SUBMIT_LABEL};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, &key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        assert_eq!(handle_event(&mut app, &key(KeyCode::Char('q'))), None);
        assert!(app.is_running());

        // Une autre touche annule
        handle_event(&mut app, &key(KeyCode::Down));
        assert!(!app.is_awaiting_quit_confirmation());

        handle_event(&mut app, &key(KeyCode::Char('q')));
        assert_eq!(
            handle_event(&mut app, &key(KeyCode::Char('q'))),
            Some(AppCommand::Shutdown)
        );
        assert!(!app.is_running());
    }

    #[test]
    fn test_refresh_disabled_while_loading() {
        let mut app = App::new();
        assert_eq!(
            handle_event(&mut app, &key(KeyCode::Char('r'))),
            Some(AppCommand::RefreshNow)
        );

        app.on_fetch_issued();
        assert_eq!(handle_event(&mut app, &key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn test_waitlist_typing_and_submit() {
        let mut app = App::new();
        handle_event(&mut app, &key(KeyCode::Char('w')));
        assert!(app.is_on_waitlist());

        // 'q' et 'r' sont du texte dans le formulaire
        type_text(&mut app, "qr@b.com");
        handle_event(&mut app, &key(KeyCode::Backspace));
        assert_eq!(app.waitlist.email, "qr@b.co");
        assert!(app.is_running());

        let command = handle_event(&mut app, &key(KeyCode::Enter));
        assert_eq!(
            command,
            Some(AppCommand::SubmitWaitlist {
                email: "qr@b.co".to_string()
            })
        );
        assert_eq!(app.waitlist.label, BUSY_LABEL);

        // Verrouillé : ni second envoi ni édition
        assert_eq!(handle_event(&mut app, &key(KeyCode::Enter)), None);
        type_text(&mut app, "zz");
        assert_eq!(app.waitlist.email, "qr@b.co");
    }

    #[test]
    fn test_notification_is_modal() {
        let mut app = App::new();
        app.notifications.push(Notification::success("done"));

        assert_eq!(handle_event(&mut app, &key(KeyCode::Char('r'))), None);
        assert!(app.has_notification());

        handle_event(&mut app, &key(KeyCode::Enter));
        assert!(!app.has_notification());
        assert_eq!(app.waitlist.label, SUBMIT_LABEL);
    }

    #[test]
    fn test_escape_closes_waitlist_keeping_email() {
        let mut app = App::new();
        handle_event(&mut app, &key(KeyCode::Char('w')));
        type_text(&mut app, "a@b.com");
        handle_event(&mut app, &key(KeyCode::Esc));

        assert!(app.is_on_dashboard());
        assert_eq!(app.waitlist.email, "a@b.com");
    }
}
