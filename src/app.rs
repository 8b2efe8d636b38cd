// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du dashboard
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Les données de scan ne changent QUE via les transitions nommées
//   on_fetch_issued / on_fetch_succeeded / on_fetch_failed
// - Jamais d'écriture directe de setups / loading / last_updated ailleurs
//
// Plusieurs fetchs peuvent se chevaucher (refresh manuel pendant un refresh
// automatique) : chaque appel met loading à true puis à false, le flag ne
// reflète donc que le dernier appel terminé, pas un compteur d'appels en vol.
// ============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use tracing::{debug, error, info};

use crate::api::FetchError;
use crate::models::Setup;
use crate::notifications::NotificationQueue;
use crate::ordering::order_hot_first;
use crate::waitlist::WaitlistForm;

/// État partagé entre la boucle de rendu et le worker async
pub type SharedApp = Arc<Mutex<App>>;

/// Verrouille l'état partagé
///
/// CONCEPT RUST : Mutex empoisonné
/// - Si un thread a paniqué en tenant le verrou, lock() retourne Err
/// - App ne contient que des données simples : on récupère la garde
///   avec into_inner() plutôt que de propager la panique
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des setups
    Dashboard,

    /// Formulaire waitlist (saisie de l'email en bas de l'écran)
    Waitlist,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Index du setup sélectionné
    pub selected_index: usize,

    /// Two-step quit : première pression de 'q' arme, seconde quitte
    pub confirm_quit: bool,

    /// Formulaire waitlist (champ email + verrou du bouton)
    pub waitlist: WaitlistForm,

    /// Messages en attente d'acquittement
    pub notifications: NotificationQueue,

    // Données de scan : privées, modifiées uniquement par les transitions
    setups: Vec<Setup>,
    loading: bool,
    last_updated: Option<String>,
    last_error: Option<String>,
    torn_down: bool,
}

impl App {
    /// État initial : liste vide, pas de chargement, jamais mis à jour
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            selected_index: 0,
            confirm_quit: false,
            waitlist: WaitlistForm::new(),
            notifications: NotificationQueue::new(),
            setups: Vec::new(),
            loading: false,
            last_updated: None,
            last_error: None,
            torn_down: false,
        }
    }

    /// Enveloppe l'état dans un Arc<Mutex<>> pour le partager
    pub fn shared() -> SharedApp {
        Arc::new(Mutex::new(Self::new()))
    }

    // ========================================================================
    // Lecture des données de scan
    // ========================================================================

    /// Setups dans l'ordre d'affichage (hot d'abord)
    pub fn setups(&self) -> &[Setup] {
        &self.setups
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Heure locale du dernier scan réussi
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Dernière erreur de scan (effacée au prochain succès)
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// L'état vide ne s'affiche que hors chargement
    pub fn shows_empty_state(&self) -> bool {
        self.setups.is_empty() && !self.loading
    }

    pub fn hot_count(&self) -> usize {
        self.setups.iter().filter(|s| s.is_hot).count()
    }

    // ========================================================================
    // Transitions du pipeline de fetch
    // ========================================================================

    /// Un fetch vient d'être lancé
    pub fn on_fetch_issued(&mut self) {
        if self.torn_down {
            debug!("Fetch issued after teardown, ignored");
            return;
        }
        self.loading = true;
    }

    /// Le fetch a réussi : remplace la liste en bloc, horodate
    pub fn on_fetch_succeeded(&mut self, raw: Vec<Setup>) {
        let stamp = Local::now().format("%H:%M:%S").to_string();
        self.apply_success(raw, stamp);
    }

    fn apply_success(&mut self, raw: Vec<Setup>, stamp: String) {
        if self.torn_down {
            debug!(count = raw.len(), "Fetch settled after teardown, ignored");
            return;
        }

        self.setups = order_hot_first(raw);
        self.last_updated = Some(stamp);
        self.last_error = None;
        self.loading = false;

        // La liste a pu raccourcir
        let max_index = self.setups.len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);

        info!(count = self.setups.len(), hot = self.hot_count(), "Setups updated");
    }

    /// Le fetch a échoué : données et horodatage conservés (stale)
    pub fn on_fetch_failed(&mut self, err: &FetchError) {
        if self.torn_down {
            debug!(error = %err, "Fetch failed after teardown, ignored");
            return;
        }

        error!(error = %err, "Error fetching setups, keeping previous data");
        self.last_error = Some(err.to_string());
        self.loading = false;
    }

    /// Démontage de la vue : plus aucune mutation par le pipeline
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.loading = false;
    }

    // ========================================================================
    // Navigation et cycle de vie
    // ========================================================================

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigue vers le haut (saturating_sub : ne descend pas sous 0)
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas, borné à la fin de la liste
    pub fn navigate_down(&mut self) {
        let max_index = self.setups.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_setup(&self) -> Option<&Setup> {
        self.setups.get(self.selected_index)
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    // ========================================================================
    // Waitlist
    // ========================================================================

    /// Ouvre le formulaire waitlist
    pub fn open_waitlist(&mut self) {
        self.current_screen = Screen::Waitlist;
    }

    /// Ferme le formulaire (le contenu du champ est conservé)
    pub fn close_waitlist(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_on_waitlist(&self) -> bool {
        self.current_screen == Screen::Waitlist
    }

    /// Une notification est affichée et doit être fermée
    pub fn has_notification(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn setup(symbol: &str, is_hot: bool) -> Setup {
        Setup::new(symbol, "Ranging", 1.0, is_hot, "12:00")
    }

    fn symbols(app: &App) -> Vec<String> {
        app.setups().iter().map(|s| s.symbol.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.setups().is_empty());
        assert!(!app.is_loading());
        assert!(app.last_updated().is_none());
        assert!(app.last_error().is_none());
        assert!(app.shows_empty_state());
    }

    #[test]
    fn test_success_orders_and_stamps() {
        let mut app = App::new();
        app.on_fetch_issued();
        assert!(app.is_loading());
        assert!(!app.shows_empty_state());

        app.on_fetch_succeeded(vec![
            setup("EURUSD", false),
            setup("XAUUSD", true),
            setup("GBPUSD", true),
        ]);

        assert!(!app.is_loading());
        assert_eq!(symbols(&app), vec!["XAUUSD", "GBPUSD", "EURUSD"]);
        assert!(app.last_updated().is_some());
        assert_eq!(app.hot_count(), 2);
    }

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut app = App::new();
        app.on_fetch_issued();
        app.apply_success(vec![setup("EURUSD", false)], "10:00:00".to_string());

        let before_setups = app.setups().to_vec();
        let before_stamp = app.last_updated().map(str::to_string);

        app.on_fetch_issued();
        app.on_fetch_failed(&FetchError::Status(StatusCode::BAD_GATEWAY));

        assert_eq!(app.setups(), before_setups.as_slice());
        assert_eq!(app.last_updated().map(str::to_string), before_stamp);
        assert!(!app.is_loading());
        assert!(app.last_error().unwrap().contains("502"));
    }

    #[test]
    fn test_success_clears_last_error() {
        let mut app = App::new();
        app.on_fetch_failed(&FetchError::Status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(app.last_error().is_some());
        assert!(app.last_updated().is_none());

        app.on_fetch_succeeded(vec![]);
        assert!(app.last_error().is_none());
        assert!(app.shows_empty_state());
    }

    #[test]
    fn test_transitions_ignored_after_teardown() {
        let mut app = App::new();
        app.on_fetch_issued();
        app.teardown();
        assert!(!app.is_loading());

        app.on_fetch_issued();
        assert!(!app.is_loading());

        app.on_fetch_succeeded(vec![setup("XAUUSD", true)]);
        assert!(app.setups().is_empty());
        assert!(app.last_updated().is_none());

        app.on_fetch_failed(&FetchError::Status(StatusCode::BAD_GATEWAY));
        assert!(app.last_error().is_none());
    }

    #[test]
    fn test_navigation_bounded_by_setups() {
        let mut app = App::new();
        app.on_fetch_succeeded(vec![setup("A", true), setup("B", false), setup("C", false)]);

        app.navigate_down();
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        app.navigate_up();
        assert_eq!(app.selected_setup().unwrap().symbol, "B");

        // Une liste plus courte ramène la sélection dans les bornes
        app.navigate_down();
        app.on_fetch_succeeded(vec![setup("A", true)]);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_waitlist_screen_toggle() {
        let mut app = App::new();
        app.open_waitlist();
        assert!(app.is_on_waitlist());
        app.close_waitlist();
        assert!(app.is_on_dashboard());
    }
}
