// ============================================================================
// Pipeline : appels distants -> transitions de l'état
// ============================================================================
// Les seuls points de suspension sont les appels réseau. Le verrou sur
// App n'est JAMAIS tenu pendant un .await : on verrouille, on applique
// une transition, on relâche.
// ============================================================================

use tracing::{debug, warn};

use crate::api::ScanApi;
use crate::app::{lock_app, SharedApp};

/// Un cycle de refresh complet : issue -> fetch -> settle
///
/// - Succès : setups remplacés (triés hot-first), last_updated mis à jour
/// - Échec : erreur loggée, données précédentes conservées
/// - Dans les deux cas loading repasse à false
pub async fn refresh_setups(app: &SharedApp, api: &dyn ScanApi) {
    lock_app(app).on_fetch_issued();

    let result = api.fetch_setups().await;

    let mut state = lock_app(app);
    match result {
        Ok(raw) => state.on_fetch_succeeded(raw),
        Err(e) => state.on_fetch_failed(&e),
    }
}

/// Remet le bouton waitlist au repos si la tâche d'envoi disparaît
/// (abort, arrêt du runtime) avant d'avoir terminé normalement.
struct SubmitCleanup<'a> {
    app: &'a SharedApp,
}

impl Drop for SubmitCleanup<'_> {
    fn drop(&mut self) {
        let mut state = lock_app(self.app);
        if state.waitlist.is_submitting() {
            warn!("Waitlist submission dropped before completion, unlocking form");
            state.waitlist.abandon_submit();
        }
    }
}

/// Envoie l'email capturé par `WaitlistForm::begin_submit`
///
/// Le formulaire doit déjà être en Submitting (verrouillé côté UI avant
/// l'envoi de la commande). La fin de l'envoi notifie l'utilisateur et
/// déverrouille le bouton, quel que soit le résultat.
pub async fn submit_waitlist(app: &SharedApp, api: &dyn ScanApi, email: String) {
    let _cleanup = SubmitCleanup { app };

    debug!(email = %email, "Submitting waitlist email");
    let result = api.submit_waitlist_email(&email).await;

    let mut state = lock_app(app);
    let state = &mut *state;
    state
        .waitlist
        .finish_submit(&email, result, &mut state.notifications);
}
