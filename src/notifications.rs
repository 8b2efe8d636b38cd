// ============================================================================
// Notifications : file de messages à acquitter
// ============================================================================
// Remplace les alertes bloquantes : la logique pousse un message, l'UI
// affiche le premier en popup, l'utilisateur le ferme (Enter / Esc).
// ============================================================================

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
        }
    }
}

/// File FIFO de notifications
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    /// Notification actuellement affichée (la plus ancienne)
    pub fn current(&self) -> Option<&Notification> {
        self.pending.front()
    }

    /// Ferme la notification affichée et la retourne
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::success("first"));
        queue.push(Notification::failure("second"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current().unwrap().message, "first");

        let dismissed = queue.dismiss().unwrap();
        assert_eq!(dismissed.kind, NotificationKind::Success);
        assert_eq!(queue.current().unwrap().kind, NotificationKind::Failure);

        queue.dismiss();
        assert!(queue.is_empty());
        assert!(queue.dismiss().is_none());
    }
}
