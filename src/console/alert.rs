use std::time::{Duration, Instant};

use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    raised_at: Instant,
}

/// One inline message per panel. A new alert replaces the old one; each
/// clears itself once `ttl` has passed.
#[derive(Debug, Clone)]
pub struct AlertSlot {
    current: Option<Alert>,
    ttl: Duration,
}

impl AlertSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.show_at(kind, message, Instant::now());
    }

    pub fn show_at(&mut self, kind: AlertKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            AlertKind::Error => error!("{message}"),
            _ => info!("{message}"),
        }
        self.current = Some(Alert { kind, message, raised_at: now });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(AlertKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(AlertKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(AlertKind::Error, message);
    }

    pub fn visible_at(&self, now: Instant) -> Option<&Alert> {
        self.current
            .as_ref()
            .filter(|a| now.saturating_duration_since(a.raised_at) < self.ttl)
    }

    pub fn visible(&self) -> Option<&Alert> {
        self.visible_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_expires_after_ttl() {
        let mut slot = AlertSlot::new(Duration::from_secs(3));
        let t0 = Instant::now();
        slot.show_at(AlertKind::Success, "saved", t0);

        assert_eq!(slot.visible_at(t0).map(|a| a.message.as_str()), Some("saved"));
        assert!(slot.visible_at(t0 + Duration::from_millis(2999)).is_some());
        assert!(slot.visible_at(t0 + Duration::from_secs(3)).is_none());
    }

    #[test]
    fn newer_alert_replaces_older() {
        let mut slot = AlertSlot::new(Duration::from_secs(3));
        let t0 = Instant::now();
        slot.show_at(AlertKind::Info, "saving...", t0);
        slot.show_at(AlertKind::Error, "save failed", t0 + Duration::from_secs(2));

        let later = t0 + Duration::from_secs(4);
        let alert = slot.visible_at(later).unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "save failed");
    }
}
