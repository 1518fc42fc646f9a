use eframe::egui;
use egui_notify::{Anchor, Toast, Toasts};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    fn duration(self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(3),
            NotificationLevel::Success => Duration::from_secs(4),
            NotificationLevel::Error => Duration::from_secs(8),
        }
    }
}

/// Toasts over the game window, with repeat suppression.
pub struct NotificationManager {
    toasts: Toasts,
    recent: Vec<(String, Instant)>,
    dedup_window: Duration,
    enabled: bool,
}

impl NotificationManager {
    const MAX_RECENT: usize = 20;

    pub fn new(enabled: bool) -> Self {
        let toasts = Toasts::new()
            .with_anchor(Anchor::BottomRight)
            .with_margin(egui::vec2(8.0, 8.0));
        Self {
            toasts,
            recent: Vec::new(),
            dedup_window: Duration::from_secs(2),
            enabled,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        if !self.enabled || self.is_duplicate(&message) {
            return;
        }
        self.recent.push((message.clone(), Instant::now()));
        if self.recent.len() > Self::MAX_RECENT {
            self.recent.remove(0);
        }

        let mut toast = match level {
            NotificationLevel::Info => Toast::info(message),
            NotificationLevel::Success => Toast::success(message),
            NotificationLevel::Error => Toast::error(message),
        };
        toast.duration(Some(level.duration()));
        self.toasts.add(toast);
    }

    fn is_duplicate(&mut self, message: &str) -> bool {
        let now = Instant::now();
        self.recent
            .retain(|(_, at)| now.duration_since(*at) < Duration::from_secs(60));
        self.recent
            .iter()
            .any(|(msg, at)| msg == message && now.duration_since(*at) < self.dedup_window)
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Call once per frame.
    pub fn render(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_is_suppressed() {
        let mut mgr = NotificationManager::default();
        mgr.error("Cannot reach the database");
        assert!(mgr.is_duplicate("Cannot reach the database"));
        assert!(!mgr.is_duplicate("Level 2 completed."));
    }

    #[test]
    fn test_disabled_records_nothing() {
        let mut mgr = NotificationManager::new(false);
        mgr.info("Loading");
        assert!(mgr.recent.is_empty());
    }
}
