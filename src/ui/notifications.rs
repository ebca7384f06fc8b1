//! Dismissible, self-expiring notification banners

use crate::types::NotificationKind;
use crate::utils::clock::Clock;
use crate::utils::html::escape;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One banner
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn render_html(&self) -> String {
        format!(
            r#"<div class="alert {} alert-dismissible fade show" role="alert" data-notification-id="{}">{}<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button></div>"#,
            self.kind.css_class(),
            self.id,
            escape(&self.text),
        )
    }
}

#[derive(Debug, Default)]
struct BannerStack {
    next_id: u64,
    /// Newest first, matching insertion directly after the summary panel
    banners: Vec<Notification>,
}

/// Shared banner stack. Clones refer to the same stack.
#[derive(Clone)]
pub struct NotificationCenter {
    stack: Arc<Mutex<BannerStack>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, crate::defaults::NOTIFICATION_TTL)
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            stack: Arc::new(Mutex::new(BannerStack::default())),
            clock,
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BannerStack> {
        self.stack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show a banner; returns its id
    pub fn show_message(&self, text: impl Into<String>, kind: NotificationKind) -> u64 {
        let now = self.clock.now();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut stack = self.lock();
        stack.next_id += 1;
        let id = stack.next_id;
        stack.banners.insert(0, Notification {
            id,
            text: text.into(),
            kind,
            created_at: now,
            expires_at,
        });
        id
    }

    pub fn success(&self, text: impl Into<String>) -> u64 {
        self.show_message(text, NotificationKind::Success)
    }

    pub fn error(&self, text: impl Into<String>) -> u64 {
        self.show_message(text, NotificationKind::Error)
    }

    /// Close a banner before it expires. False if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut stack = self.lock();
        let before = stack.banners.len();
        stack.banners.retain(|n| n.id != id);
        stack.banners.len() != before
    }

    /// Drop expired banners; returns how many were removed
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut stack = self.lock();
        let before = stack.banners.len();
        stack.banners.retain(|n| !n.is_expired(now));
        before - stack.banners.len()
    }

    /// Banners still on screen, newest first
    pub fn visible(&self) -> Vec<Notification> {
        self.prune();
        self.lock().banners.clone()
    }

    pub fn render_html(&self) -> String {
        self.visible()
            .iter()
            .map(Notification::render_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("banners", &self.lock().banners)
            .field("ttl", &self.ttl)
            .finish()
    }
}
