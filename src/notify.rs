//! Transient status messages shown in the corner of the interface.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Loading,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: Option<Instant>,
}

/// Queue of transient messages. Success, error, and info entries expire on
/// their own after the configured TTL; loading entries stay until whatever
/// raised them dismisses one.
#[derive(Debug)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    /// Pushes a message with no expiry. Pair with `dismiss_loading`.
    pub fn loading(&mut self, message: impl Into<String>) {
        self.truncate();
        self.toasts.push_back(Toast {
            kind: ToastKind::Loading,
            message: message.into(),
            expires_at: None,
        });
    }

    /// Drops the oldest loading entry. Each settled operation dismisses
    /// the one toast it raised; later loading entries keep running.
    pub fn dismiss_loading(&mut self) {
        if let Some(pos) = self
            .toasts
            .iter()
            .position(|toast| toast.kind == ToastKind::Loading)
        {
            let _ = self.toasts.remove(pos);
        }
    }

    /// Drops expired entries.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| match toast.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        });
    }

    /// Entries in arrival order, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    fn push(&mut self, kind: ToastKind, message: String) {
        self.truncate();
        self.toasts.push_back(Toast {
            kind,
            message,
            expires_at: Some(Instant::now() + self.ttl),
        });
    }

    fn truncate(&mut self) {
        while self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
    }
}
