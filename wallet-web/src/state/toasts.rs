//! Toast queue
//!
//! [`ToastNotifier`] is the dashboard's [`Notifier`]: every notification the
//! stores emit lands here. A toast with an id replaces the visible toast with
//! the same id instead of stacking.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use lib_core::notify::{Notification, NotificationLevel, Notifier};

/// Most toasts shown at once; the oldest is dropped first.
pub const MAX_TOASTS: usize = 4;

/// How long a toast stays up.
pub const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub key: Option<&'static str>,
    pub level: NotificationLevel,
    pub message: String,
}

/// Insert `toast`, replacing a toast with the same key, keeping at most `cap`.
pub fn push_toast(toasts: &mut Vec<Toast>, toast: Toast, cap: usize) {
    if let Some(key) = toast.key {
        toasts.retain(|t| t.key != Some(key));
    }
    toasts.push(toast);

    if toasts.len() > cap {
        let excess = toasts.len() - cap;
        toasts.drain(..excess);
    }
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    pub toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn show(&self, notification: Notification) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let toast = Toast {
            id,
            key: notification.id,
            level: notification.level,
            message: notification.message,
        };
        self.toasts.update(|toasts| push_toast(toasts, toast, MAX_TOASTS));

        let context = *self;
        Timeout::new(TOAST_DURATION_MS, move || context.dismiss(id)).forget();
    }

    pub fn dismiss(&self, id: u64) {
        // The timer can outlive the app
        let _ = self.toasts.try_update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers core notifications as toasts.
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    context: ToastContext,
}

impl ToastNotifier {
    pub fn new(context: ToastContext) -> Self {
        Self { context }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        log::debug!("[{}] {}", notification.level, notification.message);
        self.context.show(notification);
    }
}

pub fn provide_toast_context() -> ToastContext {
    let context = ToastContext::new();
    provide_context(context);
    context
}

pub fn use_toast_context() -> ToastContext {
    expect_context::<ToastContext>()
}
