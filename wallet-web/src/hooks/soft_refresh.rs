//! Soft refresh animation
//!
//! Raises a short-lived flag whenever a key changes, so cards can fade their
//! content instead of jumping when the account or chain switches. The first
//! value of the key does not trigger it.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// `true` for `duration_ms` after `key` changes.
///
/// A new change restarts the timer; dropping the owner cancels it.
pub fn use_soft_refresh<K>(key: Memo<K>, duration_ms: u32) -> ReadSignal<bool>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    let (refreshing, set_refreshing) = signal(false);
    let timer: StoredValue<Option<Timeout>, LocalStorage> = StoredValue::new_local(None);

    Effect::new(move |previous: Option<K>| {
        let current = key.get();
        if previous.is_some_and(|prev| prev != current) {
            set_refreshing.set(true);
            let timeout = Timeout::new(duration_ms, move || {
                let _ = set_refreshing.try_set(false);
            });
            // Replacing the old timeout drops it, which cancels it
            timer.update_value(|slot| *slot = Some(timeout));
        }
        current
    });

    on_cleanup(move || {
        timer.try_update_value(|slot| *slot = None);
    });

    refreshing
}

/// CSS class for a card body while a soft refresh is running.
pub fn soft_refresh_class(refreshing: bool) -> &'static str {
    if refreshing {
        "card-body soft-refresh"
    } else {
        "card-body"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_refresh_class() {
        assert_eq!(soft_refresh_class(true), "card-body soft-refresh");
        assert_eq!(soft_refresh_class(false), "card-body");
    }
}
