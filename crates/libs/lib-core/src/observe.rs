//! # Observable State Cell
//!
//! Shared by all stores: state behind a `parking_lot::RwLock`, mutated only
//! through [`Observable::update`], with observers called once per effective
//! change after the lock is released. Observers may read or update the cell
//! again from inside the callback.

use std::rc::Rc;

use parking_lot::{Mutex, RwLock};

/// Callback invoked with the new state after every change.
pub type Observer<T> = Rc<dyn Fn(&T)>;

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Observers<T> {
    next_id: u64,
    entries: Vec<(ObserverId, Observer<T>)>,
}

pub struct Observable<T> {
    state: RwLock<T>,
    observers: Mutex<Observers<T>>,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(initial),
            observers: Mutex::new(Observers {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Clone of the current state.
    pub fn get(&self) -> T {
        self.state.read().clone()
    }

    /// Read through a closure without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read())
    }

    /// Apply `f`; publish the new state if it differs from the old one.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut state = self.state.write();
            let before = state.clone();
            let result = f(&mut state);
            let changed = (*state != before).then(|| state.clone());
            (result, changed)
        };

        if let Some(state) = changed {
            self.publish(&state);
        }
        result
    }

    pub fn subscribe(&self, observer: Observer<T>) -> ObserverId {
        let mut observers = self.observers.lock();
        observers.next_id += 1;
        let id = ObserverId(observers.next_id);
        observers.entries.push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.lock().entries.retain(|(entry, _)| *entry != id);
    }

    fn publish(&self, state: &T) {
        let observers: Vec<Observer<T>> = self
            .observers
            .lock()
            .entries
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            observer(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_publishes_only_changes() {
        let cell = Rc::new(Observable::new(0u32));
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let id = cell.subscribe(Rc::new(move |_| seen.set(seen.get() + 1)));

        cell.update(|v| *v = 0);
        assert_eq!(calls.get(), 0);

        cell.update(|v| *v += 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(cell.get(), 1);

        cell.unsubscribe(id);
        cell.update(|v| *v += 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_observer_can_reenter() {
        let cell = Rc::new(Observable::new(0u32));
        let inner = Rc::downgrade(&cell);
        cell.subscribe(Rc::new(move |v: &u32| {
            if *v == 1 {
                if let Some(cell) = inner.upgrade() {
                    cell.update(|v| *v = 2);
                }
            }
        }));

        cell.update(|v| *v = 1);
        assert_eq!(cell.with(|v| *v), 2);
    }
}
