//! Single-owner holder of the current state with change notification.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::reducer;
use crate::types::AppState;

/// Callback run after every transition that produced a new state.
type Subscriber = Box<dyn FnMut(&Arc<AppState>)>;

/// Owns the current state. All changes go through [`Store::dispatch`], which
/// serializes transitions and notifies subscribers when the value changed.
#[derive(Default)]
pub struct Store {
    /// Current state.
    state: Arc<AppState>,
    /// Registered change callbacks, in registration order.
    subscribers: Vec<Subscriber>,
}

impl Store {
    /// A store holding `initial`.
    pub fn new(initial: AppState) -> Self {
        return Self {
            state: Arc::new(initial),
            subscribers: Vec::new(),
        };
    }

    /// The current state.
    pub const fn state(&self) -> &Arc<AppState> {
        return &self.state;
    }

    /// Apply `action` stamped with the current time. Returns whether the state changed.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        return self.dispatch_at(action, Utc::now());
    }

    /// Apply `action` stamped with `now`. Returns whether the state changed.
    pub fn dispatch_at(&mut self, action: &Action, now: DateTime<Utc>) -> bool {
        let next = reducer::reduce(&self.state, action, now);
        if Arc::ptr_eq(&next, &self.state) {
            return false;
        }
        self.state = next;
        tracing::trace!(action = action.name(), "state changed");
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
        return true;
    }

    /// Register a change callback.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&Arc<AppState>) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::Section;

    #[test]
    fn subscribers_only_hear_real_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |state| sink.borrow_mut().push(state.sections.len()));

        assert!(store.dispatch(&Action::AddSection(Section::new("a", "A", Utc::now()))));
        assert!(!store.dispatch(&Action::DeleteSection { id: "missing".to_string() }));
        assert!(store.dispatch(&Action::DeleteSection { id: "a".to_string() }));

        assert_eq!(*seen.borrow(), vec![1, 0]);
        assert!(store.state().sections.is_empty());
    }
}
