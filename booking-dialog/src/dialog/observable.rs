//! Observable values for view binding.

use tokio::sync::watch;

/// Value a view can read and await changes on.
///
/// Backed by a [`watch`] channel: [`set`](Self::set) only notifies subscribers when the value
/// actually changes.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Creates an observable holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Replaces the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Returns a receiver that observes future changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
