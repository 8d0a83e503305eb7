//! Subscription lifetimes scoped to view reuse.
//!
//! A recycled view outlives the row it was bound to. Anything that updates
//! a bound view asynchronously must therefore stop at the next reuse event,
//! not when the view object is dropped. [`ReuseScope`] issues
//! [`ReuseToken`]s; invalidating the scope (on every bind and unbind)
//! turns every previously issued token inactive.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::mpsc;

/// Issues tokens for the current binding generation of a reusable view.
#[derive(Debug, Default)]
pub struct ReuseScope {
    generation: Rc<Cell<u64>>,
}

impl ReuseScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a token that stays active until the next [`invalidate`](Self::invalidate).
    pub fn token(&self) -> ReuseToken {
        ReuseToken {
            generation: Rc::downgrade(&self.generation),
            issued: self.generation.get(),
        }
    }

    /// Ends the current generation. Every outstanding token becomes inactive.
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

/// Cancellation token checked by deferred callbacks before touching a view.
#[derive(Clone, Debug)]
pub struct ReuseToken {
    generation: Weak<Cell<u64>>,
    issued: u64,
}

impl ReuseToken {
    /// A token that is never active. Used for storages that are not bound yet.
    pub fn inactive() -> Self {
        Self {
            generation: Weak::new(),
            issued: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.generation
            .upgrade()
            .map(|generation| generation.get() == self.issued)
            .unwrap_or(false)
    }

    /// Runs `f` only while the token is active.
    pub fn run_if_active<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if self.is_active() {
            Some(f())
        } else {
            None
        }
    }
}

/// Creates a channel whose values are produced on any thread and applied on
/// the UI thread for as long as `token` is active.
pub fn bound_channel<T: Send>(token: ReuseToken) -> (BoundSender<T>, BoundReceiver<T>) {
    let (sender, receiver) = mpsc::channel();
    (BoundSender { sender }, BoundReceiver { receiver, token })
}

/// Thread-safe producer half of [`bound_channel`].
#[derive(Debug)]
pub struct BoundSender<T> {
    sender: mpsc::Sender<T>,
}

impl<T> Clone for BoundSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> BoundSender<T> {
    /// Queues a value. Returns `false` once the receiving side is gone.
    pub fn send(&self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }
}

/// UI-thread consumer half of [`bound_channel`].
#[derive(Debug)]
pub struct BoundReceiver<T> {
    receiver: mpsc::Receiver<T>,
    token: ReuseToken,
}

impl<T> BoundReceiver<T> {
    pub fn is_active(&self) -> bool {
        self.token.is_active()
    }

    /// Applies every pending value in arrival order and returns how many were
    /// applied. Once the token is inactive pending values are discarded.
    pub fn drain(&self, mut apply: impl FnMut(T)) -> usize {
        let mut applied = 0;
        while let Ok(value) = self.receiver.try_recv() {
            if self.token.is_active() {
                apply(value);
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expires_on_invalidate() {
        let scope = ReuseScope::new();
        let token = scope.token();
        assert!(token.is_active());

        scope.invalidate();
        assert!(!token.is_active());
        assert!(scope.token().is_active());
    }

    #[test]
    fn test_token_expires_when_scope_dropped() {
        let scope = ReuseScope::new();
        let token = scope.token();
        drop(scope);
        assert!(!token.is_active());
        assert_eq!(token.run_if_active(|| 1), None);
    }

    #[test]
    fn test_inactive_token_never_runs() {
        assert!(!ReuseToken::inactive().is_active());
    }

    #[test]
    fn test_channel_applies_values_from_other_threads() {
        let scope = ReuseScope::new();
        let (sender, receiver) = bound_channel::<String>(scope.token());

        let worker = std::thread::spawn(move || {
            sender.send("first".to_string());
            sender.send("second".to_string());
        });
        worker.join().unwrap();

        let mut seen = Vec::new();
        assert_eq!(receiver.drain(|value| seen.push(value)), 2);
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn test_channel_drops_values_after_reuse() {
        let scope = ReuseScope::new();
        let (sender, receiver) = bound_channel::<u32>(scope.token());
        sender.send(1);
        scope.invalidate();
        sender.send(2);

        let mut seen = Vec::new();
        assert_eq!(receiver.drain(|value| seen.push(value)), 0);
        assert!(seen.is_empty());
        assert!(!receiver.is_active());
    }
}
