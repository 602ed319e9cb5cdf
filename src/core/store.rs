//! # Store
//!
//! The state container. Owns the current state and a reducer, and queues
//! dispatched actions on a channel until the owner runs an update pass.
//!
//! ```text
//! Dispatch::send(action) ──► mpsc channel ──► Store::process()
//!                                               │
//!                                               ▼
//!                                   state = reducer(&state, action)
//! ```
//!
//! Dispatching never touches the state directly, so a snapshot read from
//! `state()` is stable until the next `process()`.

use log::{debug, warn};
use std::sync::mpsc;

/// A reducer: previous state and one action in, next state out.
pub type Reducer<S, A, E> = Box<dyn Fn(&S, A) -> Result<S, E>>;

pub struct Store<S, A, E> {
    state: S,
    reducer: Reducer<S, A, E>,
    sender: mpsc::Sender<A>,
    receiver: mpsc::Receiver<A>,
}

impl<S, A, E> Store<S, A, E> {
    pub fn new(reducer: Reducer<S, A, E>, initial: S) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            state: initial,
            reducer,
            sender,
            receiver,
        }
    }

    /// The state as of the last update pass.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// A handle for enqueueing actions. Cheap to clone.
    pub fn dispatch(&self) -> Dispatch<A> {
        Dispatch {
            sender: self.sender.clone(),
        }
    }

    /// Applies every queued action in issue order and returns how many ran.
    ///
    /// Stops at the first reducer error. The state keeps the last good value
    /// and any actions queued after the failing one stay queued.
    pub fn process(&mut self) -> Result<usize, E> {
        let mut applied = 0usize;
        while let Ok(action) = self.receiver.try_recv() {
            match (self.reducer)(&self.state, action) {
                Ok(next) => self.state = next,
                Err(e) => {
                    warn!("Update pass stopped after {} action(s)", applied);
                    return Err(e);
                }
            }
            applied += 1;
        }
        if applied > 0 {
            debug!("Store processed {} action(s)", applied);
        }
        Ok(applied)
    }
}

/// Send half of a store's queue.
pub struct Dispatch<A> {
    sender: mpsc::Sender<A>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A> Dispatch<A> {
    /// Enqueues one action. Fire-and-forget: if the store is gone the
    /// action is dropped with a warning.
    pub fn send(&self, action: A) {
        if self.sender.send(action).is_err() {
            warn!("Failed to dispatch action: store dropped");
        }
    }
}
