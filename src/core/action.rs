//! # Actions
//!
//! Every state change is an `Action`. A setter call becomes `Action::Set`,
//! a custom action call becomes `Action::Custom`.
//!
//! The `reduce()` function takes the previous state and an action,
//! then returns the next state. No side effects here.
//!
//! ```text
//! State + Action  →  reduce()  →  New State
//! ```
//!
//! Custom actions are curried: a factory sees the current state and hands
//! back a function of the caller's positional arguments, which computes a
//! partial update. The partial is shallow-merged into the state.

use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::AutoReducerError;
use crate::core::state::{Partial, State, merge, with_value};

/// Positional arguments forwarded from a dispatcher call.
pub type Args = Vec<Value>;

/// The inner half of a custom action: arguments in, partial update out.
pub type ActionFn = Box<dyn FnOnce(Args) -> Partial>;

/// A custom action factory.
pub trait CustomAction: Send + Sync {
    /// Binds the factory to the current state.
    fn bind(&self, state: &State) -> ActionFn;
}

impl<F> CustomAction for F
where
    F: Fn(&State) -> ActionFn + Send + Sync,
{
    fn bind(&self, state: &State) -> ActionFn {
        self(state)
    }
}

/// Named custom actions, kept in name order.
#[derive(Clone, Default)]
pub struct Actions {
    factories: BTreeMap<String, Arc<dyn CustomAction>>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a closure factory.
    ///
    /// ```ignore
    /// let actions = Actions::new().with("increment", |state| {
    ///     let clicks = state["clicks"].as_i64().unwrap_or(0);
    ///     Box::new(move |args| {
    ///         let by = args.first().and_then(|v| v.as_i64()).unwrap_or(1);
    ///         Partial::from_iter([("clicks".to_string(), json!(clicks + by))])
    ///     })
    /// });
    /// ```
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&State) -> ActionFn + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(factory));
        self
    }

    /// Registers an action, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, action: Arc<dyn CustomAction>) {
        self.factories.insert(name.into(), action);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CustomAction>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn CustomAction>)> {
        self.factories.iter().map(|(name, action)| (name.as_str(), action))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// A dispatched update, consumed by `reduce()`.
#[derive(Clone)]
pub enum Action {
    /// Direct single-key assignment.
    Set { key: String, value: Value },
    /// Invocation of a named custom action with the caller's arguments.
    Custom {
        key: String,
        action: Arc<dyn CustomAction>,
        args: Args,
    },
}

impl Action {
    pub fn key(&self) -> &str {
        match self {
            Action::Set { key, .. } | Action::Custom { key, .. } => key,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Set { key, value } => f
                .debug_struct("Set")
                .field("key", key)
                .field("value", value)
                .finish(),
            Action::Custom { key, args, .. } => f
                .debug_struct("Custom")
                .field("key", key)
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}

/// Computes the next state. `actions` is the map captured at construction.
pub fn reduce(
    actions: &Actions,
    previous: &State,
    action: Action,
) -> Result<State, AutoReducerError> {
    match action {
        Action::Set { key, value } => {
            debug!("reduce: set '{}'", key);
            Ok(with_value(previous, &key, value))
        }
        Action::Custom { key, action, args } => {
            if !actions.contains(&key) {
                return Err(AutoReducerError::UnregisteredAction(key));
            }
            debug!("reduce: custom '{}' with {} arg(s)", key, args.len());
            let partial = action.bind(previous)(args);
            Ok(merge(previous, partial))
        }
    }
}
