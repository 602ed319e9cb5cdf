//! # Auto Dispatcher
//!
//! Builds a `Store` over a state record and hands back one callable per
//! key: a setter for every state key and a caller for every custom action.
//!
//! ```text
//! AutoReducer
//! ├── store: Store<State, Action, AutoReducerError>
//! └── dispatcher: Dispatcher
//!     ├── "a"          → Setter        → Action::Set
//!     ├── "b"          → Setter        → Action::Set
//!     └── "updateBoth" → ActionCaller  → Action::Custom
//! ```
//!
//! State key names and action names must not overlap; construction fails
//! before any store exists if they do.

use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::action::{Action, Actions, Args, CustomAction, reduce};
use crate::core::error::AutoReducerError;
use crate::core::state::State;
use crate::core::store::{Dispatch, Store};

/// Dispatches `Action::Set` for one state key.
#[derive(Clone)]
pub struct Setter {
    key: String,
    dispatch: Dispatch<Action>,
}

impl Setter {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set(&self, value: impl Into<Value>) {
        let value = value.into();
        debug!("Dispatching set '{}'", self.key);
        self.dispatch.send(Action::Set {
            key: self.key.clone(),
            value,
        });
    }
}

/// Dispatches `Action::Custom` for one custom action.
#[derive(Clone)]
pub struct ActionCaller {
    key: String,
    action: Arc<dyn CustomAction>,
    dispatch: Dispatch<Action>,
}

impl ActionCaller {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Forwards `args` positionally. An empty list invokes the action with no arguments.
    pub fn call(&self, args: Args) {
        debug!("Dispatching custom '{}' with {} arg(s)", self.key, args.len());
        self.dispatch.send(Action::Custom {
            key: self.key.clone(),
            action: self.action.clone(),
            args,
        });
    }
}

#[derive(Clone)]
pub enum Callable {
    Setter(Setter),
    Action(ActionCaller),
}

impl Callable {
    pub fn key(&self) -> &str {
        match self {
            Callable::Setter(setter) => setter.key(),
            Callable::Action(caller) => caller.key(),
        }
    }
}

/// One callable per state key and per custom action.
#[derive(Clone, Default)]
pub struct Dispatcher {
    callables: BTreeMap<String, Callable>,
}

impl Dispatcher {
    pub fn get(&self, key: &str) -> Option<&Callable> {
        self.callables.get(key)
    }

    pub fn setter(&self, key: &str) -> Option<&Setter> {
        match self.callables.get(key) {
            Some(Callable::Setter(setter)) => Some(setter),
            _ => None,
        }
    }

    pub fn action(&self, key: &str) -> Option<&ActionCaller> {
        match self.callables.get(key) {
            Some(Callable::Action(caller)) => Some(caller),
            _ => None,
        }
    }

    /// Shorthand for `setter(key)?.set(value)`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), AutoReducerError> {
        let setter = self
            .setter(key)
            .ok_or_else(|| AutoReducerError::UnknownSetter(key.to_string()))?;
        setter.set(value);
        Ok(())
    }

    /// Shorthand for `action(key)?.call(args)`.
    pub fn call(&self, key: &str, args: Args) -> Result<(), AutoReducerError> {
        let caller = self
            .action(key)
            .ok_or_else(|| AutoReducerError::UnknownAction(key.to_string()))?;
        caller.call(args);
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.callables.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.callables.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

/// A state record with an automatically derived dispatcher.
pub struct AutoReducer {
    store: Store<State, Action, AutoReducerError>,
    dispatcher: Dispatcher,
}

impl AutoReducer {
    /// Validates key disjointness, then wires the store and the dispatcher.
    pub fn new(initial: State, actions: Option<Actions>) -> Result<Self, AutoReducerError> {
        let actions = actions.unwrap_or_default();

        if let Some(name) = actions.names().find(|name| initial.contains_key(*name)) {
            return Err(AutoReducerError::DuplicateKey(name.to_string()));
        }

        info!(
            "Building auto reducer: {} state key(s), {} custom action(s)",
            initial.len(),
            actions.len()
        );

        let state_keys: Vec<String> = initial.keys().cloned().collect();
        let captured = actions.clone();
        let store = Store::new(
            Box::new(move |previous: &State, action: Action| {
                reduce(&captured, previous, action)
            }),
            initial,
        );

        let state_dispatcher = state_keys.into_iter().map(|key| {
            let setter = Setter {
                key: key.clone(),
                dispatch: store.dispatch(),
            };
            (key, Callable::Setter(setter))
        });

        let custom_dispatcher = actions.iter().map(|(name, action)| {
            let caller = ActionCaller {
                key: name.to_string(),
                action: action.clone(),
                dispatch: store.dispatch(),
            };
            (name.to_string(), Callable::Action(caller))
        });

        let callables = state_dispatcher.chain(custom_dispatcher).collect();

        Ok(Self {
            store,
            dispatcher: Dispatcher { callables },
        })
    }

    /// The state as of the last update pass.
    pub fn state(&self) -> &State {
        self.store.state()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// `(state, dispatcher)` in one borrow.
    pub fn parts(&self) -> (&State, &Dispatcher) {
        (self.state(), &self.dispatcher)
    }

    /// Runs an update pass over everything dispatched since the last one.
    pub fn process(&mut self) -> Result<usize, AutoReducerError> {
        self.store.process()
    }
}
