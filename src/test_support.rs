//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use serde_json::{Value, json};

use crate::core::action::{ActionFn, Actions, Args};
use crate::core::state::State;

/// Builds a record from key/value pairs.
pub fn partial(pairs: &[(&str, Value)]) -> State {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// `{ a: 1, b: 2 }`
pub fn test_state() -> State {
    partial(&[("a", json!(1)), ("b", json!(2))])
}

/// A single `updateBoth` action that ignores its arguments.
pub fn update_both_actions() -> Actions {
    Actions::new().with("updateBoth", |_state: &State| -> ActionFn {
        Box::new(|_args: Args| partial(&[("a", json!(1000)), ("b", json!(2000))]))
    })
}
