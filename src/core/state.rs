//! # State Records
//!
//! A state is a flat record: string keys mapped to arbitrary JSON values.
//!
//! ```text
//! State
//! ├── "a": 1
//! ├── "b": 2
//! └── ...            // key set fixed by the initial state
//! ```
//!
//! Nothing here mutates in place. Every helper takes the previous record
//! and returns the next one, which is what the reducer in action.rs needs.

use serde_json::{Map, Value};

/// A state record. Keys are fixed at construction; only values change.
pub type State = Map<String, Value>;

/// A subset of state keys with their new values.
pub type Partial = Map<String, Value>;

/// Returns a copy of `previous` with `key` set to `value`.
pub fn with_value(previous: &State, key: &str, value: Value) -> State {
    let mut next = previous.clone();
    next.insert(key.to_string(), value);
    next
}

/// Shallow merge: keys in `partial` overwrite, everything else is retained.
pub fn merge(previous: &State, partial: Partial) -> State {
    let mut next = previous.clone();
    for (key, value) in partial {
        next.insert(key, value);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use serde_json::json;

    #[test]
    fn test_with_value_replaces_only_target_key() {
        let state = test_state();
        let next = with_value(&state, "a", json!(100));
        assert_eq!(next["a"], json!(100));
        assert_eq!(next["b"], json!(2));
        // previous record is untouched
        assert_eq!(state["a"], json!(1));
    }

    #[test]
    fn test_merge_overwrites_and_retains() {
        let state = test_state();
        let mut partial = Partial::new();
        partial.insert("b".into(), json!("two"));
        let next = merge(&state, partial);
        assert_eq!(next["a"], json!(1));
        assert_eq!(next["b"], json!("two"));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_merge_empty_partial_is_identity() {
        let state = test_state();
        assert_eq!(merge(&state, Partial::new()), state);
    }
}
