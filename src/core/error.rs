use std::fmt;

/// Errors raised while building or driving an auto reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoReducerError {
    /// A custom action shares its name with a state key. Raised at construction.
    DuplicateKey(String),
    /// The reducer saw a custom action that was never registered. Programming error.
    UnregisteredAction(String),
    /// `Dispatcher::set` was given a key with no setter.
    UnknownSetter(String),
    /// `Dispatcher::call` was given a key with no custom action.
    UnknownAction(String),
}

impl fmt::Display for AutoReducerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoReducerError::DuplicateKey(key) => {
                write!(f, "Duplicate key in state and actions: {key}")
            }
            AutoReducerError::UnregisteredAction(key) => write!(
                f,
                "Somehow you tried to dispatch an action that was not initialized: {key}"
            ),
            AutoReducerError::UnknownSetter(key) => write!(f, "no setter for state key: {key}"),
            AutoReducerError::UnknownAction(key) => write!(f, "no custom action named: {key}"),
        }
    }
}

impl std::error::Error for AutoReducerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message() {
        let err = AutoReducerError::DuplicateKey("a".into());
        assert_eq!(err.to_string(), "Duplicate key in state and actions: a");
    }

    #[test]
    fn test_unregistered_action_names_key() {
        let err = AutoReducerError::UnregisteredAction("ghost".into());
        assert!(err.to_string().ends_with(": ghost"));
    }
}
