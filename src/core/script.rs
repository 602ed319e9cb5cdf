//! # Script Replay
//!
//! Drives an `AutoReducer` from a file: an initial state plus a list of
//! steps. Used by the `autoreducer` binary; the rest of `core` does no I/O.
//!
//! ```json
//! {
//!   "initial": { "a": 1, "b": 2 },
//!   "steps": [
//!     { "op": "set", "key": "a", "value": 100 },
//!     { "op": "flush" },
//!     { "op": "call", "key": "merge", "args": [{ "b": 200 }] }
//!   ]
//! }
//! ```
//!
//! TOML scripts use the same shape (`[initial]` table, `[[steps]]` array).

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::action::{ActionFn, Actions, Args};
use crate::core::dispatcher::AutoReducer;
use crate::core::error::AutoReducerError;
use crate::core::state::{Partial, State};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Script {
    pub initial: State,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Call the setter for `key`.
    Set { key: String, value: Value },
    /// Call the custom action `key` with positional `args`.
    Call {
        key: String,
        #[serde(default)]
        args: Args,
    },
    /// Run an update pass and record a snapshot.
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub builtin_actions: bool,
    pub flush_each_step: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            builtin_actions: true,
            flush_each_step: false,
        }
    }
}

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
    UnsupportedFormat(String),
    Reducer(AutoReducerError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "script I/O error: {e}"),
            ScriptError::Json(e) => write!(f, "script JSON error: {e}"),
            ScriptError::Toml(e) => write!(f, "script TOML error: {e}"),
            ScriptError::UnsupportedFormat(ext) => {
                write!(f, "unsupported script format: {ext:?} (expected .json or .toml)")
            }
            ScriptError::Reducer(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<AutoReducerError> for ScriptError {
    fn from(e: AutoReducerError) -> Self {
        ScriptError::Reducer(e)
    }
}

/// Actions every script can call unless disabled in config.
///
/// - `reset`: restores the values of the initial keys. A partial cannot
///   remove keys, so keys added later (e.g. by `merge`) remain.
/// - `merge`: shallow-merges its first argument when that is an object.
pub fn builtin_actions(initial: &State) -> Actions {
    let initial = initial.clone();
    Actions::new()
        .with("reset", move |_state: &State| -> ActionFn {
            let initial = initial.clone();
            Box::new(move |_args: Args| initial)
        })
        .with("merge", |_state: &State| -> ActionFn {
            Box::new(|args: Args| match args.into_iter().next() {
                Some(Value::Object(partial)) => partial,
                other => {
                    warn!("merge expects an object argument, got {:?}", other);
                    Partial::new()
                }
            })
        })
}

/// Parses a script, picking the format from the file extension.
pub fn load_script(path: &Path) -> Result<Script, ScriptError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let contents = fs::read_to_string(path).map_err(ScriptError::Io)?;
    let script = match extension.as_str() {
        "json" => serde_json::from_str(&contents).map_err(ScriptError::Json)?,
        "toml" => toml::from_str(&contents).map_err(ScriptError::Toml)?,
        _ => return Err(ScriptError::UnsupportedFormat(extension)),
    };
    info!("Loaded script from {}", path.display());
    Ok(script)
}

/// Replays `script` and returns a snapshot per update pass.
///
/// A final pass always runs after the last step, so the last snapshot is
/// the end state.
pub fn run(script: &Script, options: &RunOptions) -> Result<Vec<State>, ScriptError> {
    let actions = options
        .builtin_actions
        .then(|| builtin_actions(&script.initial));
    let mut auto = AutoReducer::new(script.initial.clone(), actions)?;
    let mut snapshots = Vec::new();

    for step in &script.steps {
        match step {
            Step::Set { key, value } => auto.dispatcher().set(key, value.clone())?,
            Step::Call { key, args } => auto.dispatcher().call(key, args.clone())?,
            Step::Flush => {
                auto.process()?;
                snapshots.push(auto.state().clone());
                continue;
            }
        }
        if options.flush_each_step {
            auto.process()?;
            snapshots.push(auto.state().clone());
        }
    }

    auto.process()?;
    snapshots.push(auto.state().clone());
    info!(
        "Script finished: {} step(s), {} snapshot(s)",
        script.steps.len(),
        snapshots.len()
    );
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{partial, test_state};
    use serde_json::json;

    fn script(steps: Vec<Step>) -> Script {
        Script {
            initial: test_state(),
            steps,
        }
    }

    #[test]
    fn test_run_without_steps_returns_initial() {
        let snapshots = run(&script(vec![]), &RunOptions::default()).unwrap();
        assert_eq!(snapshots, vec![test_state()]);
    }

    #[test]
    fn test_flush_records_snapshots() {
        let steps = vec![
            Step::Set {
                key: "a".into(),
                value: json!(100),
            },
            Step::Flush,
            Step::Set {
                key: "b".into(),
                value: json!(200),
            },
        ];
        let snapshots = run(&script(steps), &RunOptions::default()).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0], partial(&[("a", json!(100)), ("b", json!(2))]));
        assert_eq!(snapshots[1], partial(&[("a", json!(100)), ("b", json!(200))]));
    }

    #[test]
    fn test_flush_each_step() {
        let steps = vec![
            Step::Set {
                key: "a".into(),
                value: json!(5),
            },
            Step::Set {
                key: "b".into(),
                value: json!(6),
            },
        ];
        let options = RunOptions {
            flush_each_step: true,
            ..Default::default()
        };
        let snapshots = run(&script(steps), &options).unwrap();
        // one per step plus the final pass
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0]["b"], json!(2));
        assert_eq!(snapshots[1]["b"], json!(6));
    }

    #[test]
    fn test_builtin_merge_and_reset() {
        let steps = vec![
            Step::Call {
                key: "merge".into(),
                args: vec![json!({ "a": 1000, "b": 2000 })],
            },
            Step::Flush,
            Step::Call {
                key: "reset".into(),
                args: vec![],
            },
        ];
        let snapshots = run(&script(steps), &RunOptions::default()).unwrap();
        assert_eq!(snapshots[0], partial(&[("a", json!(1000)), ("b", json!(2000))]));
        assert_eq!(snapshots[1], test_state());
    }

    #[test]
    fn test_reset_after_merge_added_key() {
        let steps = vec![
            Step::Call {
                key: "merge".into(),
                args: vec![json!({ "a": 10, "c": 3 })],
            },
            Step::Flush,
            Step::Call {
                key: "reset".into(),
                args: vec![],
            },
        ];
        let snapshots = run(&script(steps), &RunOptions::default()).unwrap();
        assert_eq!(
            snapshots[0],
            partial(&[("a", json!(10)), ("b", json!(2)), ("c", json!(3))])
        );
        // initial keys are restored, the added key stays
        assert_eq!(
            snapshots[1],
            partial(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))])
        );
    }

    #[test]
    fn test_merge_ignores_non_object() {
        let steps = vec![Step::Call {
            key: "merge".into(),
            args: vec![json!(42)],
        }];
        let snapshots = run(&script(steps), &RunOptions::default()).unwrap();
        assert_eq!(snapshots, vec![test_state()]);
    }

    #[test]
    fn test_builtins_disabled() {
        let steps = vec![Step::Call {
            key: "reset".into(),
            args: vec![],
        }];
        let options = RunOptions {
            builtin_actions: false,
            ..Default::default()
        };
        let err = run(&script(steps), &options).unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Reducer(AutoReducerError::UnknownAction(ref key)) if key == "reset"
        ));
    }

    #[test]
    fn test_state_key_colliding_with_builtin() {
        let mut initial = test_state();
        initial.insert("reset".into(), json!(true));
        let err = run(
            &Script {
                initial,
                steps: vec![],
            },
            &RunOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate key in state and actions: reset");
    }

    #[test]
    fn test_parse_json_script() {
        let json_str = r#"{
            "initial": { "a": 1, "b": 2 },
            "steps": [
                { "op": "set", "key": "a", "value": 100 },
                { "op": "call", "key": "merge", "args": [{ "b": 3 }] },
                { "op": "call", "key": "reset" },
                { "op": "flush" }
            ]
        }"#;
        let script: Script = serde_json::from_str(json_str).unwrap();
        assert_eq!(script.initial, test_state());
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[2],
            Step::Call {
                key: "reset".into(),
                args: vec![]
            }
        );
        assert_eq!(script.steps[3], Step::Flush);
    }

    #[test]
    fn test_parse_toml_script() {
        let toml_str = r#"
[initial]
a = 1
b = 2

[[steps]]
op = "set"
key = "b"
value = "two"

[[steps]]
op = "flush"
"#;
        let script: Script = toml::from_str(toml_str).unwrap();
        assert_eq!(script.initial, test_state());
        assert_eq!(
            script.steps[0],
            Step::Set {
                key: "b".into(),
                value: json!("two")
            }
        );
    }

    #[test]
    fn test_load_script_rejects_unknown_extension() {
        let path = std::env::temp_dir().join(format!("autoreducer-{}.yaml", std::process::id()));
        fs::write(&path, "initial: {}").unwrap();
        let result = load_script(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ScriptError::UnsupportedFormat(ref ext)) if ext == "yaml"));
    }

    #[test]
    fn test_load_script_missing_file() {
        let path = std::env::temp_dir().join("autoreducer-does-not-exist.json");
        assert!(matches!(load_script(&path), Err(ScriptError::Io(_))));
    }
}
