//! Builds a key-based dispatcher over a reducer-driven state record.
//!
//! ```ignore
//! let mut auto = AutoReducer::new(initial, Some(actions))?;
//! auto.dispatcher().set("username", "ferris")?;
//! auto.dispatcher().call("increment", vec![json!(1)])?;
//! auto.process()?;
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;

pub mod core;

#[cfg(test)]
pub mod test_support;

pub use crate::core::action::{Action, ActionFn, Actions, Args, CustomAction, reduce};
pub use crate::core::dispatcher::{ActionCaller, AutoReducer, Callable, Dispatcher, Setter};
pub use crate::core::error::AutoReducerError;
pub use crate::core::state::{Partial, State};
pub use crate::core::store::{Dispatch, Reducer, Store};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
