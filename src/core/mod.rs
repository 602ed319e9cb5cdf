//! # Core
//!
//! The auto reducer itself. It knows nothing about files or terminals
//! except for the script/config adapters used by the binary.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (record)       │
//!                    │  • Action (updates)     │
//!                    │  • reduce() (reducer)   │
//!                    │  • Store (container)    │
//!                    │  • Dispatcher           │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │  script    │            │   your     │
//!             │  replay    │            │   code     │
//!             │  (binary)  │            │            │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `State` record and merge helpers
//! - [`action`]: The `Action` enum, custom actions, and `reduce()`
//! - [`store`]: The `Store` state container
//! - [`dispatcher`]: `AutoReducer` and its `Dispatcher`
//! - [`error`]: `AutoReducerError`
//! - [`config`]: Settings for the binary
//! - [`script`]: Script replay for the binary

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod script;
pub mod state;
pub mod store;
