//! Asynchronous named options with defaults
//!
//! - [`contract`]: the option and collection traits, in two revisions
//! - [`store`]: the key/value collaborator options are persisted through
//! - [`adapter`]: contract implementations over any store

pub mod adapter;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod store;
pub mod value;

pub use contract::OptionName;
pub use error::OptionError;
pub use value::OptionValue;
