//! Error conditions callers may want to match on
//!
//! Everything in this crate returns `anyhow::Result`. The variants below are
//! raised through anyhow and can be recovered with `downcast_ref`:
//!
//! ```
//! use async_options::OptionError;
//!
//! let err = anyhow::Error::new(OptionError::Missing { name: "theme".to_string() });
//! assert!(matches!(err.downcast_ref::<OptionError>(), Some(OptionError::Missing { .. })));
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionError {
    /// The option behind a handle no longer exists in its store.
    #[error("option '{name}' does not exist")]
    Missing { name: String },

    /// A stored value could not be encoded or decoded.
    #[error("failed to encode or decode value of option '{name}'")]
    Codec {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A storage key could not be turned back into an option name.
    #[error("invalid option name '{key}': {reason}")]
    InvalidName { key: String, reason: String },
}

impl OptionError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    pub fn codec(name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Codec {
            name: name.into(),
            source,
        }
    }

    /// Returns `true` if `err` is (or wraps) a [`OptionError::Missing`].
    pub fn is_missing(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<Self>(), Some(Self::Missing { .. }))
    }
}
