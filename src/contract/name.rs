//! Mapping between typed option names and storage keys

use anyhow::Result;
use std::hash::Hash;

/// A type usable as the name of an option.
///
/// Stores are keyed by plain strings, so a name must render to a key and be
/// recoverable from one (enumeration reads keys back out of the store).
///
/// ```
/// use async_options::{OptionError, OptionName};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum Setting {
///     Theme,
///     PageSize,
/// }
///
/// impl OptionName for Setting {
///     fn key(&self) -> String {
///         match self {
///             Setting::Theme => "ui.theme".to_string(),
///             Setting::PageSize => "query.page_size".to_string(),
///         }
///     }
///
///     fn from_key(key: &str) -> anyhow::Result<Self> {
///         match key {
///             "ui.theme" => Ok(Setting::Theme),
///             "query.page_size" => Ok(Setting::PageSize),
///             _ => Err(OptionError::InvalidName {
///                 key: key.to_string(),
///                 reason: "unknown setting".to_string(),
///             }
///             .into()),
///         }
///     }
/// }
///
/// assert_eq!(Setting::from_key(&Setting::Theme.key()).unwrap(), Setting::Theme);
/// ```
pub trait OptionName: Clone + Eq + Hash + Send + Sync + 'static {
    /// The storage key for this name
    fn key(&self) -> String;

    /// Parse a storage key back into a name
    fn from_key(key: &str) -> Result<Self>;
}

impl OptionName for String {
    fn key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Result<Self> {
        Ok(key.to_string())
    }
}
