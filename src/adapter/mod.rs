//! Contract implementations on top of an [`OptionStore`](crate::store::OptionStore)
//!
//! [`v1`] implements the revision 1 contracts, [`v2`] the revision 2
//! contracts. Both are thin wrappers around the same collection core:
//!
//! - values are JSON-encoded with serde_json before they reach the store
//! - handles hold no cached state; every call reads or writes through
//! - writes to one option are serialized by a per-name lock shared by a
//!   collection, its clones, the handles it produced and any view converted
//!   from it with `From`
//!
//! ```
//! use async_options::adapter::v1::Options;
//! use async_options::contract::v1::{AsyncOption, AsyncOptions};
//! use async_options::store::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let options: Options<String, u32> = Options::new(MemoryStore::new());
//!
//! let page_size = options.option("page_size".to_string(), Some(50)).await?;
//! page_size.update(|size| size * 2).await?;
//! assert_eq!(page_size.value().await?, 100);
//!
//! page_size.reset().await?;
//! assert_eq!(page_size.value().await?, 50);
//! # Ok(())
//! # }
//! ```

mod collection;
mod locks;
pub mod v1;
pub mod v2;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Values an adapter can store: anything serde can round-trip through JSON.
pub trait StorableValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> StorableValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}
