//! Contracts for asynchronous option access
//!
//! Two revisions of the option and collection contracts exist side by side.
//! Their method sets are incompatible, so each lives in its own module and a
//! type implements one revision or the other, never a mix:
//!
//! - [`v1`]: `reset`, get-or-create through `option`, and `remove`
//! - [`v2`]: `reset_to_default_value`, and explicit insertion through `add`
//!
//! The adapters in [`crate::adapter`] follow the same split:
//!
//! ```
//! use async_options::adapter;
//! use async_options::contract::{v1, v2};
//!
//! fn v1_option<T: v1::AsyncOption>() {}
//! fn v1_options<T: v1::AsyncOptions>() {}
//! fn v2_option<T: v2::AsyncOption>() {}
//! fn v2_options<T: v2::AsyncOptions>() {}
//!
//! v1_option::<adapter::v1::OptionHandle>();
//! v1_options::<adapter::v1::Options>();
//! v2_option::<adapter::v2::OptionHandle>();
//! v2_options::<adapter::v2::Options>();
//! ```
//!
//! A revision 1 option does not satisfy revision 2:
//!
//! ```compile_fail
//! use async_options::adapter;
//! use async_options::contract::v2;
//!
//! fn v2_option<T: v2::AsyncOption>() {}
//! v2_option::<adapter::v1::OptionHandle>();
//! ```
//!
//! nor the other way around:
//!
//! ```compile_fail
//! use async_options::adapter;
//! use async_options::contract::v1;
//!
//! fn v1_option<T: v1::AsyncOption>() {}
//! v1_option::<adapter::v2::OptionHandle>();
//! ```
//!
//! The same holds for the collections:
//!
//! ```compile_fail
//! use async_options::adapter;
//! use async_options::contract::v2;
//!
//! fn v2_options<T: v2::AsyncOptions>() {}
//! v2_options::<adapter::v1::Options>();
//! ```
//!
//! ```compile_fail
//! use async_options::adapter;
//! use async_options::contract::v1;
//!
//! fn v1_options<T: v1::AsyncOptions>() {}
//! v1_options::<adapter::v2::Options>();
//! ```
//!
//! A hand-written type is held to the same split. Providing
//! `reset_to_default_value` does not make an option revision 1:
//!
//! ```compile_fail
//! use anyhow::Result;
//! use async_options::contract::v1;
//! use async_trait::async_trait;
//!
//! struct DefaultResettable {
//!     name: String,
//! }
//!
//! #[async_trait]
//! impl v1::AsyncOption for DefaultResettable {
//!     fn name(&self) -> &String {
//!         &self.name
//!     }
//!
//!     async fn value(&self) -> Result<String> {
//!         Ok(String::new())
//!     }
//!
//!     async fn default(&self) -> Result<String> {
//!         Ok(String::new())
//!     }
//!
//!     async fn reset_to_default_value(&self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn update<F>(&self, _update: F) -> Result<()>
//!     where
//!         F: FnOnce(String) -> String + Send,
//!     {
//!         Ok(())
//!     }
//! }
//! ```
//!
//! and a collection with `add` but no `option` or `remove` is not a
//! revision 1 collection:
//!
//! ```compile_fail
//! use anyhow::Result;
//! use async_options::adapter::v1::OptionHandle;
//! use async_options::contract::v1;
//! use async_trait::async_trait;
//!
//! struct Inserting;
//!
//! #[async_trait]
//! impl v1::AsyncOptions for Inserting {
//!     type Entry = OptionHandle;
//!
//!     async fn options(&self) -> Result<Vec<OptionHandle>> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn add(&self, _name: String, _value: String, _default: String) -> Result<()> {
//!         Ok(())
//!     }
//! }
//! ```

mod name;
pub mod v1;
pub mod v2;

pub use name::OptionName;
