//! Revision 2: `reset_to_default_value` and explicit `add`

use anyhow::Result;
use async_trait::async_trait;

/// One named value with a default and a current value.
#[async_trait]
pub trait AsyncOption<N = String, V = String>: Send + Sync {
    fn name(&self) -> &N;

    async fn value(&self) -> Result<V>;

    async fn default(&self) -> Result<V>;

    /// Set the current value back to the default. Idempotent.
    async fn reset_to_default_value(&self) -> Result<()>;

    /// Replace the current value with `update(current)`.
    async fn update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(V) -> V + Send;
}

/// A keyed collection of [`AsyncOption`]s populated by explicit insertion.
#[async_trait]
pub trait AsyncOptions<N = String, V = String>: Send + Sync {
    type Entry: AsyncOption<N, V>;

    /// Snapshot of all options currently known to the collection.
    async fn options(&self) -> Result<Vec<Self::Entry>>;

    /// Insert the option `name` with a current and a default value.
    async fn add(&self, name: N, value: V, default: V) -> Result<()>;
}
