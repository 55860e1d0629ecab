//! Revision 1: `reset`, get-or-create and `remove`

use anyhow::Result;
use async_trait::async_trait;

/// One named value with a default and a current value.
///
/// Right after creation the current value equals the default. The current
/// value can be replaced through [`update`](AsyncOption::update) and restored
/// through [`reset`](AsyncOption::reset).
#[async_trait]
pub trait AsyncOption<N = String, V = String>: Send + Sync {
    /// Name of the option. Stable for the life of the instance.
    fn name(&self) -> &N;

    /// Current value. May differ from the default.
    async fn value(&self) -> Result<V>;

    /// Default value, fixed when the option was created.
    async fn default(&self) -> Result<V>;

    /// Set the current value back to the default. Idempotent.
    async fn reset(&self) -> Result<()>;

    /// Replace the current value with `update(current)`.
    async fn update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(V) -> V + Send;
}

/// A keyed collection of [`AsyncOption`]s.
#[async_trait]
pub trait AsyncOptions<N = String, V = String>: Send + Sync {
    type Entry: AsyncOption<N, V>;

    /// Snapshot of all options currently known to the collection.
    async fn options(&self) -> Result<Vec<Self::Entry>>;

    /// Get or create the option called `name`.
    ///
    /// An existing option is returned as is and `default` is ignored. A new
    /// option is created with `default`, or an implementation-defined value
    /// when none is given.
    async fn option(&self, name: N, default: Option<V>) -> Result<Self::Entry>;

    /// Remove the option called `name`. A later [`option`](AsyncOptions::option)
    /// call for the same name creates a fresh entry.
    async fn remove(&self, name: &N) -> Result<()>;
}
