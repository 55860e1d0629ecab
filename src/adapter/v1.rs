//! Revision 1 adapter: get-or-create collections with removal

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::StorableValue;
use super::collection::{Collection, OptionCore};
use crate::contract::OptionName;
use crate::contract::v1::{AsyncOption, AsyncOptions};
use crate::store::OptionStore;

/// Options collection implementing [`AsyncOptions`] (revision 1).
///
/// Options created without an explicit default start at `V::default()`.
pub struct Options<N = String, V = String> {
    collection: Arc<Collection>,
    _types: PhantomData<fn() -> (N, V)>,
}

impl<N, V> Options<N, V> {
    pub fn new(store: impl OptionStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// Build a collection over a store that may be shared with other collections.
    ///
    /// Write locks are per collection: two collections over the same store do
    /// not serialize their writes against each other.
    pub fn with_store(store: Arc<dyn OptionStore>) -> Self {
        Self::from_collection(Collection::new(store))
    }

    pub(crate) fn from_collection(collection: Arc<Collection>) -> Self {
        Self {
            collection,
            _types: PhantomData,
        }
    }

    pub(crate) fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn OptionStore> {
        self.collection.store()
    }
}

impl<N, V> Clone for Options<N, V> {
    fn clone(&self) -> Self {
        Self::from_collection(self.collection.clone())
    }
}

impl<N, V> fmt::Debug for Options<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options").finish_non_exhaustive()
    }
}

/// Same collection, viewed through the revision 2 contract
impl<N, V> From<&super::v2::Options<N, V>> for Options<N, V> {
    fn from(options: &super::v2::Options<N, V>) -> Self {
        Self::from_collection(options.collection().clone())
    }
}

#[async_trait]
impl<N, V> AsyncOptions<N, V> for Options<N, V>
where
    N: OptionName,
    V: StorableValue + Default,
{
    type Entry = OptionHandle<N, V>;

    async fn options(&self) -> Result<Vec<OptionHandle<N, V>>> {
        let cores = Collection::handles(&self.collection).await?;
        Ok(cores.into_iter().map(|core| OptionHandle { core }).collect())
    }

    async fn option(&self, name: N, default: Option<V>) -> Result<OptionHandle<N, V>> {
        let core =
            Collection::get_or_create(&self.collection, name, move || default.unwrap_or_default())
                .await?;
        Ok(OptionHandle { core })
    }

    async fn remove(&self, name: &N) -> Result<()> {
        self.collection.remove(name).await
    }
}

/// A single option implementing [`AsyncOption`] (revision 1)
pub struct OptionHandle<N = String, V = String> {
    core: OptionCore<N, V>,
}

impl<N: Clone, V> Clone for OptionHandle<N, V> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<N, V> fmt::Debug for OptionHandle<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionHandle").field(&self.core).finish()
    }
}

#[async_trait]
impl<N, V> AsyncOption<N, V> for OptionHandle<N, V>
where
    N: OptionName,
    V: StorableValue,
{
    fn name(&self) -> &N {
        &self.core.name
    }

    async fn value(&self) -> Result<V> {
        self.core.value().await
    }

    async fn default(&self) -> Result<V> {
        self.core.default().await
    }

    async fn reset(&self) -> Result<()> {
        self.core.reset().await
    }

    async fn update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(V) -> V + Send,
    {
        self.core.update(update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptionError;
    use crate::store::MemoryStore;

    fn options() -> Options<String, i64> {
        Options::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_new_option_starts_at_default() {
        let options = options();
        let option = options.option("retries".to_string(), Some(3)).await.unwrap();

        assert_eq!(option.name(), "retries");
        assert_eq!(option.value().await.unwrap(), 3);
        assert_eq!(option.default().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_default_uses_type_default() {
        let options = options();
        let option = options.option("counter".to_string(), None).await.unwrap();
        assert_eq!(option.value().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_existing_option_ignores_new_default() {
        let options = options();
        let first = options.option("limit".to_string(), Some(10)).await.unwrap();
        first.update(|_| 42).await.unwrap();

        let second = options.option("limit".to_string(), Some(99)).await.unwrap();
        assert_eq!(second.default().await.unwrap(), 10);
        assert_eq!(second.value().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_update_then_reset() {
        let options = options();
        let option = options.option("limit".to_string(), Some(10)).await.unwrap();

        option.update(|v| v + 5).await.unwrap();
        option.update(|v| v * 2).await.unwrap();
        assert_eq!(option.value().await.unwrap(), 30);

        option.reset().await.unwrap();
        assert_eq!(option.value().await.unwrap(), 10);

        // Idempotent
        option.reset().await.unwrap();
        assert_eq!(option.value().await.unwrap(), 10);
        assert_eq!(option.default().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_with_borrowing_closure() {
        let options = options();
        let option = options.option("total".to_string(), Some(1)).await.unwrap();

        let increments = vec![2, 3, 4];
        option.update(|v| v + increments.iter().sum::<i64>()).await.unwrap();

        assert_eq!(option.value().await.unwrap(), 10);
        assert_eq!(increments.len(), 3);
    }

    #[tokio::test]
    async fn test_handles_share_state() {
        let options = options();
        let a = options.option("shared".to_string(), Some(1)).await.unwrap();
        let b = options.option("shared".to_string(), None).await.unwrap();

        a.update(|_| 7).await.unwrap();
        assert_eq!(b.value().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_options_lists_snapshot_in_key_order() {
        let options = options();
        for name in ["zeta", "alpha", "mid"] {
            options.option(name.to_string(), None).await.unwrap();
        }

        let names: Vec<String> = options
            .options()
            .await
            .unwrap()
            .iter()
            .map(|o| o.name().clone())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_remove_then_recreate() {
        let options = options();
        let old = options.option("temp".to_string(), Some(1)).await.unwrap();
        old.update(|_| 5).await.unwrap();

        options.remove(&"temp".to_string()).await.unwrap();
        assert!(options.options().await.unwrap().is_empty());
        assert!(OptionError::is_missing(&old.value().await.unwrap_err()));

        let fresh = options.option("temp".to_string(), Some(2)).await.unwrap();
        assert_eq!(fresh.value().await.unwrap(), 2);
        assert_eq!(fresh.default().await.unwrap(), 2);

        // The old handle follows the name, not the removed entry
        assert_eq!(old.value().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remove_absent_name_is_noop() {
        let options = options();
        options.remove(&"never-created".to_string()).await.unwrap();
        assert!(options.options().await.unwrap().is_empty());
    }
}
