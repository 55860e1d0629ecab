//! Revision 2 adapter: collections filled by explicit insertion

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::StorableValue;
use super::collection::{Collection, OptionCore};
use crate::contract::OptionName;
use crate::contract::v2::{AsyncOption, AsyncOptions};
use crate::store::OptionStore;

/// Options collection implementing [`AsyncOptions`] (revision 2).
///
/// [`add`](AsyncOptions::add) replaces an existing option of the same name,
/// current value and default alike.
pub struct Options<N = String, V = String> {
    collection: Arc<Collection>,
    _types: PhantomData<fn() -> (N, V)>,
}

impl<N, V> Options<N, V> {
    pub fn new(store: impl OptionStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<dyn OptionStore>) -> Self {
        Self::from_collection(Collection::new(store))
    }

    fn from_collection(collection: Arc<Collection>) -> Self {
        Self {
            collection,
            _types: PhantomData,
        }
    }

    pub(crate) fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }

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
impl<N, V> From<&super::v1::Options<N, V>> for Options<N, V> {
    fn from(options: &super::v1::Options<N, V>) -> Self {
        Self::from_collection(options.collection().clone())
    }
}

#[async_trait]
impl<N, V> AsyncOptions<N, V> for Options<N, V>
where
    N: OptionName,
    V: StorableValue,
{
    type Entry = OptionHandle<N, V>;

    async fn options(&self) -> Result<Vec<OptionHandle<N, V>>> {
        let cores = Collection::handles(&self.collection).await?;
        Ok(cores.into_iter().map(|core| OptionHandle { core }).collect())
    }

    async fn add(&self, name: N, value: V, default: V) -> Result<()> {
        self.collection.insert(&name, &value, &default).await
    }
}

/// A single option implementing [`AsyncOption`] (revision 2)
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

    async fn reset_to_default_value(&self) -> Result<()> {
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
    use crate::store::MemoryStore;

    async fn find(options: &Options, name: &str) -> OptionHandle {
        options
            .options()
            .await
            .unwrap()
            .into_iter()
            .find(|o| o.name() == name)
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_keeps_value_and_default_apart() {
        let options: Options = Options::new(MemoryStore::new());
        options
            .add("theme".to_string(), "dark".to_string(), "light".to_string())
            .await
            .unwrap();

        let theme = find(&options, "theme").await;
        assert_eq!(theme.value().await.unwrap(), "dark");
        assert_eq!(theme.default().await.unwrap(), "light");

        theme.reset_to_default_value().await.unwrap();
        assert_eq!(theme.value().await.unwrap(), "light");
    }

    #[tokio::test]
    async fn test_add_overwrites_existing_option() {
        let options: Options = Options::new(MemoryStore::new());
        options
            .add("theme".to_string(), "dark".to_string(), "light".to_string())
            .await
            .unwrap();
        let handle = find(&options, "theme").await;

        options
            .add("theme".to_string(), "blue".to_string(), "system".to_string())
            .await
            .unwrap();

        assert_eq!(options.options().await.unwrap().len(), 1);
        assert_eq!(handle.value().await.unwrap(), "blue");
        assert_eq!(handle.default().await.unwrap(), "system");
    }

    #[tokio::test]
    async fn test_update() {
        let options: Options = Options::new(MemoryStore::new());
        options
            .add("greeting".to_string(), "hi".to_string(), "hello".to_string())
            .await
            .unwrap();

        let greeting = find(&options, "greeting").await;
        greeting.update(|v| format!("{v}!")).await.unwrap();
        assert_eq!(greeting.value().await.unwrap(), "hi!");
    }

    #[tokio::test]
    async fn test_update_with_borrowing_closure() {
        let options: Options = Options::new(MemoryStore::new());
        options
            .add("path".to_string(), "/tmp".to_string(), "/".to_string())
            .await
            .unwrap();

        let suffix = String::from("/cache");
        let path = find(&options, "path").await;
        path.update(|v| v + &suffix).await.unwrap();

        assert_eq!(path.value().await.unwrap(), "/tmp/cache");
        assert_eq!(suffix, "/cache");
    }

    #[tokio::test]
    async fn test_views_share_one_collection() {
        let inserting: Options = Options::new(MemoryStore::new());
        let creating = crate::adapter::v1::Options::from(&inserting);

        inserting
            .add("shared".to_string(), "a".to_string(), "b".to_string())
            .await
            .unwrap();

        use crate::contract::v1::{AsyncOption as _, AsyncOptions as _};
        let handle = creating.option("shared".to_string(), None).await.unwrap();
        assert_eq!(handle.value().await.unwrap(), "a");
    }
}
