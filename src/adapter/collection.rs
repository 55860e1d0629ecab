//! Shared core of the v1 and v2 adapters

use anyhow::Result;
use log::{debug, info};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::StorableValue;
use super::locks::KeyLocks;
use crate::contract::OptionName;
use crate::error::OptionError;
use crate::store::{OptionStore, StoredEntry};

/// A store plus the write locks for the names it holds
pub(crate) struct Collection {
    store: Arc<dyn OptionStore>,
    locks: KeyLocks,
}

impl Collection {
    pub(crate) fn new(store: Arc<dyn OptionStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            locks: KeyLocks::default(),
        })
    }

    pub(crate) fn store(&self) -> &Arc<dyn OptionStore> {
        &self.store
    }

    /// Handles for every entry in the store, in key order
    pub(crate) async fn handles<N, V>(this: &Arc<Self>) -> Result<Vec<OptionCore<N, V>>>
    where
        N: OptionName,
        V: StorableValue,
    {
        this.store
            .list()
            .await?
            .into_iter()
            .map(|(key, _)| {
                let name = N::from_key(&key)?;
                Ok::<_, anyhow::Error>(OptionCore::new(name, key, this.clone()))
            })
            .collect()
    }

    /// Return the entry for `name`, creating it with `default` if absent
    pub(crate) async fn get_or_create<N, V>(
        this: &Arc<Self>,
        name: N,
        default: impl FnOnce() -> V,
    ) -> Result<OptionCore<N, V>>
    where
        N: OptionName,
        V: StorableValue,
    {
        let key = name.key();
        let _guard = this.locks.lock(&key).await;

        if this.store.get(&key).await?.is_none() {
            let default = encode(&key, &default())?;
            this.store.set(&key, StoredEntry::with_default(default)).await?;
            info!("Created option: {}", key);
        }

        Ok(OptionCore::new(name, key, this.clone()))
    }

    /// Insert or replace the entry for `name`
    pub(crate) async fn insert<N, V>(&self, name: &N, value: &V, default: &V) -> Result<()>
    where
        N: OptionName,
        V: StorableValue,
    {
        let key = name.key();
        let entry = StoredEntry::new(encode(&key, value)?, encode(&key, default)?);

        let _guard = self.locks.lock(&key).await;
        let replaced = self.store.get(&key).await?.is_some();
        self.store.set(&key, entry).await?;

        if replaced {
            info!("Replaced option: {}", key);
        } else {
            info!("Added option: {}", key);
        }
        Ok(())
    }

    /// Delete the entry for `name`; absent names are ignored
    pub(crate) async fn remove<N: OptionName>(&self, name: &N) -> Result<()> {
        let key = name.key();
        let _guard = self.locks.lock(&key).await;

        if self.store.delete(&key).await? {
            info!("Removed option: {}", key);
        } else {
            debug!("Option {} was not present, nothing to remove", key);
        }
        Ok(())
    }
}

/// One option inside a [`Collection`]
pub(crate) struct OptionCore<N, V> {
    pub(crate) name: N,
    key: String,
    collection: Arc<Collection>,
    _value: PhantomData<fn() -> V>,
}

impl<N, V> OptionCore<N, V>
where
    N: OptionName,
    V: StorableValue,
{
    fn new(name: N, key: String, collection: Arc<Collection>) -> Self {
        Self {
            name,
            key,
            collection,
            _value: PhantomData,
        }
    }

    async fn entry(&self) -> Result<StoredEntry> {
        self.collection
            .store
            .get(&self.key)
            .await?
            .ok_or_else(|| OptionError::missing(&self.key).into())
    }

    pub(crate) async fn value(&self) -> Result<V> {
        decode(&self.key, &self.entry().await?.value)
    }

    pub(crate) async fn default(&self) -> Result<V> {
        decode(&self.key, &self.entry().await?.default)
    }

    pub(crate) async fn reset(&self) -> Result<()> {
        let _guard = self.collection.locks.lock(&self.key).await;
        let entry = self.entry().await?;

        // Stored default is already encoded
        if !self.collection.store.set_value(&self.key, &entry.default).await? {
            return Err(OptionError::missing(&self.key).into());
        }
        debug!("Reset option {} to its default", self.key);
        Ok(())
    }

    pub(crate) async fn update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(V) -> V + Send,
    {
        let _guard = self.collection.locks.lock(&self.key).await;
        let current: V = decode(&self.key, &self.entry().await?.value)?;

        let updated = encode(&self.key, &update(current))?;
        if !self.collection.store.set_value(&self.key, &updated).await? {
            return Err(OptionError::missing(&self.key).into());
        }
        debug!("Updated option {} = {}", self.key, updated);
        Ok(())
    }
}

impl<N: Clone, V> Clone for OptionCore<N, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            key: self.key.clone(),
            collection: self.collection.clone(),
            _value: PhantomData,
        }
    }
}

impl<N, V> fmt::Debug for OptionCore<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionCore").field("key", &self.key).finish()
    }
}

fn encode<V: StorableValue>(key: &str, value: &V) -> Result<String> {
    serde_json::to_string(value).map_err(|e| OptionError::codec(key, e).into())
}

fn decode<V: StorableValue>(key: &str, raw: &str) -> Result<V> {
    serde_json::from_str(raw).map_err(|e| OptionError::codec(key, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn collection() -> Arc<Collection> {
        Collection::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_values_are_stored_as_json() {
        let collection = collection();
        let option: OptionCore<String, Vec<u8>> =
            Collection::get_or_create(&collection, "bytes".to_string(), || vec![1, 2])
                .await
                .unwrap();
        option
            .update(|mut v| {
                v.push(3);
                v
            })
            .await
            .unwrap();

        let entry = collection.store().get("bytes").await.unwrap().unwrap();
        assert_eq!(entry, StoredEntry::new("[1,2,3]", "[1,2]"));
    }

    #[tokio::test]
    async fn test_undecodable_value_reports_codec_error() {
        let collection = collection();
        collection
            .store()
            .set("broken", StoredEntry::with_default("not json"))
            .await
            .unwrap();

        let option: OptionCore<String, u32> =
            Collection::get_or_create(&collection, "broken".to_string(), || 0)
                .await
                .unwrap();
        let err = option.value().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptionError>(),
            Some(OptionError::Codec { .. })
        ));
    }

    #[tokio::test]
    async fn test_handles_fail_once_entry_is_gone() {
        let collection = collection();
        let option: OptionCore<String, u32> =
            Collection::get_or_create(&collection, "gone".to_string(), || 1)
                .await
                .unwrap();
        collection.remove(&"gone".to_string()).await.unwrap();

        assert!(OptionError::is_missing(&option.value().await.unwrap_err()));
        assert!(OptionError::is_missing(&option.default().await.unwrap_err()));
        assert!(OptionError::is_missing(&option.reset().await.unwrap_err()));
        assert!(OptionError::is_missing(&option.update(|v| v + 1).await.unwrap_err()));
    }
}
