//! The adapters behave the same over every store.

use anyhow::Result;
use async_options::OptionError;
use async_options::adapter::{v1, v2};
use async_options::store::{MemoryStore, OptionStore, SqliteStore};
use futures::future::join_all;
use std::sync::Arc;

async fn stores() -> Vec<(&'static str, Arc<dyn OptionStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new())),
        ("sqlite", Arc::new(SqliteStore::open_memory().await.unwrap())),
    ]
}

async fn lifecycle(store: Arc<dyn OptionStore>) -> Result<()> {
    use async_options::contract::v1::{AsyncOption, AsyncOptions};

    let options: v1::Options<String, i64> = v1::Options::with_store(store);

    let option = options.option("retries".to_string(), Some(3)).await?;
    assert_eq!(option.value().await?, option.default().await?);

    option.update(|v| v * 10).await?;
    assert_eq!(option.value().await?, 30);

    // Get-or-create returns the existing entry, ignoring the new default
    let again = options.option("retries".to_string(), Some(7)).await?;
    assert_eq!(again.value().await?, 30);
    assert_eq!(again.default().await?, 3);

    again.reset().await?;
    again.reset().await?;
    assert_eq!(option.value().await?, 3);

    options.remove(&"retries".to_string()).await?;
    let err = option.update(|v| v + 1).await.unwrap_err();
    assert!(OptionError::is_missing(&err));

    let fresh = options.option("retries".to_string(), None).await?;
    assert_eq!(fresh.value().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_lifecycle_on_every_store() {
    for (label, store) in stores().await {
        lifecycle(store)
            .await
            .unwrap_or_else(|e| panic!("{} store: {:?}", label, e));
    }
}

async fn insertion(store: Arc<dyn OptionStore>) -> Result<()> {
    use async_options::contract::v2::{AsyncOption, AsyncOptions};

    let options: v2::Options = v2::Options::with_store(store);
    options.add("b".to_string(), "1".to_string(), "0".to_string()).await?;
    options.add("a".to_string(), "x".to_string(), "y".to_string()).await?;

    let all = options.options().await?;
    let names: Vec<_> = all.iter().map(|o| o.name().as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let b = &all[1];
    assert_eq!(b.value().await?, "1");
    b.reset_to_default_value().await?;
    assert_eq!(b.value().await?, "0");

    options.add("b".to_string(), "2".to_string(), "9".to_string()).await?;
    assert_eq!(b.value().await?, "2");
    assert_eq!(b.default().await?, "9");
    Ok(())
}

#[tokio::test]
async fn test_insertion_on_every_store() {
    for (label, store) in stores().await {
        insertion(store)
            .await
            .unwrap_or_else(|e| panic!("{} store: {:?}", label, e));
    }
}

async fn concurrent_updates(store: Arc<dyn OptionStore>) -> Result<()> {
    use async_options::contract::v1::{AsyncOption, AsyncOptions};

    let options: v1::Options<String, u64> = v1::Options::with_store(store);
    let counter = options.option("counter".to_string(), Some(0)).await?;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let counter = counter.clone();
            tokio::spawn(async move { counter.update(|n| n + 1).await })
        })
        .collect();

    for result in join_all(tasks).await {
        result??;
    }

    assert_eq!(counter.value().await?, 50);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_lose_nothing() {
    for (label, store) in stores().await {
        concurrent_updates(store)
            .await
            .unwrap_or_else(|e| panic!("{} store: {:?}", label, e));
    }
}

async fn concurrent_creation(store: Arc<dyn OptionStore>) -> Result<()> {
    use async_options::contract::v1::{AsyncOption, AsyncOptions};

    let options: v1::Options<String, u64> = v1::Options::with_store(store);

    let tasks: Vec<_> = (0..20u64)
        .map(|i| {
            let options = options.clone();
            tokio::spawn(async move { options.option("race".to_string(), Some(i)).await })
        })
        .collect();

    let mut defaults = Vec::new();
    for result in join_all(tasks).await {
        defaults.push(result??.default().await?);
    }

    // Exactly one caller created the entry; everyone sees its default
    defaults.dedup();
    assert_eq!(defaults.len(), 1);
    assert_eq!(options.options().await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_yields_one_entry() {
    for (label, store) in stores().await {
        concurrent_creation(store)
            .await
            .unwrap_or_else(|e| panic!("{} store: {:?}", label, e));
    }
}
