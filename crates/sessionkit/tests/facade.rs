#![cfg(feature = "redis")]

use std::time::Duration;

use serde_json::json;
use sessionkit::core::{Expiry, SessionStore};
use sessionkit::redis::{MemoryClient, RedisSessionStore, RedisSessionStoreConfig};

#[tokio::test]
async fn facade_exposes_a_working_store() {
    let client = MemoryClient::new();
    let store = RedisSessionStore::new(
        client.clone(),
        RedisSessionStoreConfig::default().with_prefix("app:"),
    );
    let data = json!({"userId": 7}).as_object().cloned().unwrap();

    store
        .set("abc", &data, Expiry::After(Duration::from_secs(5)))
        .await
        .unwrap();

    assert!(client.contains_key("app:abc").await);
    assert_eq!(store.get("abc").await.unwrap(), Some(data));
}
