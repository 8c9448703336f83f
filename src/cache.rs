//! Cache fronting a key-value store with randomly generated keys.

use crate::{
    error::Error,
    storage::{
        types::{Key, KeyRef, Value},
        Store,
    },
};
use tracing::debug;
use uuid::Uuid;

/// Persists values under fresh random keys and hands the key back.
///
/// Keys are version 4 UUIDs, so two calls never collide in practice.
/// The cache owns nothing beyond its store handle; value lifetime is
/// entirely up to the store behind it.
#[derive(Debug)]
pub struct Cache<S> {
    store: S,
}

impl<S> Cache<S>
where
    S: Store<Err = Error>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist `value` under a fresh key and return the key.
    ///
    /// Costs exactly one write against the store.
    pub async fn store(&mut self, value: impl Into<Value>) -> Result<Key, Error> {
        let key = Uuid::new_v4().to_string();

        debug!(key = %key, "store");

        self.store.set(key.clone(), value.into()).await?;

        Ok(key)
    }

    /// Read back a value previously persisted with [`Cache::store`].
    pub async fn get<'k>(&self, key: KeyRef<'k>) -> Result<Option<Value>, Error> {
        self.store.get(key).await
    }
}
