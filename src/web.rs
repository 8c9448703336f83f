//! Caching fetcher for web pages backed by the key-value store.
//!
//! Pages are kept under their URL as key, and a fetch counter is kept
//! under `count:$url`. A page stays cached until the store lets go of
//! it; there is no freshness tracking.

use crate::{
    error::Error,
    storage::{types::Value, Store},
};
use anyhow::{Context, Result};
use tracing::info;

pub struct PageCache<S> {
    store: S,
    http: reqwest::Client,
}

impl<S> PageCache<S>
where
    S: Store<Err = Error>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
        }
    }

    /// Return the body of `url`, fetching it only when the store holds
    /// no copy yet.
    pub async fn get_page(&mut self, url: &str) -> Result<String> {
        if let Some(cached) = self.store.get(url).await? {
            let page = cached
                .as_text()
                .context("cached page is not text")?
                .to_owned();
            return Ok(page);
        }

        self.bump_access_count(url).await?;

        info!(url = %url, "fetching page");

        let page = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("unable to fetch {}", url))?
            .text()
            .await
            .with_context(|| format!("unable to read body of {}", url))?;

        self.store.set(url.to_owned(), Value::from(page.clone())).await?;

        Ok(page)
    }

    /// How many times `url` had to be fetched from the network.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        let count = match self.store.get(&count_key(url)).await? {
            Some(value) => value
                .as_int()
                .context("access counter is not an integer")?,
            None => 0,
        };

        Ok(count)
    }

    async fn bump_access_count(&mut self, url: &str) -> Result<()> {
        let count = self.access_count(url).await? + 1;

        self.store.set(count_key(url), Value::from(count)).await?;

        Ok(())
    }
}

fn count_key(url: &str) -> String {
    format!("count:{}", url)
}
