//! Communication gateway meant to mediate access to storage.

use super::types::{Request, Response};
use crate::{error::Error, storage::Store};
use anyhow::Result;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::info;

#[derive(Debug)]
pub struct StoreService<F, S> {
    frames: F,
    store: S,
}

impl<F, S> StoreService<F, S>
where
    F: Stream<Item = anyhow::Result<Request>> + Sink<Response, Error = anyhow::Error> + Unpin,
    S: Store<Err = Error>,
{
    pub fn new(frames: F, store: S) -> Self {
        Self { frames, store }
    }

    pub async fn start(mut self) -> Result<()> {
        while let Some(req) = self.frames.next().await {
            let res = self.process(req?).await?;
            self.frames.send(res).await?;
        }
        Ok(())
    }

    async fn process(&mut self, req: Request) -> Result<Response> {
        match req {
            Request::Get { key } => {
                info!(key = %key, "get");
                let value = self.store.get(&key).await?;
                Ok(Response::Get { key, value })
            }
            Request::Set { key, value } => {
                info!(key = %key, kind = %value.kind().name(), "set");
                self.store.set(key.clone(), value).await?;
                Ok(Response::Set { key })
            }
        }
    }
}
