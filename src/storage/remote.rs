//! Networked key-value storage speaking the wire protocol.
//!
//! The connection is owned by a background task, mirroring the shape of
//! the in-memory backend: handles reach it through a command channel and
//! collect the outcome over a oneshot callback.

use super::types::{Command, Key, KeyRef, Value};
use crate::{
    api,
    api::types::{Request, Response},
    error::Error,
};
use anyhow::anyhow;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpStream, ToSocketAddrs},
    sync::{mpsc, oneshot},
};
use tokio_util::codec::Framed;
use tracing::debug;

#[derive(Debug)]
pub struct Backend<T> {
    framed: Framed<T, api::codec::ClientCodec>,
    commands: mpsc::Receiver<Command>,
}

#[derive(Debug, Clone)]
pub struct Store {
    commands: mpsc::Sender<Command>,
}

/// Connect to a store listening at `addr`.
pub async fn connect<A>(addr: A) -> Result<Store, Error>
where
    A: ToSocketAddrs,
{
    let conn = TcpStream::connect(addr).await.map_err(Error::unavailable)?;

    Ok(start(conn))
}

/// Drive the protocol over an already established connection.
pub fn start<T>(conn: T) -> Store
where
    T: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(32);

    let backend = Backend {
        framed: api::client_framed(conn),
        commands: rx,
    };

    tokio::spawn(backend.start());

    Store { commands: tx }
}

#[async_trait]
impl super::Store for Store {
    type Err = Error;

    async fn get<'k>(&self, key: KeyRef<'k>) -> Result<Option<Value>, Self::Err> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Get {
                key: key.to_owned(),
                cb: tx,
            })
            .await
            .map_err(|_| Error::unavailable(anyhow!("store connection task stopped")))?;
        rx.await
            .map_err(|_| Error::unavailable(anyhow!("store connection task dropped the request")))?
    }

    async fn set(&mut self, key: Key, value: Value) -> Result<(), Self::Err> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Set { key, value, cb: tx })
            .await
            .map_err(|_| Error::unavailable(anyhow!("store connection task stopped")))?;
        rx.await
            .map_err(|_| Error::unavailable(anyhow!("store connection task dropped the request")))?
    }
}

impl<T> Backend<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn start(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Get { key, cb } => {
                    let _ = cb.send(self.fetch(key).await);
                }
                Command::Set { key, value, cb } => {
                    let _ = cb.send(self.write(key, value).await);
                }
            }
        }
    }

    async fn fetch(&mut self, key: Key) -> Result<Option<Value>, Error> {
        debug!(key = %key, "get against remote store");

        match self.roundtrip(Request::Get { key }).await? {
            Response::Get { value, .. } => Ok(value),
            unexpected => Err(Error::unavailable(anyhow!(
                "store answered a GET with {:?}",
                unexpected
            ))),
        }
    }

    async fn write(&mut self, key: Key, value: Value) -> Result<(), Error> {
        debug!(key = %key, kind = %value.kind().name(), "set against remote store");

        match self.roundtrip(Request::Set { key, value }).await? {
            Response::Set { .. } => Ok(()),
            unexpected => Err(Error::unavailable(anyhow!(
                "store answered a SET with {:?}",
                unexpected
            ))),
        }
    }

    // One request, one response: the protocol has no pipelining.
    async fn roundtrip(&mut self, req: Request) -> Result<Response, Error> {
        self.framed.send(req).await.map_err(Error::unavailable)?;

        match self.framed.next().await {
            Some(Ok(res)) => Ok(res),
            Some(Err(e)) => Err(Error::unavailable(e)),
            None => Err(Error::unavailable(anyhow!("store closed the connection"))),
        }
    }
}
