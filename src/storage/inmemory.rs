//! In-memory key-value storage.

use super::types::{Command, Key, KeyRef, Value};
use crate::error::Error;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub struct Backend {
    data: HashMap<Key, Value>,
    commands: mpsc::Receiver<Command>,
}

#[derive(Debug, Clone)]
pub struct Store {
    commands: mpsc::Sender<Command>,
}

pub fn start() -> Store {
    let (tx, rx) = mpsc::channel(32);

    let backend = Backend {
        data: HashMap::new(),
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
            .map_err(|_| Error::unavailable(anyhow!("storage backend stopped")))?;
        rx.await
            .map_err(|_| Error::unavailable(anyhow!("storage backend dropped the request")))?
    }

    async fn set(&mut self, key: Key, value: Value) -> Result<(), Self::Err> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Set { key, value, cb: tx })
            .await
            .map_err(|_| Error::unavailable(anyhow!("storage backend stopped")))?;
        rx.await
            .map_err(|_| Error::unavailable(anyhow!("storage backend dropped the request")))?
    }
}

impl Backend {
    pub async fn start(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Get { key, cb } => {
                    let value = self.data.get(&key).map(Value::clone);
                    let _ = cb.send(Ok(value));
                }
                Command::Set { key, value, cb } => {
                    self.data.insert(key, value);
                    let _ = cb.send(Ok(()));
                }
            }
        }
    }
}
