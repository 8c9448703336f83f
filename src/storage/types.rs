use crate::error::Error;
use bytes::Bytes;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum Command {
    Get {
        key: Key,
        cb: oneshot::Sender<Result<Option<Value>, Error>>,
    },
    Set {
        key: Key,
        value: Value,
        cb: oneshot::Sender<Result<(), Error>>,
    },
}

pub type Key = String;
pub type KeyRef<'a> = &'a str;

/// A storable value, one of four primitive kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Blob(Bytes),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Text(_) => Kind::Text,
            Value::Blob(_) => Kind::Blob,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Value::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Blob(Bytes::from(bytes))
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Blob(bytes)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// The kinds of values the store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Blob,
    Int,
    Float,
}

impl Kind {
    /// Parse a kind tag, rejecting anything outside the supported four.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        match tag {
            "text" => Ok(Kind::Text),
            "blob" => Ok(Kind::Blob),
            "int" => Ok(Kind::Int),
            "float" => Ok(Kind::Float),
            other => Err(Error::UnsupportedType(other.to_owned())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Blob => "blob",
            Kind::Int => "int",
            Kind::Float => "float",
        }
    }
}
