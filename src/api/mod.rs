use self::codec::{ClientCodec, ServerCodec};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

pub mod codec;
pub mod server;
pub mod service;
pub mod types;

pub use server::Server;

pub type StoreService<C, S> = service::StoreService<Framed<C, ServerCodec>, S>;

/// Frame a connection for the store side of the protocol.
pub fn framed<C: AsyncRead + AsyncWrite>(conn: C) -> Framed<C, ServerCodec> {
    Framed::new(conn, ServerCodec::default())
}

/// Frame a connection for the caller side of the protocol.
pub fn client_framed<C: AsyncRead + AsyncWrite>(conn: C) -> Framed<C, ClientCodec> {
    Framed::new(conn, ClientCodec::default())
}
