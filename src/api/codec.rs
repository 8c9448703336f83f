//! Codecs for the wire protocol through which requests/responses are exchanged.
//!
//! The wire protocol is optimized for simplicity, where both request
//! and response are line-delimited and further split by whitespaces into
//! components. Values carry a kind tag so that they come back as the
//! kind they went in with; text and blob payloads are Base64-encoded to
//! keep them free of delimiters. Keys must not contain whitespace.
//!
//! # Request
//!
//! - GET
//!     - `GET $key\n`
//! - SET
//!     - `SET $key $kind $payload\n`
//!
//! # Response
//!
//! - GET
//!     - OK
//!         - `OKAY $key $kind $payload\n`
//!     - FAIL
//!         - `FAIL $key\n`
//! - SET
//!     - OK
//!         - `OKAY $key\n`

use super::types::{Request, Response, Status};
use crate::storage::types::{Kind, Value};
use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LinesCodec};

/// Store-side codec: decodes requests, encodes responses.
#[derive(Default, Debug)]
pub struct ServerCodec {
    lines: LinesCodec,
}

impl Decoder for ServerCodec {
    type Item = Request;

    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.lines
            .decode(src)
            .context("unable to decode request line")?
            .as_deref()
            .map(Request::from_wire)
            .transpose()
            .context("unable to parse request")
    }
}

impl Encoder<Response> for ServerCodec {
    type Error = anyhow::Error;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.lines
            .encode(item.into_wire(), dst)
            .context("unable to encode response line")
    }
}

/// Caller-side codec: encodes requests, decodes responses.
#[derive(Default, Debug)]
pub struct ClientCodec {
    lines: LinesCodec,
}

impl Decoder for ClientCodec {
    type Item = Response;

    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.lines
            .decode(src)
            .context("unable to decode response line")?
            .as_deref()
            .map(Response::from_wire)
            .transpose()
            .context("unable to parse response")
    }
}

impl Encoder<Request> for ClientCodec {
    type Error = anyhow::Error;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.lines
            .encode(item.into_wire(), dst)
            .context("unable to encode request line")
    }
}

impl Request {
    fn from_wire(line: &str) -> Result<Self> {
        let mut components = line.split(' ');

        let command = components.next().context("missing command")?;

        match command {
            "GET" => {
                let key = components
                    .next()
                    .context("missing key from GET command")?
                    .into();

                Ok(Request::Get { key })
            }
            "SET" => {
                let key = components
                    .next()
                    .context("missing key from SET command")?
                    .into();

                let kind = components.next().context("missing kind from SET command")?;

                let payload = components
                    .next()
                    .context("missing payload from SET command")?;

                let value = Value::from_wire(kind, payload)?;

                Ok(Request::Set { key, value })
            }
            _ => bail!("unrecognized command: {}", command),
        }
    }

    fn into_wire(self) -> String {
        match self {
            Request::Get { key } => format!("GET {}", key),
            Request::Set { key, value } => format!(
                "SET {} {} {}",
                key,
                value.kind().name(),
                value.into_wire_payload()
            ),
        }
    }
}

impl Response {
    fn from_wire(line: &str) -> Result<Self> {
        let mut components = line.split(' ');

        let status = components.next().context("missing status")?;

        let key: String = components.next().context("missing key")?.into();

        match status {
            "FAIL" => Ok(Response::Get { key, value: None }),
            "OKAY" => match components.next() {
                None => Ok(Response::Set { key }),
                Some(kind) => {
                    let payload = components
                        .next()
                        .context("missing payload from GET response")?;

                    let value = Value::from_wire(kind, payload)?;

                    Ok(Response::Get {
                        key,
                        value: Some(value),
                    })
                }
            },
            _ => bail!("unrecognized status: {}", status),
        }
    }

    fn into_wire(self) -> String {
        let status = self.status().into_wire();
        match self {
            Response::Set { key } => {
                format!("{} {}", status, key)
            }
            Response::Get { key, value } => value
                .map(|value| {
                    format!(
                        "{} {} {} {}",
                        status,
                        key,
                        value.kind().name(),
                        value.into_wire_payload()
                    )
                })
                .unwrap_or_else(|| format!("{} {}", status, key)),
        }
    }
}

impl Value {
    fn from_wire(kind: &str, payload: &str) -> Result<Self> {
        match Kind::parse(kind)? {
            Kind::Text => {
                let bytes = general_purpose::STANDARD
                    .decode(payload)
                    .context("unable to decode text payload")?;
                let text = String::from_utf8(bytes).context("text payload is not UTF-8")?;
                Ok(Value::Text(text))
            }
            Kind::Blob => {
                let bytes = general_purpose::STANDARD
                    .decode(payload)
                    .context("unable to decode blob payload")?;
                Ok(Value::Blob(Bytes::from(bytes)))
            }
            Kind::Int => payload
                .parse()
                .map(Value::Int)
                .context("unable to parse integer payload"),
            Kind::Float => payload
                .parse()
                .map(Value::Float)
                .context("unable to parse float payload"),
        }
    }

    fn into_wire_payload(self) -> String {
        match self {
            Value::Text(text) => general_purpose::STANDARD.encode(text.as_bytes()),
            Value::Blob(bytes) => general_purpose::STANDARD.encode(&bytes),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => x.to_string(),
        }
    }
}

impl Status {
    fn into_wire(self) -> &'static str {
        match self {
            Status::Okay => "OKAY",
            Status::Fail => "FAIL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    #[test]
    fn succeeds_to_encode_status() {
        let cases = vec![(Status::Okay, "OKAY"), (Status::Fail, "FAIL")];

        cases
            .into_iter()
            .for_each(|(status, expected_encoded_status)| {
                // Pre-condition.
                // Action.
                let encoded_status = status.into_wire();
                // Post-condition.
                assert_eq!(encoded_status, expected_encoded_status);
            });
    }

    proptest! {
        #[test]
        fn fails_to_decode_request_with_invalid_command(command in invalid_request_command()) {
            // Pre-condition.
            let mut message = BytesMut::from(format!("{}\n", command).as_str());
            let mut decoder = ServerCodec::default();

            // Action.
            let request = decoder.decode(&mut message);

            // Post-condition.
            prop_assert!(request.is_err());
            prop_assert!(message.is_empty());
        }

        #[test]
        fn round_trips_set_requests(key in key_strategy(), value in value_strategy()) {
            // Pre-condition.
            let mut encoder = ClientCodec::default();
            let mut decoder = ServerCodec::default();
            let mut message = BytesMut::new();
            let request = Request::Set { key, value };

            // Action.
            encoder.encode(request.clone(), &mut message).unwrap();
            let decoded = decoder.decode(&mut message).unwrap();

            // Post-condition.
            prop_assert_eq!(decoded, Some(request));
            prop_assert!(message.is_empty());
        }

        #[test]
        fn round_trips_get_responses(key in key_strategy(), value in value_strategy()) {
            // Pre-condition.
            let mut encoder = ServerCodec::default();
            let mut decoder = ClientCodec::default();
            let mut message = BytesMut::new();
            let response = Response::Get { key, value: Some(value) };

            // Action.
            encoder.encode(response.clone(), &mut message).unwrap();
            let decoded = decoder.decode(&mut message).unwrap();

            // Post-condition.
            prop_assert_eq!(decoded, Some(response));
            prop_assert!(message.is_empty());
        }
    }

    #[test]
    fn fails_to_decode_malformed_request() {
        let cases = vec![
            (b"GET\n".as_ref(), "get without key"),
            (b"SET\n".as_ref(), "set without key"),
            (b"SET key\n".as_ref(), "set without kind"),
            (b"SET key int\n".as_ref(), "set without payload"),
            (b"SET key int abc\n".as_ref(), "set with non-numeric int payload"),
            (b"SET key blob not-base64!\n".as_ref(), "set with invalid blob payload"),
        ];

        cases.into_iter().for_each(|(message, reason)| {
            // Pre-condition.
            let mut decoder = ServerCodec::default();
            let mut message = BytesMut::from(message);

            // Action.
            let request = decoder.decode(&mut message);

            // Post-condition.
            assert!(request.is_err(), "{}", reason);
            assert!(message.is_empty(), "{}", reason);
        });
    }

    #[test]
    fn rejects_unsupported_value_kind() {
        // Pre-condition.
        let mut decoder = ServerCodec::default();
        let mut message = BytesMut::from(b"SET key json e30=\n".as_ref());

        // Action.
        let err = decoder.decode(&mut message).unwrap_err();

        // Post-condition.
        match err.downcast_ref::<Error>() {
            Some(Error::UnsupportedType(kind)) => assert_eq!(kind, "json"),
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn succeeds_to_decode_wellformed_request() {
        let cases = vec![
            (
                b"GET key\n".as_ref(),
                Request::Get { key: "key".into() },
                "get key",
            ),
            (
                b"SET key int 42\n".as_ref(),
                Request::Set {
                    key: "key".into(),
                    value: Value::Int(42),
                },
                "set key to an integer",
            ),
            (
                b"SET key float -2.5\n".as_ref(),
                Request::Set {
                    key: "key".into(),
                    value: Value::Float(-2.5),
                },
                "set key to a float",
            ),
            (
                b"SET key text aGVsbG8gd29ybGQ=\n".as_ref(),
                Request::Set {
                    key: "key".into(),
                    value: Value::Text("hello world".into()),
                },
                "set key to text",
            ),
            (
                b"SET key blob AAEC\n".as_ref(),
                Request::Set {
                    key: "key".into(),
                    value: Value::Blob(Bytes::from_static(&[0, 1, 2])),
                },
                "set key to a blob",
            ),
        ];

        cases
            .into_iter()
            .for_each(|(message, expected_request, reason)| {
                // Pre-condition.
                let mut decoder = ServerCodec::default();
                let mut message = BytesMut::from(message);

                // Action.
                let request = decoder.decode(&mut message).unwrap();

                // Post-condition.
                assert_eq!(request, Some(expected_request), "{}", reason);
                assert!(message.is_empty(), "{}", reason);
            });
    }

    #[test]
    fn succeeds_to_encode_response() {
        let cases = vec![
            (
                Response::Get {
                    key: "key".into(),
                    value: None,
                },
                b"FAIL key\n".as_ref(),
                "get without value",
            ),
            (
                Response::Get {
                    key: "key".into(),
                    value: Some(Value::Int(7)),
                },
                b"OKAY key int 7\n".as_ref(),
                "get with an integer",
            ),
            (
                Response::Get {
                    key: "key".into(),
                    value: Some(Value::Text("hi".into())),
                },
                b"OKAY key text aGk=\n".as_ref(),
                "get with text",
            ),
            (
                Response::Set { key: "key".into() },
                b"OKAY key\n".as_ref(),
                "set key",
            ),
        ];

        cases
            .into_iter()
            .for_each(|(response, expected_message, reason)| {
                // Pre-condition.
                let mut encoder = ServerCodec::default();
                let mut message = BytesMut::default();

                // Action.
                encoder.encode(response, &mut message).unwrap();

                // Post-condition.
                assert_eq!(message, expected_message, "{}", reason)
            });
    }

    fn invalid_request_command() -> impl Strategy<Value = String> {
        "[A-Za-z]{1,12}".prop_filter("valid command", |cmd| {
            !vec!["GET", "SET"].contains(&cmd.as_str())
        })
    }

    fn key_strategy() -> impl Strategy<Value = String> {
        "[a-z0-9-]{1,36}"
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<String>().prop_map(Value::Text),
            proptest::collection::vec(any::<u8>(), 0..64).prop_map(|bytes| Value::Blob(bytes.into())),
            any::<i64>().prop_map(Value::Int),
            (-1.0e9..1.0e9f64).prop_map(Value::Float),
        ]
    }
}
