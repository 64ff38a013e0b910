//! Pipelined RESP2 client with a fixed-size connection pool
//!
//! A round trip writes every command frame, flushes once, then reads exactly
//! one reply per command before converting anything, so the connection stays
//! in sync even when one of the replies is an error.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use paddock_errors::{StoreError, StoreResult};
use redis_protocol::codec::Resp2;
use redis_protocol::resp2::types::BytesFrame;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::command::{Command, FieldMap, Reply};
use crate::config::StoreConfig;
use crate::traits::{KeyValueStore, expect_len};

type Connection = Framed<TcpStream, Resp2>;

/// Store client speaking RESP2 over pooled TCP connections.
///
/// Connections are opened lazily, one per pool slot, and discarded after any
/// failed or cancelled exchange so the next round trip reconnects.
pub struct RedisStore {
    config: StoreConfig,
    slots: Vec<Mutex<Option<Connection>>>,
    next: AtomicUsize,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("addr", &self.config.addr())
            .field("pool_size", &self.slots.len())
            .finish()
    }
}

impl RedisStore {
    /// Create a client without opening any connection.
    pub fn new(config: StoreConfig) -> Self {
        let pool_size = config.pool_size.max(1);
        let slots = (0..pool_size).map(|_| Mutex::new(None)).collect();
        Self {
            config,
            slots,
            next: AtomicUsize::new(0),
        }
    }

    /// Create a client and check the store answers.
    ///
    /// # Errors
    ///
    /// Returns the connect or ping failure.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let store = Self::new(config);
        store.ping().await?;
        Ok(store)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn slot(&self) -> StoreResult<&Mutex<Option<Connection>>> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.slots.len().max(1);
        self.slots
            .get(index)
            .ok_or_else(|| StoreError::protocol("connection pool is empty"))
    }

    /// Send `frames` and collect one reply per frame, under the round-trip deadline.
    ///
    /// The connection leaves its slot for the whole exchange and goes back
    /// only once every reply has been read. A failed or cancelled exchange
    /// leaves the slot empty, so unread replies are never paired with a later
    /// round trip's commands.
    async fn execute(&self, frames: Vec<BytesFrame>) -> StoreResult<Vec<BytesFrame>> {
        let slot = self.slot()?;
        let mut guard = slot.lock().await;
        let idle = guard.take();
        let started = Instant::now();
        let count = frames.len();

        let outcome =
            match tokio::time::timeout(self.config.command_timeout(), self.exchange_on(idle, frames))
                .await
            {
                Ok(result) => result,
                Err(_elapsed) => Err(StoreError::Timeout {
                    timeout_ms: self.config.command_timeout_ms,
                }),
            };

        match outcome {
            Ok((conn, replies)) => {
                *guard = Some(conn);
                debug!(
                    commands = count,
                    elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                    "Round trip complete"
                );
                Ok(replies)
            }
            Err(e) => {
                warn!(commands = count, error = %e, "Round trip failed, discarding connection");
                Err(e)
            }
        }
    }

    async fn exchange_on(
        &self,
        idle: Option<Connection>,
        frames: Vec<BytesFrame>,
    ) -> StoreResult<(Connection, Vec<BytesFrame>)> {
        let mut conn = match idle {
            Some(conn) => conn,
            None => self.open().await?,
        };
        let replies = exchange(&mut conn, frames).await?;
        Ok((conn, replies))
    }

    async fn open(&self) -> StoreResult<Connection> {
        let addr = self.config.addr();
        let stream = match tokio::time::timeout(
            self.config.connect_timeout(),
            TcpStream::connect(&addr),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(StoreError::Connect {
                    addr,
                    reason: e.to_string(),
                });
            }
            Err(_elapsed) => {
                return Err(StoreError::Connect {
                    addr,
                    reason: format!("timed out after {} ms", self.config.connect_timeout_ms),
                });
            }
        };
        stream.set_nodelay(true)?;
        let mut conn = Framed::new(stream, Resp2::default());

        let mut setup = Vec::new();
        if let Some(password) = &self.config.password {
            setup.push(("AUTH", command_frame(&[b"AUTH".as_slice(), password.as_bytes()])));
        }
        if self.config.database != 0 {
            let db = self.config.database.to_string();
            setup.push(("SELECT", command_frame(&[b"SELECT".as_slice(), db.as_bytes()])));
        }
        if !setup.is_empty() {
            let (names, frames): (Vec<_>, Vec<_>) = setup.into_iter().unzip();
            let replies = exchange(&mut conn, frames).await?;
            for (name, reply) in names.into_iter().zip(replies) {
                if let BytesFrame::Error(msg) = reply {
                    return Err(StoreError::Connect {
                        addr,
                        reason: format!("{name} rejected: {msg}"),
                    });
                }
            }
        }

        debug!(addr = %addr, "Store connection opened");
        Ok(conn)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn round_trip(&self, commands: Vec<Command>) -> StoreResult<Vec<Reply>> {
        if commands.is_empty() {
            return Ok(Vec::new());
        }
        let frames = commands.iter().map(encode_command).collect();
        let replies = self.execute(frames).await?;
        expect_len_frames(&replies, commands.len())?;
        let replies: Vec<Reply> = commands
            .iter()
            .zip(replies)
            .map(|(command, frame)| decode_reply(command, frame))
            .collect::<StoreResult<_>>()?;
        expect_len(&replies, commands.len())?;
        Ok(replies)
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let pattern = format!("{}*", escape_glob(prefix));
        let count = self.config.scan_count.to_string();
        let mut cursor = "0".to_string();
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        loop {
            let frame = command_frame(&[
                b"SCAN".as_slice(),
                cursor.as_bytes(),
                b"MATCH".as_slice(),
                pattern.as_bytes(),
                b"COUNT".as_slice(),
                count.as_bytes(),
            ]);
            let reply = self
                .execute(vec![frame])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| StoreError::protocol("missing SCAN reply"))?;

            let parts = match reply {
                BytesFrame::Array(parts) => parts,
                BytesFrame::Error(msg) => return Err(StoreError::command("SCAN", msg.to_string())),
                other => return Err(unexpected("SCAN", &other)),
            };
            let mut parts = parts.into_iter();
            let (Some(next_cursor), Some(batch)) = (parts.next(), parts.next()) else {
                return Err(StoreError::protocol("SCAN reply must have two elements"));
            };
            cursor = frame_text(next_cursor)?;
            for key in members_from(batch)? {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
            if cursor == "0" {
                break;
            }
        }

        debug!(prefix = %prefix, keys = keys.len(), "Prefix scan complete");
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        let reply = self
            .execute(vec![command_frame(&[b"PING".as_slice()])])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::protocol("missing PING reply"))?;
        match reply {
            BytesFrame::SimpleString(s) | BytesFrame::BulkString(s) if s.as_ref() == b"PONG".as_slice() => {
                Ok(())
            }
            BytesFrame::Error(msg) => Err(StoreError::command("PING", msg.to_string())),
            other => Err(unexpected("PING", &other)),
        }
    }
}

async fn exchange(conn: &mut Connection, frames: Vec<BytesFrame>) -> StoreResult<Vec<BytesFrame>> {
    let expected = frames.len();
    for frame in frames {
        conn.feed(frame)
            .await
            .map_err(|e| StoreError::protocol(e.to_string()))?;
    }
    <Connection as SinkExt<BytesFrame>>::flush(conn)
        .await
        .map_err(|e| StoreError::protocol(e.to_string()))?;

    let mut replies = Vec::with_capacity(expected);
    while replies.len() < expected {
        match conn.next().await {
            Some(Ok(frame)) => replies.push(frame),
            Some(Err(e)) => return Err(StoreError::protocol(e.to_string())),
            None => {
                return Err(StoreError::ConnectionClosed {
                    pending: expected.saturating_sub(replies.len()),
                });
            }
        }
    }
    Ok(replies)
}

fn command_frame(parts: &[&[u8]]) -> BytesFrame {
    BytesFrame::Array(
        parts
            .iter()
            .map(|part| BytesFrame::BulkString(Bytes::copy_from_slice(part)))
            .collect(),
    )
}

fn encode_command(command: &Command) -> BytesFrame {
    command_frame(&[command.name().as_bytes(), command.key().as_bytes()])
}

/// Convert one reply frame according to the command that produced it.
///
/// `WRONGTYPE` means the key exists with another shape, which callers treat
/// the same as absent. Every other error reply fails the round trip.
fn decode_reply(command: &Command, frame: BytesFrame) -> StoreResult<Reply> {
    match frame {
        BytesFrame::Error(msg) => {
            let msg = msg.to_string();
            if msg.starts_with("WRONGTYPE") {
                debug!(key = %command.key(), command = command.name(), "Key holds another type");
                Ok(command.empty_reply())
            } else {
                Err(StoreError::command(command.name(), msg))
            }
        }
        frame => match command {
            Command::FieldMap(_) => field_map_from(frame).map(Reply::FieldMap),
            Command::Members(_) => members_from(frame).map(Reply::Members),
            Command::Scalar(_) => scalar_from(frame).map(Reply::Scalar),
        },
    }
}

fn field_map_from(frame: BytesFrame) -> StoreResult<FieldMap> {
    let items = match frame {
        BytesFrame::Array(items) => items,
        BytesFrame::Null => return Ok(FieldMap::new()),
        other => return Err(unexpected("HGETALL", &other)),
    };
    let mut map = FieldMap::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let Some(field) = items.next() {
        let value = items
            .next()
            .ok_or_else(|| StoreError::protocol("HGETALL reply has an odd number of elements"))?;
        map.insert(frame_text(field)?, frame_text(value)?);
    }
    Ok(map)
}

fn members_from(frame: BytesFrame) -> StoreResult<Vec<String>> {
    match frame {
        BytesFrame::Array(items) => items.into_iter().map(frame_text).collect(),
        BytesFrame::Null => Ok(Vec::new()),
        other => Err(unexpected("SMEMBERS", &other)),
    }
}

fn scalar_from(frame: BytesFrame) -> StoreResult<Option<String>> {
    match frame {
        BytesFrame::Null => Ok(None),
        frame @ (BytesFrame::BulkString(_) | BytesFrame::SimpleString(_)) => {
            frame_text(frame).map(Some)
        }
        other => Err(unexpected("GET", &other)),
    }
}

fn frame_text(frame: BytesFrame) -> StoreResult<String> {
    match frame {
        BytesFrame::BulkString(b) | BytesFrame::SimpleString(b) => String::from_utf8(b.to_vec())
            .map_err(|e| StoreError::protocol(format!("reply is not valid UTF-8: {e}"))),
        BytesFrame::Integer(i) => Ok(i.to_string()),
        other => Err(unexpected("string", &other)),
    }
}

fn unexpected(context: &str, frame: &BytesFrame) -> StoreError {
    let kind = match frame {
        BytesFrame::SimpleString(_) => "simple string",
        BytesFrame::Error(_) => "error",
        BytesFrame::Integer(_) => "integer",
        BytesFrame::BulkString(_) => "bulk string",
        BytesFrame::Array(_) => "array",
        BytesFrame::Null => "null",
        #[allow(unreachable_patterns, reason = "frame enum may grow variants")]
        _ => "unknown",
    };
    StoreError::protocol(format!("unexpected {kind} reply for {context}"))
}

fn expect_len_frames(frames: &[BytesFrame], expected: usize) -> StoreResult<()> {
    if frames.len() == expected {
        Ok(())
    } else {
        Err(StoreError::protocol(format!(
            "expected {expected} replies, got {}",
            frames.len()
        )))
    }
}

/// Escape glob metacharacters so a prefix matches literally in `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
