//! In-memory store with round-trip accounting
//!
//! Mirrors the read semantics of [`RedisStore`](crate::RedisStore): absent
//! keys and keys of another shape both read as empty. Every call to
//! [`KeyValueStore::round_trip`] counts as one round trip, whatever it
//! carries, so tests can assert round-trip bounds directly.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use paddock_errors::{StoreError, StoreResult};
use parking_lot::{Mutex, RwLock};

use crate::command::{Command, FieldMap, Reply};
use crate::traits::KeyValueStore;

#[derive(Debug, Clone)]
enum Entry {
    Hash(FieldMap),
    Set(Vec<String>),
    Scalar(String),
}

/// Call-counting in-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Entry>>,
    round_trips: AtomicUsize,
    commands: AtomicUsize,
    scans: AtomicUsize,
    offline: AtomicBool,
    failing_keys: RwLock<HashSet<String>>,
    history: Mutex<Vec<Vec<Command>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a hash, replacing anything at `key`.
    pub fn insert_hash<F, V>(&self, key: impl Into<String>, fields: impl IntoIterator<Item = (F, V)>)
    where
        F: Into<String>,
        V: Into<String>,
    {
        let map = fields
            .into_iter()
            .map(|(f, v)| (f.into(), v.into()))
            .collect();
        self.data.write().insert(key.into(), Entry::Hash(map));
    }

    /// Store a set, replacing anything at `key`. Duplicate members are dropped.
    pub fn insert_set<M: Into<String>>(
        &self,
        key: impl Into<String>,
        members: impl IntoIterator<Item = M>,
    ) {
        let mut seen = HashSet::new();
        let members = members
            .into_iter()
            .map(Into::into)
            .filter(|m: &String| seen.insert(m.clone()))
            .collect();
        self.data.write().insert(key.into(), Entry::Set(members));
    }

    /// Store a scalar, replacing anything at `key`.
    pub fn insert_scalar(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data
            .write()
            .insert(key.into(), Entry::Scalar(value.into()));
    }

    /// Remove `key`.
    pub fn remove(&self, key: &str) {
        self.data.write().remove(key);
    }

    /// Round trips issued so far, including failed ones.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Commands carried by all round trips so far.
    pub fn commands_issued(&self) -> usize {
        self.commands.load(Ordering::SeqCst)
    }

    /// Prefix scans issued so far.
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Commands of every round trip, in issue order.
    pub fn history(&self) -> Vec<Vec<Command>> {
        self.history.lock().clone()
    }

    /// Zero all counters and forget the history.
    pub fn reset_counters(&self) {
        self.round_trips.store(0, Ordering::SeqCst);
        self.commands.store(0, Ordering::SeqCst);
        self.scans.store(0, Ordering::SeqCst);
        self.history.lock().clear();
    }

    /// Make every operation fail as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every round trip that reads `key` fail.
    pub fn fail_key(&self, key: impl Into<String>) {
        self.failing_keys.write().insert(key.into());
    }

    /// Stop failing round trips that read `key`.
    pub fn heal_key(&self, key: &str) {
        self.failing_keys.write().remove(key);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self, command: &Command) -> Reply {
        let data = self.data.read();
        match (command, data.get(command.key())) {
            (Command::FieldMap(_), Some(Entry::Hash(map))) => Reply::FieldMap(map.clone()),
            (Command::Members(_), Some(Entry::Set(members))) => Reply::Members(members.clone()),
            (Command::Scalar(_), Some(Entry::Scalar(value))) => Reply::Scalar(Some(value.clone())),
            (command, _) => command.empty_reply(),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn round_trip(&self, commands: Vec<Command>) -> StoreResult<Vec<Reply>> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        self.commands.fetch_add(commands.len(), Ordering::SeqCst);
        self.history.lock().push(commands.clone());

        self.check_online()?;
        {
            let failing = self.failing_keys.read();
            if let Some(command) = commands.iter().find(|c| failing.contains(c.key())) {
                return Err(StoreError::Unavailable(format!(
                    "injected failure reading '{}'",
                    command.key()
                )));
            }
        }

        Ok(commands.iter().map(|command| self.read(command)).collect())
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let mut keys: Vec<String> = self
            .data
            .read()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }
}
