//! Core store type, handle, and builder.

use crate::backend::RecordMap;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::persist::{atomic_write, ensure_parent, load};
use crate::record::{check_fields, default_records, Record, RecordId, RecordRequest};
use crate::serializer::{JsonSerializer, Serializer};
use crate::DefaultBackend;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What a mutation does when its snapshot cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistPolicy {
    /// Log the failure, count it, and report success anyway. The in-memory
    /// change stays. This favours availability: after a failed write the file
    /// lags memory until the next successful snapshot, and a crash in between
    /// loses those mutations.
    #[default]
    Lenient,
    /// Undo the in-memory change and return the I/O error. Ids handed out by
    /// an undone create are still burned.
    Strict,
}

/// Durable, concurrent collection of [`Record`]s.
///
/// Every mutation runs as one critical section: change the in-memory map,
/// then rewrite the whole backing file, then return. Reads share the same
/// gate, so they never observe a mutation halfway through.
///
/// Generic over the map backend `M`; [`RecordStore::open`] uses
/// [`DefaultBackend`](crate::DefaultBackend).
/// Share one store between request handlers through a [`StoreHandle`].
pub struct RecordStore<M = DefaultBackend> {
    map: M,
    // Highest id ever issued. Write-locked for the length of every mutation.
    gate: RwLock<RecordId>,
    path: PathBuf,
    serializer: JsonSerializer,
    sync: bool,
    policy: PersistPolicy,
    persist_failures: AtomicU64,
}

impl RecordStore {
    /// Open (or create) a store at `path` with default settings: pretty JSON,
    /// fsync on write, lenient persistence, the built-in seed set.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a store on the default backend. Call
    /// [`.build()`](RecordStoreBuilder::build) when ready.
    pub fn builder(path: impl AsRef<Path>) -> RecordStoreBuilder {
        RecordStoreBuilder::new(path)
    }
}

impl<M: RecordMap> RecordStore<M> {
    // ---- reads ----

    /// All live records, highest id first.
    #[must_use]
    pub fn list(&self) -> Vec<Record> {
        let _gate = self.gate.read();
        let mut records = self.map.snapshot();
        records.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        records
    }

    /// The record with `id`, or [`Error::NotFound`].
    pub fn get(&self, id: RecordId) -> Result<Record> {
        let _gate = self.gate.read();
        self.map.get(id).ok_or(Error::NotFound(id))
    }

    /// `true` if a live record has this id.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        let _gate = self.gate.read();
        self.map.contains(id)
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        let _gate = self.gate.read();
        self.map.len()
    }

    /// `true` when the store has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest id the allocator has issued (or loaded). The next create gets
    /// this plus one.
    #[must_use]
    pub fn last_issued_id(&self) -> RecordId {
        *self.gate.read()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persistence policy in force.
    #[must_use]
    pub fn policy(&self) -> PersistPolicy {
        self.policy
    }

    /// How many snapshot writes have failed since the store was opened.
    #[must_use]
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    // ---- writes ----

    /// Add a record with a fresh id. `title` and `body` must be non-blank.
    pub fn create(&self, title: impl Into<String>, body: impl Into<String>) -> Result<Record> {
        let (title, body) = (title.into(), body.into());
        check_fields(&title, &body)?;

        let mut last = self.gate.write();
        let id = last.checked_add(1).ok_or(Error::IdsExhausted)?;
        *last = id;

        let record = Record { id, title, body };
        self.map.insert(record.clone());
        self.commit("create", id, || {
            self.map.remove(id);
        })?;
        Ok(record)
    }

    /// [`create`](Self::create) from a routing-layer payload. A missing payload
    /// is [`Error::InvalidInput`].
    pub fn create_from(&self, request: Option<RecordRequest>) -> Result<Record> {
        let (title, body) = required(request)?.validate()?;
        self.create(title, body)
    }

    /// Replace the title and body of record `id`. The id never changes.
    pub fn update(
        &self,
        id: RecordId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Record> {
        let (title, body) = (title.into(), body.into());
        check_fields(&title, &body)?;

        let _gate = self.gate.write();
        let previous = self.map.get(id).ok_or(Error::NotFound(id))?;
        let record = Record { id, title, body };
        self.map.insert(record.clone());
        self.commit("update", id, || {
            self.map.insert(previous);
        })?;
        Ok(record)
    }

    /// [`update`](Self::update) from a routing-layer payload.
    pub fn update_from(&self, id: RecordId, request: Option<RecordRequest>) -> Result<Record> {
        let (title, body) = required(request)?.validate()?;
        self.update(id, title, body)
    }

    /// Remove record `id`. Its id is never handed out again.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let _gate = self.gate.write();
        let removed = self.map.remove(id).ok_or(Error::NotFound(id))?;
        self.commit("delete", id, || {
            self.map.insert(removed);
        })
    }

    // ---- persistence ----

    /// Rewrite the backing file from the current collection. Unlike the
    /// mutation path, errors are always returned.
    pub fn flush(&self) -> Result<()> {
        let _gate = self.gate.write();
        self.write_snapshot().map_err(|err| {
            self.persist_failures.fetch_add(1, Ordering::Relaxed);
            err
        })
    }

    // ---- internal ----

    // Caller holds the write gate.
    fn write_snapshot(&self) -> Result<()> {
        let bytes = self.serializer.serialize(&self.map.snapshot())?;
        atomic_write(&self.path, &bytes, self.sync)
    }

    // Caller holds the write gate and has already applied the change.
    fn commit<F: FnOnce()>(&self, op: &'static str, id: RecordId, undo: F) -> Result<()> {
        let err = match self.write_snapshot() {
            Ok(()) => {
                debug!(op, id, "record persisted");
                return Ok(());
            }
            Err(err) => err,
        };
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
        match self.policy {
            PersistPolicy::Lenient => {
                error!(
                    op,
                    id,
                    path = %self.path.display(),
                    error = %err,
                    "snapshot write failed; keeping in-memory change"
                );
                Ok(())
            }
            PersistPolicy::Strict => {
                undo();
                error!(
                    op,
                    id,
                    path = %self.path.display(),
                    error = %err,
                    "snapshot write failed; change rolled back"
                );
                Err(err)
            }
        }
    }

    // Load the backing file, or fall back to `seed`, then write the result out
    // canonically. Never fails: every I/O or parse problem is logged.
    fn bootstrap(&self, seed: Vec<Record>) {
        let mut last = self.gate.write();

        if let Err(err) = ensure_parent(&self.path) {
            warn!(path = %self.path.display(), error = %err, "could not create data directory");
        }

        let loaded = match load(&self.path, &self.serializer) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "backing file unusable, seeding defaults"
                );
                Vec::new()
            }
        };

        let records = if loaded.is_empty() {
            info!(path = %self.path.display(), count = seed.len(), "seeding default records");
            seed
        } else {
            info!(path = %self.path.display(), count = loaded.len(), "loaded records");
            loaded
        };

        self.map.clear();
        *last = records.iter().map(|r| r.id).max().unwrap_or(0);
        for record in records {
            self.map.insert(record);
        }

        if let Err(err) = self.write_snapshot() {
            self.persist_failures.fetch_add(1, Ordering::Relaxed);
            error!(path = %self.path.display(), error = %err, "could not write initial snapshot");
        }
    }
}

fn required(request: Option<RecordRequest>) -> Result<RecordRequest> {
    request.ok_or_else(|| Error::InvalidInput("payload is required".into()))
}

impl<M> std::fmt::Debug for RecordStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug can run while a mutation holds the gate; never block on it.
        let mut s = f.debug_struct("RecordStore");
        s.field("path", &self.path).field("policy", &self.policy);
        match self.gate.try_read() {
            Some(last) => s.field("last_issued_id", &*last),
            None => s.field("last_issued_id", &format_args!("<locked>")),
        };
        s.finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`RecordStore`].
///
/// ```rust,no_run
/// use record_store::{PersistPolicy, RecordStore};
///
/// let store = RecordStore::builder("data/articles.json")
///     .pretty(true)
///     .policy(PersistPolicy::Strict)
///     .build()
///     .unwrap();
/// ```
///
/// For another backend name it explicitly:
///
/// ```rust,no_run
/// use parking_lot::RwLock;
/// use record_store::{Record, RecordId, RecordStoreBuilder};
/// use std::collections::HashMap;
///
/// let store = RecordStoreBuilder::<RwLock<HashMap<RecordId, Record>>>::new("db.json")
///     .build()
///     .unwrap();
/// ```
pub struct RecordStoreBuilder<M = DefaultBackend> {
    path: PathBuf,
    pretty: bool,
    sync: bool,
    policy: PersistPolicy,
    seed: Vec<Record>,
    _marker: PhantomData<M>,
}

impl<M: RecordMap + Default> RecordStoreBuilder<M> {
    /// Defaults: pretty JSON, fsync on, lenient policy, built-in seed set.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            sync: true,
            policy: PersistPolicy::Lenient,
            seed: default_records(),
            _marker: PhantomData,
        }
    }

    /// Start from a [`StoreConfig`].
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.path)
            .pretty(config.pretty)
            .sync(config.sync)
            .policy(config.policy())
    }

    /// Indent the JSON snapshot (default: on).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// fsync every snapshot before returning (default: on).
    pub fn sync(mut self, yes: bool) -> Self {
        self.sync = yes;
        self
    }

    /// Set the persistence policy (default: [`PersistPolicy::Lenient`]).
    pub fn policy(mut self, policy: PersistPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Records to start with when no usable backing file exists.
    pub fn seed(mut self, records: Vec<Record>) -> Self {
        self.seed = records;
        self
    }

    /// Load (or seed) the store. Only configuration problems fail here; a
    /// missing or corrupt backing file falls back to the seed set.
    pub fn build(self) -> Result<RecordStore<M>> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("backing file path is empty".into()));
        }
        let mut ids = HashSet::with_capacity(self.seed.len());
        for record in &self.seed {
            if record.id == 0 || !ids.insert(record.id) {
                return Err(Error::Config(format!("invalid seed id {}", record.id)));
            }
        }

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let store = RecordStore {
            map: M::default(),
            gate: RwLock::new(0),
            path: self.path,
            serializer,
            sync: self.sync,
            policy: self.policy,
            persist_failures: AtomicU64::new(0),
        };
        store.bootstrap(self.seed);
        Ok(store)
    }
}

impl<M> std::fmt::Debug for RecordStoreBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("sync", &self.sync)
            .field("policy", &self.policy)
            .field("seed", &self.seed.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cheap, cloneable handle to one shared [`RecordStore`].
///
/// Derefs to the store, so request handlers call store methods directly on it.
pub struct StoreHandle<M = DefaultBackend> {
    inner: Arc<RecordStore<M>>,
}

impl<M> StoreHandle<M> {
    /// Wrap a store for sharing.
    pub fn new(store: RecordStore<M>) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl<M> From<RecordStore<M>> for StoreHandle<M> {
    fn from(store: RecordStore<M>) -> Self {
        Self::new(store)
    }
}

impl<M> Clone for StoreHandle<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> std::ops::Deref for StoreHandle<M> {
    type Target = RecordStore<M>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<M> std::fmt::Debug for StoreHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner, f)
    }
}
