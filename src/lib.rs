//! Concurrent record store with a durable JSON snapshot.
//!
//! Records (`id`, `title`, `body`) live in an in-memory map; every create,
//! update, and delete rewrites the whole collection to a backing file before
//! it returns. On startup the file is loaded (field names matched without
//! regard to case) and rewritten canonically, or, when it is missing, empty,
//! or corrupt, replaced by a fixed seed set.
//!
//! ```rust,no_run
//! use record_store::RecordStore;
//!
//! let store = RecordStore::open("data/articles.json").unwrap();
//! let created = store.create("Hello", "World").unwrap();
//! assert_eq!(store.get(created.id).unwrap().title, "Hello");
//! store.delete(created.id).unwrap();
//! ```
//!
//! **Single-process only.** If multiple processes open the same file they will
//! clobber each other.
//!
//! **Durability caveat.** Under the default [`PersistPolicy::Lenient`] a
//! mutation whose snapshot write fails is still reported as a success; the
//! failure is only logged and counted. Use [`PersistPolicy::Strict`] to turn
//! such failures into errors.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod error;
pub mod persist;
pub mod record;
pub mod serializer;
pub mod store;

pub use backend::RecordMap;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use record::{default_records, Record, RecordId, RecordRequest};
pub use store::{PersistPolicy, RecordStore, RecordStoreBuilder, StoreHandle};

/// Default backend: a `parking_lot` read-write lock around a `HashMap`.
pub type DefaultBackend = parking_lot::RwLock<std::collections::HashMap<RecordId, Record>>;
