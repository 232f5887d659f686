//! Local persistence for the WideChat credential record.
//!
//! Provides SQLite connection management, schema migrations and the
//! [`SessionStore`] seam the session components read and write through.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use widechat_session::database::{Database, SessionStore, SqliteSessionStore};
//!
//! let db = Arc::new(Database::open("widechat-session.db").expect("failed to open database"));
//! let store = SqliteSessionStore::new(db);
//! let record = store.load_record().expect("failed to read record");
//! ```

pub mod connection;
pub mod migrations;
pub mod session_store;

pub use connection::Database;
pub use session_store::{MemorySessionStore, SessionStore, SqliteSessionStore};
