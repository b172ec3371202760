//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! Implements the storage and authorization ports defined in `growhub-app`,
//! manages the connection pool lifecycle, and runs embedded migrations. The
//! `app` and `domain` crates never reference this adapter.

pub mod authorization;
pub mod error;
pub mod persistence;
pub mod pool;

pub use authorization::SqliteAuthorization;
pub use error::StorageError;
pub use persistence::SqlitePersistence;
pub use pool::{Config, Database};
