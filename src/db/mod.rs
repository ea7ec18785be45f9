//! Persistence module: one SQLite file with a single `users` table.

mod connection;
mod error;
mod users;

pub use connection::Store;
pub use error::StoreError;
