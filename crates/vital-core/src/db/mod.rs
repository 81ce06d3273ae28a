//! Database layer for Vital

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{DocumentRepository, SqliteDocumentRepository};
