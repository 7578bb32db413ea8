//! Database initialization and schema for the shared SQLite store

pub mod init;

pub use init::{create_tables, init_database};
