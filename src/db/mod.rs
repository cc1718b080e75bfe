mod connection;
pub mod migrations;
mod queries;

pub use connection::Database;
