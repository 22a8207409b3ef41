//! Travelgo client storage layer.
//!
//! SQLite stands in for the browser's `localStorage` and `sessionStorage`:
//! two key/value tables, one persistent and one wiped on every open.
//!
//! # Usage
//!
//! ```no_run
//! use travelgo::database::Database;
//!
//! let db = Database::open("travelgo.db").expect("failed to open storage");
//! let db = Database::open_in_memory().expect("failed to open in-memory storage");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
