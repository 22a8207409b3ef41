//! Travelgo: the client side of the GO travel site as a library.
//!
//! The listing pipeline (filters, query, fetch, sort, paginate, cards), the
//! favorites and session state it reads, and a JSON-RPC bridge a UI host
//! can drive.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
