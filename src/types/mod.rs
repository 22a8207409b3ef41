// Travelgo shared type definitions
// Each submodule defines types used across the listing pipeline.

pub mod credential;
pub mod errors;
pub mod favorite;
pub mod filter;
pub mod listing;
pub mod map;
pub mod pagination;
pub mod session;
pub mod settings;
