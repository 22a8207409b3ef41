// Travelgo state managers
// Managers own what the pages remember between visits: the key/value store, favorites, the login session.

pub mod favorites_manager;
pub mod session_manager;
pub mod storage_manager;
