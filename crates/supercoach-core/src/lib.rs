// Library root: re-exports all modules so integration tests and the terminal
// front end can access the crate's public API.

pub mod config;
pub mod db;
pub mod draft;
pub mod error;
pub mod injury;
pub mod players;
pub mod store;
pub mod valuation;
