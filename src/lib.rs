pub mod backup;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod server;
pub mod traits;
pub mod types;
