pub mod db;
mod entries;
pub mod models;
mod tables;

pub use db::{Database, DatabaseError};
pub use models::{Entry, WordSummary};
pub use tables::*;
