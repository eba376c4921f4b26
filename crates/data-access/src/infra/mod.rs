//! Infrastructure layer - database connection and unit of work.

mod db;
pub mod transaction;

pub use db::Database;
pub use transaction::{parse_isolation_level, StoreHandle, Transaction, TransactionOptions};
