//! A small flat-file record store.
//!
//! Each table is one text file. The first line declares the fields,
//! `fields<TAB>id,name,status`, and every following line holds one row of
//! tab-separated values in field order. All values are strings.
//!
//! ```no_run
//! use flatdb::{Condition, Database, StoreConfig};
//!
//! # fn main() -> flatdb::Result<()> {
//! let db = Database::open(StoreConfig::new("./data").with_create_dir(true))?;
//! db.create("users", &["id", "name", "status"])?;
//! db.append("users", ["*"], &["1", "Alice", "active"])?;
//!
//! let active = db.select("users", ["name"], &[Condition::where_eq("status", "active")])?;
//! assert_eq!(active[0].get("name"), Some("Alice"));
//! # Ok(())
//! # }
//! ```

pub(crate) mod common;
pub(crate) mod config;
pub(crate) mod db;
pub(crate) mod query;
pub mod storage;

pub use common::error::{Result, StoreError};
pub use config::StoreConfig;
pub use db::{database::Database, table::*};
pub use query::{
    condition::{Condition, ConditionKind},
    predicate::{is_full_match, match_count, validate_conditions},
};
pub use storage::{
    codec::RowLimit,
    line_store::{FileLineStore, LineStore, WriteMode},
};
