//! femtodb - a minimal embedded record store
//!
//! Synchronous CRUD plus a filter -> sort -> limit query pipeline over
//! schema-typed records, one file per record, for resource-limited devices
//! where a full relational engine is infeasible but applications still need
//! named, queryable record collections.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use std::cmp::Ordering;
//!
//! use femtodb::codec::JsonCodec;
//! use femtodb::database::Database;
//! use femtodb::query::Select;
//! use femtodb::uuid::Uuid;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! # fn main() -> femtodb::storage::StoreResult<()> {
//! let db = Database::open("/var/lib/femtodb", "app")?;
//! let users = db.register("users", JsonCodec::<User>::new(), 1024)?;
//!
//! let uuid = Uuid::generate(Some("alice"), db.name().len() as u64);
//! users.insert(uuid, &User { name: "alice".into(), age: 30 })?;
//!
//! let adults = users.select(
//!     Select::all()
//!         .filter(|u: &User| u.age >= 18)
//!         .order_by(|a, b| a.age.cmp(&b.age))
//!         .limit(10),
//! )?;
//! # let _ = adults;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod database;
pub mod observability;
pub mod query;
pub mod storage;
pub mod table;
pub mod uuid;
