//! In-memory SQLite database acting as the reference feature provider.
//!
//! CSV exports of the monitoring pipeline are loaded into an in-memory
//! SQLite database; typed query methods hand back [`agri_core`] records and
//! the [`FeatureProvider`](agri_core::FeatureProvider) impl in [`provider`]
//! lets the dashboard and map pipelines read from it.
//!
//! # Usage
//!
//! ```rust
//! use agri_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_features(
//!     "parcelle_id,date,latitude,longitude,rendement_estime,ndvi,temperature,stress_hydrique,culture\n\
//!      P1,2022-05-01,43.6,1.44,6.5,0.71,22.0,0.34,wheat\n",
//! )
//! .unwrap();
//! db.load_yield_history("parcelle_id,date,rendement_estime\nP1,2021-07-01,6.1\n").unwrap();
//!
//! let parcels = db.query_parcel_ids().unwrap();
//! assert_eq!(parcels, vec!["P1".to_string()]);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//! - `features` - one row per (parcel, date) observation
//! - `yield_history` - yield records used for trend fitting
//!
//! Risk metrics are derived on the fly with a `GROUP BY parcelle_id`
//! aggregate over `features`.

pub mod schema;
mod loader;
pub mod provider;
mod queries;

use agri_core::Column;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// In-memory SQLite database holding the monitoring tables.
///
/// Cheaply cloneable (via `Rc`); clones share the same connection. Use it
/// from a single thread.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
    /// Feature columns present in the loaded CSV headers.
    columns: Rc<RefCell<BTreeSet<Column>>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
            columns: Rc::new(RefCell::new(BTreeSet::new())),
        })
    }

    /// Feature columns seen so far across every `load_features` call.
    pub fn feature_columns(&self) -> BTreeSet<Column> {
        self.columns.borrow().clone()
    }
}
