mod models;
mod queries;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use queries::{QueryContract, SQLITE_QUERIES};
pub use schema::{latest_schema, SPARKIFY_VERSIONED_SCHEMAS};
pub use store::SqliteSparkifyStore;
pub use trait_def::{SparkifyStore, StoreError};

#[cfg(feature = "mock")]
pub use trait_def::MockSparkifyStore;
