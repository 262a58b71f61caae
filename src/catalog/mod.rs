//! Reply catalog: configured keyword rules and their reply payloads.

pub mod matcher;
pub mod model;
pub mod reload;

pub use model::{ButtonLabel, ButtonSpec, Catalog, Reply, Rule};
pub use reload::CatalogHandle;
