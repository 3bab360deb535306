// gcpdns-core: Domain model and reconciliation logic between gcpdns-api
// and consumers (CLI).

pub mod batch;
pub mod dump;
pub mod error;
pub mod gateway;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{CsvRow, RecordRow, RowAction, ZoneRow};
pub use error::CoreError;
pub use gateway::{CloudGateway, DnsGateway};
pub use model::{DEFAULT_TTL, RecordSet, RecordType, Zone};
pub use reconcile::{ApplyOptions, BatchReport, Reconciler, RowOutcome, RowStatus};
pub use service::{DnsService, Effect, OnExisting};
