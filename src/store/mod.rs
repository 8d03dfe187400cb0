use std::future::Future;

use crate::error::Result;
use crate::models::RawRecord;

mod query;
mod rest;

pub use query::Query;
pub use rest::RestStore;

/// Read-only access to named collections of diary rows.
pub trait RecordStore: Send + Sync {
    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;
}
