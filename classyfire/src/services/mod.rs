//! Classification services
//!
//! Leaves first: transport → fetcher → cache → batch orchestrator → tabular adapter.

pub mod batch;
pub mod cache;
pub mod fetcher;
pub mod tabular;
pub mod transport;

pub use batch::{BatchOrchestrator, LogProgress, ProgressReporter, SilentProgress};
pub use cache::{CacheStore, ClassificationCache};
pub use fetcher::RateLimitedFetcher;
pub use tabular::{read_delimited, ClassifiedRow, ColumnSelection, Row};
pub use transport::{ClassificationTransport, HttpTransport};
