//! Search index access
//!
//! Query construction, transport and response decoding for the
//! Elasticsearch-compatible page index.

mod client;
mod hit;
mod query;

pub use client::{IndexClient, IndexError, SearchIndex};
pub use hit::{ClusterHealth, IndexResponse, RawHit};
pub use query::{IndexRequest, QueryBuilder, FIELD_BOOSTS, FRAGMENT_SIZE};
