//! Search result handling
//!
//! Normalizes raw index hits into stable result records.

mod normalizer;
mod relative_time;
mod types;

pub use normalizer::{clean_description, ResultNormalizer, UNKNOWN_SITE, UNKNOWN_TIME, UNTITLED};
pub use relative_time::{format_relative, parse_timestamp};
pub use types::*;
