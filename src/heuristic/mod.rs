//! Attribute-pair connectivity heuristic.
//!
//! For every pairing of a source attribute with a target attribute, counts how many connections
//! joining on equal values would create and how close to one-to-one they would be.

mod board;
mod counts;
mod stat;
mod summary;
mod worker;

pub use self::board::StatBoard;
pub use self::counts::UniqueValueCounts;
pub use self::stat::{attribute_pair_stats, Attr, AttributePairStat, AttributePairs, Distribution};
pub use self::summary::{summarize, SummaryBin};
pub use self::worker::{StatMessage, StatWorker};
