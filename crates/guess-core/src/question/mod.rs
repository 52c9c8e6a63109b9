//! Attribute scoring and question selection.

mod gain;
mod selector;

pub use gain::{Partition, PartitionGroup, information_gain, partition};
pub use selector::{GAIN_TOLERANCE, Question, SelectError, rank_attributes, select_question};
