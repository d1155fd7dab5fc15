//! Core matchmaking algorithms: candidate selection and team partitioning
//!
//! Both entry points are pure functions over caller-supplied snapshots of
//! the waiting pool. They never mutate their inputs, perform I/O, or hold
//! state across invocations; the queue manager drives them once per tick.

pub mod class_mask;
pub mod partitioner;
pub mod selector;

pub use class_mask::class_mask_bit;
pub use partitioner::{find_best_split, SplitRules};
pub use selector::{select_candidates, SelectorConfig};
