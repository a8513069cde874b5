//! Domain types

mod queue_row;
mod track;

pub use queue_row::PersistedQueueRow;
pub use track::Track;
