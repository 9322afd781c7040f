//! Human-readable views of a table and of how its derived rows were computed.
pub mod table;
pub mod trace;

pub use table::render;
pub use trace::format_trace;
