//! Foreign-language facades over the core library.
pub mod python;
