//! Configuration loader and schema types.
//!
//! Settings drive the scan filter and the audio streaming/gain parameters.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
