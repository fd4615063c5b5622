//! Playlist model and folder scanning.

mod model;
mod scan;

pub use model::{Entry, Playlist};
pub use scan::scan;
