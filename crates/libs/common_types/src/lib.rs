#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod emotion;
mod media_item;

pub use emotion::*;
pub use media_item::*;
