#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod duration;
mod error;
mod spotify;
mod youtube;

pub use duration::*;
pub use error::*;
pub use spotify::*;
pub use youtube::*;
