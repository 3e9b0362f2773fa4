#![deny(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod classifier;
mod error;
mod face_detector;
mod frame;
mod frame_source;

pub use classifier::*;
pub use error::*;
pub use face_detector::*;
pub use frame::*;
pub use frame_source::*;
