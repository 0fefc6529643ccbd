mod capture;
mod core;
mod parameter;
mod transform;

pub use self::core::*;
pub(crate) use capture::Capture;
pub use capture::InvalidCapture;
pub use parameter::*;
pub use transform::*;
