//! Application layer: loading forests from external input
//!
//! This layer turns files and text into domain values.

pub mod error;
pub mod error_ext;
pub mod outline;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use outline::{load_outline, parse_outline, DEFAULT_INDENT_WIDTH};
