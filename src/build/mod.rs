//! Build number layer
//! - number.rs: BuildNumber parsing, ordering and target-range checks
//! - error.rs: BuildNumberError

pub mod error;
pub mod number;

pub use error::BuildNumberError;
pub use number::{BuildNumber, Component};
