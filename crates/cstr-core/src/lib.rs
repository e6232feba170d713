//! cstr-core: shared foundation for cstrflow.
//!
//! Contains:
//! - numeric (finiteness and sign checks for parameters)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
