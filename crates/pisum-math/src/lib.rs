#![crate_name = "pisum_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical utilities for the pisum library.

mod errors;

pub mod zp;

pub use errors::{Error, Result};
