#![cfg_attr(feature = "strict", deny(warnings))]
#![cfg_attr(feature = "strict", deny(clippy::all))]
#![cfg_attr(feature = "strict", deny(missing_docs))]

//! This crate contains everything which might be needed across the crates of our workspace.

mod error;

pub use error::{AggError, AggResult};

pub mod logging;
pub mod util;
