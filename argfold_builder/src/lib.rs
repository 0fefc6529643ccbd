//! Builder module for `argfold`.
//! See the `argfold` crate root for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{ConfigError, GeneralParser, UsageError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
