// Crate root library declaration and module exports.
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod export;
pub mod model;

pub use converter::{Converter, convert};
pub use error::{ConvertError, ReadError};
