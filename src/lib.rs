mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod search;
mod summarize;
pub mod timew;
pub mod transform;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use summarize::summarize;
pub use transform::{IntervalTransformer, MissingTaskPolicy};
