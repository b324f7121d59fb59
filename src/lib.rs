pub mod config;
pub mod core;
pub mod desk;
pub mod error;
pub mod llm;
pub mod models;
pub mod parser;
pub mod report;
#[cfg(test)]
pub mod test_helpers;

pub use error::{NexusError, Result};
pub use parser::{extract, ParsedResponse};
