//! tspack library
//!
//! Core functionality for the tspack build tool: configuration, module
//! graph, chunk partitioning, emission, and the example domain model.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod domain;
pub mod resolver;
pub mod transform;
pub mod utils;

pub use bundler::Bundler;
pub use cli::Cli;
pub use config::{Config, Mode};
