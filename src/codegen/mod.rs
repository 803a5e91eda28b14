//! Code generation for resolved component documents

mod config;
mod writer;

pub use config::CodegenConfig;
pub use writer::{component_type, generate, CodeWriter};
