pub mod build;
pub mod commands;
pub mod config;
pub mod error;
pub mod hash;
pub mod layer;
pub mod source;

pub use build::{build, collect_layers, render, Layer};
pub use error::{Error, Result};
pub use hash::{build_with_hash, fingerprint};
pub use layer::layer_name;
pub use source::{DirFs, Entry, MemoryFs, Source, SourceFs};
