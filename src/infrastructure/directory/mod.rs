//! Directory client implementations

mod http;
mod in_memory;

pub use http::{DirectoryAuth, HttpDirectoryClient, HttpDirectoryConfig};
pub use in_memory::{DirectoryCall, InMemoryDirectory};
