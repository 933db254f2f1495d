//! Filesystem Navigator MCP Library
//!
//! Read-only access to a single root directory: glob search, directory
//! listings, metadata and size-limited content reads. Every path is taken
//! relative to the root, and nothing outside it can be reached.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use fs_navigator_mcp::FsNavigatorServer;
//!
//! let server = FsNavigatorServer::from_root("/srv/project")?;
//! // Serve via stdio, or drive in-process through EmbeddableMcp
//! ```

pub mod config;
pub mod context;
pub mod filter;
pub mod handlers;
pub mod metadata;
pub mod params;
pub mod reader;
pub mod sandbox;
pub mod search;
pub mod server;
pub mod types;
pub mod walker;

// Re-export main server type
pub use config::{load_config, Cli};
pub use server::FsNavigatorServer;

pub use context::RootContext;
pub use reader::{Encoding, ReadOptions};
pub use search::SearchOptions;
pub use types::{
    Config, DirectoryListing, EntryKind, FileDescriptor, Limits, NavError, NavResult, SearchResult,
};
pub use walker::ListOptions;

// Re-export parameter types for direct API usage
pub use params::*;
