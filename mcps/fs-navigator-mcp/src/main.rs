//! Filesystem Navigator MCP - read-only access to one root directory over stdio
//!
//! Configuration comes from a TOML file, overridden by flags and `FS_*`
//! environment variables; see `--help`.

use clap::Parser;

mcp_common::serve_stdio!("fs_navigator_mcp", fs_navigator_mcp::Cli::parse().into_server());
