//! Type definitions for the filesystem navigator

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Startup configuration, before the root is canonicalised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory every operation is confined to
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Entry names hidden from listings and searches (exact, or with `*`/`?`)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub limits: Limits,
}

fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["node_modules".to_string(), ".git".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude_patterns: default_exclude_patterns(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Recursion ceiling for directory listings
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Largest file `read_file_content` returns without an override, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Hard cap on `maxResults` for searches
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    /// How far below the base directory a search walks
    #[serde(default = "default_max_search_depth")]
    pub max_search_depth: usize,
    /// Entries collected by one listing before it reports truncation
    #[serde(default = "default_max_list_entries")]
    pub max_list_entries: usize,
}

fn default_max_depth() -> usize {
    3
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_search_results() -> usize {
    1000
}

fn default_max_search_depth() -> usize {
    16
}

fn default_max_list_entries() -> usize {
    10_000
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_file_size: default_max_file_size(),
            max_search_results: default_max_search_results(),
            max_search_depth: default_max_search_depth(),
            max_list_entries: default_max_list_entries(),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// What a directory entry is, judged without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, devices
    Other,
}

/// Metadata for one filesystem entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    /// Path relative to the root, `/`-separated; `.` for the root itself
    pub relative_path: String,
    pub size: u64,
    pub kind: EntryKind,
    pub is_directory: bool,
    pub is_file: bool,
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    /// `rwxr-xr-x` style owner/group/other bits
    pub permission_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Response for search_files
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub pattern: String,
    pub base_directory: String,
    /// Raw pattern matches, before `maxResults` and before enrichment
    pub total_matched: usize,
    pub returned: usize,
    pub files: Vec<FileDescriptor>,
}

/// Response for read_directory
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub requested_path: String,
    /// Pre-order: a directory is followed by its own children
    pub entries: Vec<FileDescriptor>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Access denied: {0} is outside the root directory")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File too large: {size} bytes (max {limit})")]
    SizeExceeded { size: u64, limit: u64 },

    /// Metadata lookup for a single entry failed
    #[error("Cannot stat {path}: {source}")]
    FileInfo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{path} is not valid {encoding}")]
    Decode { path: String, encoding: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error on {path}: {kind}")]
    Io {
        path: String,
        kind: std::io::ErrorKind,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NavError {
    /// Classify an I/O failure on `path`, which must already be safe to show
    /// the caller (input or root-relative, never the absolute host path).
    pub fn from_io(err: &std::io::Error, path: impl Into<String>) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => NavError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => NavError::PermissionDenied(path),
            kind => NavError::Io { path, kind },
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;
