//! Startup configuration: TOML file, then command line / environment

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::server::FsNavigatorServer;
use crate::types::{Config, NavResult};

/// Sandboxed, read-only filesystem navigator over MCP (stdio)
#[derive(Debug, Default, Parser)]
#[command(name = "fs-navigator-mcp", version, about)]
pub struct Cli {
    /// TOML config file (otherwise the standard locations are searched)
    #[arg(long, env = "FS_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Directory all operations are confined to
    #[arg(long, env = "FS_ROOT_PATH")]
    pub root: Option<PathBuf>,

    /// Recursion ceiling for directory listings
    #[arg(long, env = "FS_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Largest readable file in bytes
    #[arg(long, env = "FS_MAX_FILE_SIZE")]
    pub max_file_size: Option<u64>,

    /// Entry names to exclude, comma-separated (e.g. "node_modules,*.log")
    #[arg(long = "exclude", env = "FS_EXCLUDE_PATTERNS", value_delimiter = ',')]
    pub exclude_patterns: Option<Vec<String>>,
}

impl Cli {
    /// The file layer with command-line / environment values on top.
    pub fn into_config(self) -> Config {
        let mut config = load_config(self.config.as_deref());

        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(max_depth) = self.max_depth {
            config.limits.max_depth = max_depth;
        }
        if let Some(max_file_size) = self.max_file_size {
            config.limits.max_file_size = max_file_size;
        }
        if let Some(patterns) = self.exclude_patterns {
            config.exclude_patterns = patterns
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        config
    }

    pub fn into_server(self) -> NavResult<FsNavigatorServer> {
        FsNavigatorServer::with_config(self.into_config())
    }
}

/// Load config from the first candidate file that parses.
///
/// Candidates, in order:
/// 1. `explicit` (`--config` / `FS_CONFIG_PATH`)
/// 2. `./fs-navigator.toml`
/// 3. `$XDG_CONFIG_HOME/fs-navigator/config.toml`
/// 4. `~/.fs-navigator.toml`
///
/// Falls back to the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        if !path.exists() {
            tracing::warn!("Config file {} does not exist", path.display());
        }
    }

    for path in config_candidates(explicit) {
        if let Some(config) = read_config(&path) {
            tracing::info!("Loaded config from {}", path.display());
            return config;
        }
    }

    tracing::info!("Using default configuration");
    Config::default()
}

fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }

    paths.push(PathBuf::from("fs-navigator.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fs-navigator").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".fs-navigator.toml"));
    }

    paths
}

fn read_config(path: &Path) -> Option<Config> {
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read config {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str::<Config>(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.toml");
        std::fs::write(
            &path,
            r#"
            root = "/srv/data"
            exclude_patterns = ["target"]

            [limits]
            max_file_size = 2048
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.root, PathBuf::from("/srv/data"));
        assert_eq!(config.exclude_patterns, vec!["target"]);
        assert_eq!(config.limits.max_file_size, 2048);
        assert_eq!(config.limits.max_depth, 3);
    }

    #[test]
    fn test_unparseable_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "root = [not toml").unwrap();

        assert!(read_config(&path).is_none());
        assert!(read_config(&dir.path().join("absent.toml")).is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.toml");
        std::fs::write(&path, "root = \"/srv/data\"\n[limits]\nmax_depth = 7\n").unwrap();

        let cli = Cli::try_parse_from([
            "fs-navigator-mcp",
            "--config",
            path.to_str().unwrap(),
            "--root",
            "/srv/other",
            "--max-file-size",
            "99",
            "--exclude",
            "*.log, node_modules,,",
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(config.root, PathBuf::from("/srv/other"));
        assert_eq!(config.limits.max_depth, 7);
        assert_eq!(config.limits.max_file_size, 99);
        assert_eq!(config.exclude_patterns, vec!["*.log", "node_modules"]);
    }

    #[test]
    fn test_into_server_requires_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("absent.toml")),
            root: Some(dir.path().join("missing")),
            ..Default::default()
        };
        assert!(cli.into_server().is_err());
    }
}
