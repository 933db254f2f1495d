//! The immutable per-process root context
//!
//! Built once from [`Config`] at startup, then shared behind an `Arc` by every
//! request handler. Nothing in it changes afterwards.

use std::path::Path;

use crate::filter::ExclusionFilter;
use crate::sandbox::Sandbox;
use crate::types::{Config, Limits, NavError, NavResult};

#[derive(Debug, Clone)]
pub struct RootContext {
    sandbox: Sandbox,
    filter: ExclusionFilter,
    limits: Limits,
}

impl RootContext {
    /// Canonicalise the root and compile the exclusion patterns.
    pub fn new(config: &Config) -> NavResult<Self> {
        let root = config.root.canonicalize().map_err(|e| {
            NavError::Config(format!(
                "Root directory {} is not accessible: {}",
                config.root.display(),
                e
            ))
        })?;

        if !root.is_dir() {
            return Err(NavError::Config(format!(
                "Root {} is not a directory",
                root.display()
            )));
        }

        let filter = ExclusionFilter::new(&config.exclude_patterns)?;

        tracing::info!(
            root = %root.display(),
            max_depth = config.limits.max_depth,
            max_file_size = config.limits.max_file_size,
            excluded = config.exclude_patterns.len(),
            "Root context ready"
        );

        Ok(Self {
            sandbox: Sandbox::new(root),
            filter,
            limits: config.limits.clone(),
        })
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}
