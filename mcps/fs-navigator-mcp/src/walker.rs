//! Bounded, optionally recursive directory listing
//!
//! Only the top-level directory can fail the request. Below that, an entry
//! that can't be described or a subdirectory that can't be opened is skipped.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs;

use crate::context::RootContext;
use crate::metadata;
use crate::types::{DirectoryListing, FileDescriptor, NavError, NavResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub include_hidden: bool,
    pub recursive: bool,
    /// Recursion ceiling; `None` means the configured default. Never exceeds
    /// the configured ceiling.
    pub max_depth: Option<usize>,
}

/// read_directory: list `input` (root-relative) in pre-order, siblings
/// sorted by name.
///
/// With `max_depth = n` the listing descends into a directory found at depth
/// `d` only when `d + 1 < n`; the starting directory's children are depth 0.
/// So `max_depth = 1` lists the direct children and nothing below them.
pub async fn list_directory(
    ctx: &RootContext,
    input: &str,
    options: ListOptions,
) -> NavResult<DirectoryListing> {
    let resolved = ctx.sandbox().resolve(input)?;
    let path = ctx.sandbox().confine_existing(&resolved, input)?;

    let read_dir = match fs::read_dir(&path).await {
        Ok(read_dir) => read_dir,
        Err(e) => {
            return Err(match fs::metadata(&path).await {
                Ok(meta) if !meta.is_dir() => {
                    NavError::InvalidArgument(format!("{} is not a directory", input))
                }
                _ => NavError::from_io(&e, input),
            });
        }
    };

    let ceiling = ctx.limits().max_depth;
    let max_depth = options.max_depth.map_or(ceiling, |d| d.min(ceiling));

    tracing::debug!(
        path = %input,
        recursive = options.recursive,
        max_depth,
        "Listing directory"
    );

    let mut walk = Walk {
        ctx,
        include_hidden: options.include_hidden,
        recursive: options.recursive,
        max_depth,
        limit: ctx.limits().max_list_entries,
        entries: Vec::new(),
        truncated: false,
    };
    walk.visit(read_dir, 0).await;

    if walk.truncated {
        tracing::info!(path = %input, limit = walk.limit, "Listing truncated");
    }

    Ok(DirectoryListing {
        requested_path: ctx.sandbox().relative(&path),
        entries: walk.entries,
        truncated: walk.truncated,
    })
}

struct Walk<'a> {
    ctx: &'a RootContext,
    include_hidden: bool,
    recursive: bool,
    max_depth: usize,
    limit: usize,
    entries: Vec<FileDescriptor>,
    truncated: bool,
}

impl<'a> Walk<'a> {
    fn visit<'s>(
        &'s mut self,
        read_dir: fs::ReadDir,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        Box::pin(async move {
            for (name, path) in sorted_entries(read_dir).await {
                if self.truncated {
                    return;
                }
                if !self.ctx.filter().admits(&name, self.include_hidden) {
                    continue;
                }

                let relative = self.ctx.sandbox().relative(&path);
                let Some(descriptor) = metadata::describe_entry(&path, relative).await else {
                    continue;
                };

                if self.entries.len() >= self.limit {
                    self.truncated = true;
                    return;
                }

                let descend = self.recursive && descriptor.is_directory && depth + 1 < self.max_depth;
                self.entries.push(descriptor);

                if descend {
                    match fs::read_dir(&path).await {
                        Ok(child) => self.visit(child, depth + 1).await,
                        Err(e) => {
                            tracing::debug!(
                                "Skipping unreadable directory {}: {}",
                                self.ctx.sandbox().relative(&path),
                                e
                            );
                        }
                    }
                }
            }
        })
    }
}

/// Drain a directory handle into `(name, path)` pairs sorted by name.
async fn sorted_entries(mut read_dir: fs::ReadDir) -> Vec<(String, PathBuf)> {
    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                entries.push((entry.file_name().to_string_lossy().to_string(), entry.path()))
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Directory enumeration stopped early: {}", e);
                break;
            }
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
