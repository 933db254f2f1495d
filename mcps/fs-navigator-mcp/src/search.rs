//! Glob search under a base directory
//!
//! Patterns use globset syntax: `*` stays within one path segment, `**`
//! spans segments, `{a,b}` alternates. They match paths relative to the base
//! directory. Excluded and (unless asked for) hidden entries are pruned
//! during the walk, so nothing beneath them can match either.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tokio::fs;
use walkdir::WalkDir;

use crate::context::RootContext;
use crate::filter::ExclusionFilter;
use crate::metadata;
use crate::types::{NavError, NavResult, SearchResult};

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Must be positive; clamped to the configured `max_search_results`
    pub max_results: usize,
    pub include_hidden: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 50,
            include_hidden: false,
        }
    }
}

/// search_files: match `pattern` under `directory` (root-relative).
pub async fn search(
    ctx: &RootContext,
    pattern: &str,
    directory: &str,
    options: SearchOptions,
) -> NavResult<SearchResult> {
    if options.max_results == 0 {
        return Err(NavError::InvalidArgument(
            "maxResults must be at least 1".to_string(),
        ));
    }
    let matcher = compile(pattern)?;
    let max_results = options.max_results.min(ctx.limits().max_search_results);

    let resolved = ctx.sandbox().resolve(directory)?;
    let base = ctx.sandbox().confine_existing(&resolved, directory)?;
    match fs::metadata(&base).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(NavError::InvalidArgument(format!(
                "{} is not a directory",
                directory
            )))
        }
        Err(e) => return Err(NavError::from_io(&e, directory)),
    }

    tracing::debug!(pattern = %pattern, directory = %directory, max_results, "Searching");

    let walk_base = base.clone();
    let filter = ctx.filter().clone();
    let include_hidden = options.include_hidden;
    let max_depth = ctx.limits().max_search_depth;
    let matches = tokio::task::spawn_blocking(move || {
        collect_matches(&walk_base, &matcher, &filter, include_hidden, max_depth, max_results)
    })
    .await
    .map_err(|e| NavError::Internal(format!("search task failed: {}", e)))?;

    Ok(assemble(ctx, pattern, &base, matches).await)
}

fn compile(pattern: &str) -> NavResult<GlobMatcher> {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    if pattern.is_empty() {
        return Err(NavError::InvalidArgument("pattern is empty".to_string()));
    }

    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| NavError::InvalidArgument(format!("invalid pattern: {}", e)))
}

/// Walk `base` in sorted order, counting every match but keeping only the
/// first `keep` of them.
fn collect_matches(
    base: &Path,
    matcher: &GlobMatcher,
    filter: &ExclusionFilter,
    include_hidden: bool,
    max_depth: usize,
    keep: usize,
) -> Matches {
    let walk = WalkDir::new(base)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        // The base itself is depth 0 and is never pruned, even if hidden
        .filter_entry(|entry| {
            entry.depth() == 0
                || filter.admits(&entry.file_name().to_string_lossy(), include_hidden)
        });

    let mut matches = Matches::default();
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry during search: {}", e);
                continue;
            }
        };

        let is_match = entry
            .path()
            .strip_prefix(base)
            .map(|rel| matcher.is_match(rel))
            .unwrap_or(false);
        if !is_match {
            continue;
        }

        matches.total += 1;
        if matches.kept.len() < keep {
            matches.kept.push(entry.into_path());
        }
    }
    matches
}

#[derive(Debug, Default)]
struct Matches {
    /// Every match seen by the walk
    total: usize,
    /// The first matches, in walk order
    kept: Vec<PathBuf>,
}

/// Enrich the kept matches. A match that can't be described
/// is dropped from `files` but still counts towards `total_matched`.
async fn assemble(
    ctx: &RootContext,
    pattern: &str,
    base: &Path,
    matches: Matches,
) -> SearchResult {
    let mut files = Vec::with_capacity(matches.kept.len());
    for path in matches.kept {
        let relative = ctx.sandbox().relative(&path);
        if let Some(descriptor) = metadata::describe_entry(&path, relative).await {
            files.push(descriptor);
        }
    }

    SearchResult {
        pattern: pattern.to_string(),
        base_directory: ctx.sandbox().relative(base),
        total_matched: matches.total,
        returned: files.len(),
        files,
    }
}
