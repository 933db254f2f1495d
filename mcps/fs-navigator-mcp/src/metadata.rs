//! File metadata extraction
//!
//! One `symlink_metadata` call per entry. Symlinks are described as
//! themselves and never followed.

use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs;

use crate::context::RootContext;
use crate::types::{EntryKind, FileDescriptor, NavError, NavResult};

/// Describe the entry at `path`.
///
/// Fails with [`NavError::FileInfo`] if the status query fails.
pub async fn describe(path: &Path, relative_path: String) -> NavResult<FileDescriptor> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) => Ok(build_descriptor(path, relative_path, &metadata)),
        Err(source) => Err(NavError::FileInfo {
            path: relative_path,
            source,
        }),
    }
}

/// [`describe`] for use inside multi-entry operations: a failure means the
/// entry is skipped.
pub async fn describe_entry(path: &Path, relative_path: String) -> Option<FileDescriptor> {
    match describe(path, relative_path).await {
        Ok(descriptor) => Some(descriptor),
        Err(e) => {
            tracing::debug!("Skipping entry: {}", e);
            None
        }
    }
}

/// get_file_info: describe one caller-named path.
///
/// Symlinks among the parent directories are followed and must stay inside
/// the root; a symlink as the final component is described, not followed.
pub async fn stat(ctx: &RootContext, input: &str) -> NavResult<FileDescriptor> {
    let resolved = ctx.sandbox().resolve(input)?;
    let path = ctx.sandbox().confine_parent(&resolved, input)?;
    let relative = ctx.sandbox().relative(&path);

    describe(&path, relative).await.map_err(|e| match e {
        NavError::FileInfo { source, .. } => NavError::from_io(&source, input),
        other => other,
    })
}

fn build_descriptor(path: &Path, relative_path: String, metadata: &Metadata) -> FileDescriptor {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| relative_path.clone());

    let content_type = match kind {
        EntryKind::File => content_type_for(path),
        _ => None,
    };

    FileDescriptor {
        name,
        relative_path,
        size: metadata.len(),
        kind,
        is_directory: kind == EntryKind::Directory,
        is_file: kind == EntryKind::File,
        modified_time: metadata.modified().ok().map(DateTime::<Utc>::from),
        created_time: metadata.created().ok().map(DateTime::<Utc>::from),
        permission_string: permissions_of(metadata),
        content_type,
    }
}

/// MIME type guessed from the extension; `None` when unknown.
pub fn content_type_for(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

#[cfg(unix)]
fn permissions_of(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    permission_string(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn permissions_of(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        permission_string(0o444)
    } else {
        permission_string(0o666)
    }
}

/// Render the owner/group/other rwx bits of `mode` as nine characters.
pub fn permission_string(mode: u32) -> String {
    const BITS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    BITS.iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}
