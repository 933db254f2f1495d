//! Size-bounded file content reads

use std::fmt::Write as _;

use base64::Engine as _;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::context::RootContext;
use crate::metadata::content_type_for;
use crate::types::{NavError, NavResult};

/// How file bytes are turned into the returned text.
///
/// `utf8` and `ascii` are strict: invalid input is an error, never replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    Ascii,
    /// One char per byte
    #[serde(alias = "binary")]
    Latin1,
    Base64,
    Hex,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin1",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        }
    }

    /// `None` when the bytes are not valid in this encoding.
    pub fn decode(&self, bytes: Vec<u8>) -> Option<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).ok(),
            Encoding::Ascii if bytes.is_ascii() => String::from_utf8(bytes).ok(),
            Encoding::Ascii => None,
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Base64 => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Encoding::Hex => {
                let mut out = String::with_capacity(bytes.len() * 2);
                for b in &bytes {
                    let _ = write!(out, "{:02x}", b);
                }
                Some(out)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub encoding: Encoding,
    /// Per-call ceiling in bytes; `None` or `0` means the configured default
    pub max_size: Option<u64>,
}

/// Raw bytes of a file inside the root
#[derive(Debug)]
pub struct RawContent {
    pub relative_path: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// read_file_content: read and decode `input` (root-relative).
pub async fn read_content(
    ctx: &RootContext,
    input: &str,
    options: ReadOptions,
) -> NavResult<String> {
    let raw = read_bytes(ctx, input, options.max_size).await?;
    let size = raw.bytes.len();

    let text = options.encoding.decode(raw.bytes).ok_or_else(|| NavError::Decode {
        path: input.to_string(),
        encoding: options.encoding.as_str().to_string(),
    })?;

    tracing::debug!(path = %raw.relative_path, size, encoding = options.encoding.as_str(), "Read file");
    Ok(text)
}

/// Read a whole file, refusing before any read if it exceeds the ceiling.
pub async fn read_bytes(
    ctx: &RootContext,
    input: &str,
    max_size: Option<u64>,
) -> NavResult<RawContent> {
    let resolved = ctx.sandbox().resolve(input)?;
    let path = ctx.sandbox().confine_existing(&resolved, input)?;

    let meta = fs::metadata(&path)
        .await
        .map_err(|e| NavError::from_io(&e, input))?;
    if !meta.is_file() {
        return Err(NavError::InvalidArgument(format!(
            "{} is not a regular file",
            input
        )));
    }

    let limit = max_size
        .filter(|&m| m > 0)
        .unwrap_or(ctx.limits().max_file_size);
    if meta.len() > limit {
        return Err(NavError::SizeExceeded {
            size: meta.len(),
            limit,
        });
    }

    // The file may have grown since the stat; never hand back more than `limit`.
    let file = fs::File::open(&path)
        .await
        .map_err(|e| NavError::from_io(&e, input))?;
    let mut bytes = Vec::with_capacity(meta.len() as usize);
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| NavError::from_io(&e, input))?;
    if bytes.len() as u64 > limit {
        return Err(NavError::SizeExceeded {
            size: bytes.len() as u64,
            limit,
        });
    }

    Ok(RawContent {
        relative_path: ctx.sandbox().relative(&resolved),
        content_type: content_type_for(&path),
        bytes,
    })
}
