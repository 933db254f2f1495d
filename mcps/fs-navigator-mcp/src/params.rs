//! Parameter types for the navigator tools
//!
//! Agents frequently send `"true"` or `"50"` where a bool or number is
//! expected, so flags and counts are parsed leniently.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::reader::Encoding;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilesParams {
    #[schemars(description = "Glob pattern, e.g. '*.rs', '**/*.json', 'src/**/*.{ts,tsx}'")]
    pub pattern: String,

    #[schemars(description = "Directory to search in, relative to the root (default: '.')")]
    #[serde(default = "default_directory")]
    pub directory: String,

    #[schemars(description = "Maximum number of files to return (default: 50)")]
    #[serde(default = "default_max_results", deserialize_with = "deserialize_lenient_usize")]
    pub max_results: usize,

    #[schemars(description = "Include entries whose name starts with '.' (default: false)")]
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub include_hidden: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadDirectoryParams {
    #[schemars(description = "Directory to list, relative to the root")]
    pub path: String,

    #[schemars(description = "Include entries whose name starts with '.' (default: false)")]
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub include_hidden: bool,

    #[schemars(description = "List subdirectories recursively (default: false)")]
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub recursive: bool,

    #[schemars(description = "Recursion depth limit (default: server setting, 3 unless configured)")]
    #[serde(default, deserialize_with = "deserialize_lenient_opt_usize")]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetFileInfoParams {
    #[schemars(description = "File or directory, relative to the root")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileContentParams {
    #[schemars(description = "File to read, relative to the root")]
    pub path: String,

    #[schemars(description = "utf8 (default), ascii, latin1, base64 or hex")]
    #[serde(default)]
    pub encoding: Encoding,

    #[schemars(description = "Size limit in bytes for this read (default: server setting)")]
    #[serde(default, deserialize_with = "deserialize_lenient_opt_u64")]
    pub max_size: Option<u64>,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_max_results() -> usize {
    50
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Lenient::Bool(b)) => Ok(b),
        Some(Lenient::Int(n)) => Ok(n != 0),
        Some(Lenient::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(D::Error::custom(format!("expected a boolean, got '{}'", other))),
        },
        Some(Lenient::Float(f)) => Err(D::Error::custom(format!("expected a boolean, got {}", f))),
    }
}

fn lenient_u64<E: serde::de::Error>(value: Lenient) -> Result<u64, E> {
    match value {
        Lenient::Int(n) if n >= 0 => Ok(n as u64),
        Lenient::Int(n) => Err(E::custom(format!("expected a non-negative number, got {}", n))),
        Lenient::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        Lenient::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| E::custom(format!("expected a non-negative number, got '{}'", s))),
        Lenient::Float(f) => Err(E::custom(format!("expected a non-negative number, got {}", f))),
        Lenient::Bool(b) => Err(E::custom(format!("expected a number, got {}", b))),
    }
}

pub fn deserialize_lenient_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_u64(Lenient::deserialize(deserializer)?)?;
    usize::try_from(value).map_err(serde::de::Error::custom)
}

pub fn deserialize_lenient_opt_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Lenient>::deserialize(deserializer)?
        .map(|v| lenient_u64(v).and_then(|n| usize::try_from(n).map_err(serde::de::Error::custom)))
        .transpose()
}

pub fn deserialize_lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Lenient>::deserialize(deserializer)?
        .map(lenient_u64)
        .transpose()
}
