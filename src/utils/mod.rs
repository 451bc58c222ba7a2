//! Utilities: path collection, size formatting, external tool invocation.

use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;

use crate::error::{ForgeError, Result};

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths. Patterns without glob
/// metacharacters pass through as literal paths, so plain filenames work
/// unchanged.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| ForgeError::Other {
        message: err.to_string(),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| ForgeError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    // A literal path with no matches (e.g. a typo'd filename) comes back
    // empty from glob; surface it so the caller can report the right file.
    if resolved_paths.is_empty() && !pattern.contains(['*', '?', '[']) {
        resolved_paths.push(PathBuf::from(pattern));
    }

    Ok(resolved_paths)
}

/// Recursively collect image files under a directory, sorted by path.
///
/// Recognizes png/jpg/jpeg extensions, case-insensitive.
pub fn collect_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|err| ForgeError::Other {
            message: err.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "png" | "jpg" | "jpeg"))
            .unwrap_or(false);

        if is_image {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Run an external collaborator tool and capture its output.
///
/// A missing executable maps to [`ForgeError::ToolMissing`] with the given
/// install hint; a non-zero exit maps to [`ForgeError::ToolFailed`]
/// carrying the tool's stderr. There is no retry.
pub async fn run_tool(tool: &str, args: &[&str], hint: &str) -> Result<Output> {
    log::debug!("running {tool} {args:?}");

    let output = match Command::new(tool).args(args).output().await {
        Ok(output) => output,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ForgeError::tool_missing(tool, hint));
        }
        Err(err) => return Err(err.into()),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ForgeError::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
            stderr,
        });
    }

    Ok(output)
}

/// Verify an external tool is installed without running real work.
///
/// Only the tool's presence matters here; version flags exit non-zero on
/// some of our collaborators, so the exit status is ignored.
pub async fn check_tool(tool: &str, probe_args: &[&str], hint: &str) -> Result<()> {
    match Command::new(tool).args(probe_args).output().await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ForgeError::tool_missing(tool, hint))
        }
        Err(err) => Err(err.into()),
    }
}
