use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

use crate::policy::INCOMPLETE_MARKERS;

/// Directories never scanned
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// First incomplete-work marker found in `content`, ignoring case
pub fn find_marker(content: &str) -> Option<&'static str> {
    let content = content.to_lowercase();
    INCOMPLETE_MARKERS
        .iter()
        .copied()
        .find(|m| content.contains(&m.to_lowercase()))
}

fn is_skipped(path: &Path, root: &Path, excluded: &[&Path]) -> bool {
    if excluded.iter().any(|dir| path.starts_with(dir)) {
        return true;
    }
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| SKIPPED_DIRS.iter().any(|d| c.as_os_str() == *d))
}

/// Files under `root` modified within `window`, newest first, at most `limit`
pub fn recently_modified_files(
    root: &Path,
    window: Duration,
    limit: usize,
    excluded: &[&Path],
) -> Result<Vec<PathBuf>> {
    let now = SystemTime::now();
    let mut recent: Vec<(SystemTime, PathBuf)> = Vec::new();

    // Skipped subtrees are pruned, never descended into
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e.path(), root, excluded))
        .filter_map(|e| e.ok());

    for entry in walker {
        let path = entry.into_path();
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        // Timestamps in the future count as recent
        let age = now.duration_since(modified).unwrap_or_default();
        if age <= window {
            recent.push((modified, path));
        }
    }

    recent.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(recent.into_iter().take(limit).map(|(_, p)| p).collect())
}

/// Scan recently modified files for incomplete-work markers.
/// Returns one "<path>: contains '<marker>'" line per flagged file.
pub fn check(root: &Path, window: Duration, limit: usize, excluded: &[&Path]) -> Result<Vec<String>> {
    let files = recently_modified_files(root, window, limit, excluded)?;
    let mut issues = Vec::new();

    for path in files {
        let Ok(bytes) = fs::read(&path) else { continue };
        if let Some(marker) = find_marker(&String::from_utf8_lossy(&bytes)) {
            issues.push(format!("{}: contains '{}'", path.display(), marker));
        }
    }

    Ok(issues)
}
