use crate::domain::errors::RefreshError;
use crate::domain::models::{FileEntry, ScanConfig, ScanOutcome};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

fn is_excluded(entry: &DirEntry, config: &ScanConfig) -> bool {
    // The root is scanned even if its own name is in the exclusion set.
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| config.is_excluded(name))
}

/// Walks `root` depth-first and returns the allowed files, sorted by their
/// root-relative path.
///
/// Excluded names are pruned before descent, so nothing below them is ever
/// read. A directory that cannot be listed is logged and treated as empty.
pub fn scan_files(root: &Path, config: &ScanConfig) -> ScanOutcome {
    info!("Scanning for files in {}", root.display());
    debug!("Scan config: {:?}", config);

    let mut outcome = ScanOutcome::default();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded(e, config))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                warn!("Could not read directory {}: {}", path.display(), err);
                outcome.unreadable.push(path);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(extension) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !config.allows_extension(extension) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        debug!("Found matching file: {}", relative.display());
        outcome.entries.push(FileEntry {
            path: relative,
            extension: extension.to_string(),
        });
    }

    outcome.entries.sort_by(|a, b| a.path.cmp(&b.path));

    let mut by_extension: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &outcome.entries {
        *by_extension.entry(entry.extension.as_str()).or_default() += 1;
    }
    debug!("Files by extension: {:?}", by_extension);
    info!(
        "Found {} matching files ({} unreadable directories skipped)",
        outcome.entries.len(),
        outcome.unreadable.len()
    );
    outcome
}

/// Reads the current README. A missing file means there is no README yet.
pub fn load_readme(path: &Path) -> Result<String, RefreshError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            debug!("Read {} bytes from {}", contents.len(), path.display());
            Ok(contents)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("No README at {}, it will be created", path.display());
            Ok(String::new())
        }
        Err(source) => Err(RefreshError::ReadmeUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads the package manifest. The manifest is mandatory.
pub fn load_manifest(path: &Path) -> Result<String, RefreshError> {
    let contents = fs::read_to_string(path).map_err(|source| RefreshError::ManifestUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", contents.len(), path.display());
    Ok(contents)
}

/// Returns at most `max_lines` leading lines of a UTF-8 file, joined by `\n`.
pub fn read_leading_lines(path: &Path, max_lines: usize) -> io::Result<String> {
    let reader = BufReader::new(fs::File::open(path)?);
    let lines = reader
        .lines()
        .take(max_lines)
        .collect::<io::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}
