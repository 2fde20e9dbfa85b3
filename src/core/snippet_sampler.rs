use crate::domain::models::{SamplingLimits, Snippet};
use crate::infra::file_system::read_leading_lines;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// First component of a root-relative path: the top-level directory, or the
/// file name itself for files at the root.
fn group_key(path: &Path) -> String {
    path.components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Groups `paths` by top-level directory, keeping first-seen group order.
fn group_by_top_level(paths: &[PathBuf]) -> Vec<(String, Vec<&PathBuf>)> {
    let mut groups: Vec<(String, Vec<&PathBuf>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in paths {
        let key = group_key(path);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(path);
    }

    groups
}

/// Reads the leading lines of up to `limits.per_dir` files from each
/// top-level group. Files that cannot be read are logged and skipped, and
/// the next file in the group takes their place.
pub fn sample_snippets(root: &Path, paths: &[PathBuf], limits: &SamplingLimits) -> Vec<Snippet> {
    let groups = group_by_top_level(paths);
    debug!(
        "Sampling snippets from {} groups (max {} files, {} lines each)",
        groups.len(),
        limits.per_dir,
        limits.max_lines
    );

    let mut snippets = Vec::new();
    for (key, files) in groups {
        let sampled = files
            .into_iter()
            .filter_map(|path| match read_leading_lines(&root.join(path), limits.max_lines) {
                Ok(content) => Some(Snippet {
                    path: path.clone(),
                    content,
                }),
                Err(err) => {
                    warn!("Skipping snippet {}: {}", path.display(), err);
                    None
                }
            })
            .take(limits.per_dir);

        for snippet in sampled {
            debug!("Sampled {} from group {}", snippet.path.display(), key);
            snippets.push(snippet);
        }
    }

    info!("Collected {} snippets", snippets.len());
    snippets
}
