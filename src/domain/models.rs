use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::domain::errors::RefreshError;

pub const DEFAULT_EXTENSIONS: &str = ".js,.jsx,.ts,.tsx,.md";
pub const DEFAULT_EXCLUDES: &str = "node_modules,.git,dist";
pub const DEFAULT_MAX_LINES: usize = 20;
pub const DEFAULT_PER_DIR: usize = 3;
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A file discovered by the scanner, relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub extension: String,
}

/// Extension allow-list and excluded directory names for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    extensions: BTreeSet<String>,
    excluded: BTreeSet<String>,
}

impl ScanConfig {
    /// Extensions are stored without their leading dot, so `.js` and `js`
    /// name the same entry.
    pub fn new<E, X>(extensions: E, excluded: X) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        let excluded = excluded
            .into_iter()
            .map(|x| x.as_ref().trim().to_string())
            .filter(|x| !x.is_empty())
            .collect();
        Self {
            extensions,
            excluded,
        }
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub entries: Vec<FileEntry>,
    pub unreadable: Vec<PathBuf>,
}

impl ScanOutcome {
    pub fn relative_paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SamplingLimits {
    pub max_lines: usize,
    pub per_dir: usize,
}

impl Default for SamplingLimits {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            per_dir: DEFAULT_PER_DIR,
        }
    }
}

#[derive(Debug)]
pub struct ProjectContext {
    pub readme: String,
    pub manifest: String,
    pub files: Vec<PathBuf>,
    pub snippets: Vec<Snippet>,
}

/// Everything one run needs, gathered up front instead of read from the
/// process environment mid-pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub readme_path: PathBuf,
    pub manifest_path: PathBuf,
    pub scan: ScanConfig,
    pub limits: SamplingLimits,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl RunConfig {
    /// Config rooted at `root` with the stock README and manifest locations.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            readme_path: root.join("README.md"),
            manifest_path: root.join("package.json"),
            scan: ScanConfig::new(DEFAULT_EXTENSIONS.split(','), DEFAULT_EXCLUDES.split(',')),
            limits: SamplingLimits::default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
            root,
        }
    }

    pub fn api_key(&self) -> Result<&str, RefreshError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(RefreshError::MissingCredential),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated { bytes: usize },
    UpToDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_normalizes_extensions() {
        let config = ScanConfig::new([".js", "md", " .ts ", ""], ["node_modules", " "]);

        assert!(config.allows_extension("js"));
        assert!(config.allows_extension("md"));
        assert!(config.allows_extension("ts"));
        assert!(!config.allows_extension(""));
        assert!(config.is_excluded("node_modules"));
        assert!(!config.is_excluded(""));
    }

    #[test]
    fn test_api_key_required() {
        let mut config = RunConfig::for_root("/repo");
        assert!(matches!(
            config.api_key(),
            Err(RefreshError::MissingCredential)
        ));

        config.api_key = Some("   ".to_string());
        assert!(config.api_key().is_err());

        config.api_key = Some("secret".to_string());
        assert_eq!(config.api_key().unwrap(), "secret");
    }

    #[test]
    fn test_for_root_defaults() {
        let config = RunConfig::for_root("/repo");
        assert_eq!(config.readme_path, PathBuf::from("/repo/README.md"));
        assert_eq!(config.manifest_path, PathBuf::from("/repo/package.json"));
        assert_eq!(config.limits.max_lines, 20);
        assert!(config.scan.allows_extension("tsx"));
        assert!(config.scan.is_excluded("dist"));
    }
}
