//! Filesystem source scanner.
//!
//! Roots are `<base_dir>/*/<log_subdir>` directories, resolved again on
//! every pass so new user directories are picked up, plus any configured
//! extra roots. Each root is walked recursively for files with the
//! configured extension.

use crate::config::FileSourceConfig;
use chatlog_application::{DedupLedger, DiscoveryError, DiscoveryReport, SourceScanner};
use chatlog_domain::{FileTask, UNKNOWN, ledger_key};
use glob::{Pattern, glob};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One scanned directory and the user its files belong to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub user_id: String,
}

impl SourceRoot {
    /// The user is the name of the root's parent directory
    /// (`<base>/<user>/chat-panel`).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user_id = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN.to_string());
        Self { path, user_id }
    }
}

/// [`SourceScanner`] over a local directory tree.
#[derive(Debug, Clone)]
pub struct FsSourceScanner {
    base_dir: PathBuf,
    log_subdir: String,
    extension: String,
    extra_roots: Vec<PathBuf>,
}

impl FsSourceScanner {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let defaults = FileSourceConfig::default();
        Self {
            base_dir: base_dir.into(),
            log_subdir: defaults.log_subdir,
            extension: defaults.extension,
            extra_roots: Vec::new(),
        }
    }

    pub fn from_config(config: &FileSourceConfig) -> Self {
        Self::new(&config.base_dir)
            .with_log_subdir(&config.log_subdir)
            .with_extension(&config.extension)
            .with_extra_roots(config.extra_roots.clone())
    }

    pub fn with_log_subdir(mut self, log_subdir: impl Into<String>) -> Self {
        self.log_subdir = log_subdir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_extra_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.extra_roots = roots;
        self
    }

    /// Expand the root pattern and append the extra roots.
    pub fn resolve_roots(&self) -> Result<Vec<SourceRoot>, DiscoveryError> {
        let mut roots = Vec::new();
        let base = absolute(&self.base_dir);
        let base_exists = !self.base_dir.as_os_str().is_empty() && base.is_dir();

        if base_exists {
            let pattern = format!(
                "{}/*/{}",
                Pattern::escape(&base.to_string_lossy()),
                Pattern::escape(&self.log_subdir)
            );
            let entries = glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_dir() => roots.push(SourceRoot::new(path)),
                    Ok(_) => {}
                    Err(e) => warn!("Unreadable entry while resolving roots: {}", e),
                }
            }
        }

        roots.extend(self.extra_roots.iter().map(|root| SourceRoot::new(absolute(root))));

        if roots.is_empty() && !base_exists {
            return Err(DiscoveryError::BaseDirMissing(base));
        }

        roots.sort();
        roots.dedup_by(|a, b| a.path == b.path);
        debug!("Resolved {} source roots", roots.len());
        Ok(roots)
    }
}

impl SourceScanner for FsSourceScanner {
    fn discover(
        &self,
        ledger: &dyn DedupLedger,
        max_batch: usize,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let roots = self.resolve_roots()?;
        let report = discover_tasks(&roots, &self.extension, ledger, max_batch)?;
        info!(
            "Found {} unprocessed files across {} roots",
            report.tasks.len(),
            report.roots_scanned
        );
        Ok(report)
    }
}

/// Collect unprocessed files under `roots`, oldest first.
///
/// Missing roots are reported and skipped. Ties in modification time are
/// broken by path. `max_batch == 0` means no cap.
pub fn discover_tasks(
    roots: &[SourceRoot],
    extension: &str,
    ledger: &dyn DedupLedger,
    max_batch: usize,
) -> Result<DiscoveryReport, DiscoveryError> {
    let mut report = DiscoveryReport::default();

    for root in roots {
        if !root.path.is_dir() {
            warn!("Source root does not exist: {}", root.path.display());
            report.missing_roots.push(root.path.clone());
            continue;
        }
        report.roots_scanned += 1;

        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(&root.path.to_string_lossy()),
            Pattern::escape(extension)
        );
        let entries = glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Unreadable entry under {}: {}", root.path.display(), e);
                    continue;
                }
            };
            if ledger.contains(&ledger_key(&path)) {
                continue;
            }

            match fs::metadata(&path).and_then(|meta| {
                if meta.is_file() {
                    meta.modified().map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(modified)) => {
                    report
                        .tasks
                        .push(FileTask::new(path, root.user_id.clone(), modified));
                }
                Ok(None) => {}
                Err(e) => warn!("Cannot stat {}: {}", path.display(), e),
            }
        }
    }

    report.tasks.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
    if max_batch > 0 {
        report.tasks.truncate(max_batch);
    }
    Ok(report)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
