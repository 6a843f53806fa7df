//! Workspace: explicit upload and result directories
//!
//! Callers hand the engine a `Workspace` instead of relying on process-wide
//! `uploads/` and `results/` folders. The workspace stores uploads under
//! sanitized names, decodes source files, and writes report files.

use super::{BatchReport, SkipReason, SkippedFile, SourceFile};
use crate::config::PairsimConfig;
use crate::report::{self, ReportFormat};
use crate::{PairsimError, PairsimResult};
use std::path::{Path, PathBuf};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Files decoded by the loader plus the ones it had to leave out
#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    upload_dir: PathBuf,
    result_dir: PathBuf,
    max_file_bytes: u64,
}

impl Workspace {
    pub fn new(upload_dir: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            result_dir: result_dir.into(),
            max_file_bytes: PairsimConfig::default().max_file_bytes,
        }
    }

    pub fn from_config(config: &PairsimConfig) -> Self {
        Self::new(&config.upload_dir, &config.result_dir).with_max_file_bytes(config.max_file_bytes)
    }

    pub fn with_max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = limit;
        self
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    pub fn ensure_dirs(&self) -> PairsimResult<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.result_dir)?;
        Ok(())
    }

    /// Store uploaded bytes under a sanitized version of `name`.
    /// Returns the stored file name.
    pub fn store_upload(&self, name: &str, bytes: &[u8]) -> PairsimResult<String> {
        let safe = secure_filename(name).ok_or_else(|| PairsimError::InvalidFileName(name.to_string()))?;
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::write(self.upload_dir.join(&safe), bytes)?;
        tracing::debug!("Stored upload {:?} as {}", name, safe);
        Ok(safe)
    }

    /// Load every file in the upload directory
    pub fn load_upload_dir(&self) -> LoadedSources {
        self.load_sources(std::slice::from_ref(&self.upload_dir))
    }

    /// Load files and directories. Directory entries are walked in file name
    /// order and identified by their path relative to that directory; plain
    /// files keep the path they were given as their identifier.
    pub fn load_sources(&self, paths: &[PathBuf]) -> LoadedSources {
        let mut loaded = LoadedSources::default();

        for path in paths {
            if path.is_dir() {
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    let id = entry
                        .path()
                        .strip_prefix(path)
                        .unwrap_or(entry.path())
                        .to_string_lossy()
                        .replace('\\', "/");
                    self.load_one(entry.path(), id, &mut loaded);
                }
            } else {
                self.load_one(path, path.display().to_string(), &mut loaded);
            }
        }

        tracing::info!(
            "Loaded {} source files ({} skipped)",
            loaded.files.len(),
            loaded.skipped.len()
        );
        loaded
    }

    fn load_one(&self, path: &Path, id: String, loaded: &mut LoadedSources) {
        match self.read_source(path) {
            Ok(text) => loaded.files.push(SourceFile::new(id, text)),
            Err(reason) => {
                tracing::warn!("Skipping {}: {}", path.display(), reason);
                loaded.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    fn read_source(&self, path: &Path) -> Result<String, SkipReason> {
        let meta = std::fs::metadata(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        if meta.len() > self.max_file_bytes {
            return Err(SkipReason::TooLarge {
                bytes: meta.len(),
                limit: self.max_file_bytes,
            });
        }
        let bytes = std::fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)
    }

    /// Write one report file per format into the result directory
    pub fn write_results(
        &self,
        report: &BatchReport,
        formats: &[ReportFormat],
    ) -> PairsimResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.result_dir)?;
        let mut written = Vec::with_capacity(formats.len());
        for format in formats {
            let path = self.result_dir.join(format.file_name());
            report::write_report(report, *format, &path)?;
            tracing::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Reduce a client-supplied file name to a safe flat name.
///
/// Accented characters are folded to ASCII (NFKD, combining marks removed)
/// and any remaining non-ASCII is dropped. Path separators and whitespace runs
/// become `_`, anything outside `[A-Za-z0-9._-]` is removed, and leading or
/// trailing `.`/`_` are trimmed. `None` if nothing usable remains.
pub fn secure_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c) && c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = filtered.trim_matches(|c: char| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("solution.py").as_deref(), Some("solution.py"));
        assert_eq!(secure_filename("My cool file.py").as_deref(), Some("My_cool_file.py"));
        assert_eq!(secure_filename("../../etc/passwd").as_deref(), Some("etc_passwd"));
        assert_eq!(secure_filename("C:\\temp\\a.py").as_deref(), Some("C_temp_a.py"));
        assert_eq!(secure_filename("résumé.py").as_deref(), Some("resume.py"));
        assert_eq!(secure_filename("Ünïcödé ﬁle.py").as_deref(), Some("Unicode_file.py"));
        assert_eq!(secure_filename("日本.py").as_deref(), Some("py"));
        assert_eq!(secure_filename(".hidden").as_deref(), Some("hidden"));
        assert_eq!(secure_filename("../.."), None);
        assert_eq!(secure_filename(""), None);
    }

    #[test]
    fn test_store_and_load_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("up"), dir.path().join("res"));
        assert_eq!(ws.store_upload("b file.py", b"y = 2").unwrap(), "b_file.py");
        assert_eq!(ws.store_upload("a.py", b"x = 1").unwrap(), "a.py");

        let loaded = ws.load_upload_dir();
        let ids: Vec<&str> = loaded.files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a.py", "b_file.py"]);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_invalid_upload_name() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("up"), dir.path().join("res"));
        assert!(matches!(
            ws.store_upload("..", b"x"),
            Err(PairsimError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_skips_binary_and_oversized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.py"), "x = 1").unwrap();
        std::fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(dir.path().join("big.py"), "#".repeat(64)).unwrap();
        std::fs::write(dir.path().join(".secret"), "x = 1").unwrap();

        let ws = Workspace::new(dir.path(), dir.path().join("res")).with_max_file_bytes(32);
        let loaded = ws.load_sources(&[dir.path().to_path_buf()]);

        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.files[0].id, "ok.py");
        let reasons: Vec<&SkipReason> = loaded.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(
            reasons,
            vec![&SkipReason::TooLarge { bytes: 64, limit: 32 }, &SkipReason::NotUtf8]
        );
    }

    #[test]
    fn test_plain_file_keeps_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.py");
        std::fs::write(&path, "x = 1").unwrap();
        let loaded = Workspace::new(dir.path(), dir.path()).load_sources(&[path.clone()]);
        assert_eq!(loaded.files[0].id, path.display().to_string());
    }
}
