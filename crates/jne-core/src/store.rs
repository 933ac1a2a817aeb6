// Stores the edit session publishes into.
// Writes are always whole-document replacements.
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use crate::error::EditError;

/// Canonical source of truth for the whole document text.
pub trait DocumentStore {
    fn text(&self) -> Result<String, EditError>;
    fn set_text(&mut self, text: &str) -> Result<(), EditError>;
}

/// Secondary view kept in step with committed text.
pub trait MirrorStore {
    fn set_text(&mut self, text: &str, opts: SyncOptions) -> Result<(), EditError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// The mirror must not feed this write back into the document store.
    pub suppress_downstream_sync: bool,
    /// Whether the mirror should consider its contents unsaved.
    pub has_changes: bool,
}

impl SyncOptions {
    /// Options for echoing a commit: already saved, no feedback.
    pub fn committed() -> Self {
        Self {
            suppress_downstream_sync: true,
            has_changes: false,
        }
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &mut T {
    fn text(&self) -> Result<String, EditError> {
        (**self).text()
    }
    fn set_text(&mut self, text: &str) -> Result<(), EditError> {
        (**self).set_text(text)
    }
}

impl<T: MirrorStore + ?Sized> MirrorStore for &mut T {
    fn set_text(&mut self, text: &str, opts: SyncOptions) -> Result<(), EditError> {
        (**self).set_text(text, opts)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    text: String,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentStore for MemoryStore {
    fn text(&self) -> Result<String, EditError> {
        Ok(self.text.clone())
    }
    fn set_text(&mut self, text: &str) -> Result<(), EditError> {
        self.text = text.to_string();
        Ok(())
    }
}

/// Records what it was sent; stands in for an editor pane.
#[derive(Debug, Clone, Default)]
pub struct MemoryMirror {
    pub text: Option<String>,
    pub last_opts: Option<SyncOptions>,
    pub writes: usize,
}

impl MirrorStore for MemoryMirror {
    fn set_text(&mut self, text: &str, opts: SyncOptions) -> Result<(), EditError> {
        self.text = Some(text.to_string());
        self.last_opts = Some(opts);
        self.writes += 1;
        Ok(())
    }
}

/// Document text kept in a file.
///
/// Each write lands in a temporary file next to the target and is renamed over
/// it, so readers see either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    backup_on_save: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_on_save: false,
        }
    }

    pub fn with_backup(mut self, backup_on_save: bool) -> Self {
        self.backup_on_save = backup_on_save;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    // `<file>.<YYYYmmdd-HHMMSS>.bak` beside the original
    fn backup(&self) -> Result<Option<PathBuf>, EditError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let name = self.path.file_name().and_then(|s| s.to_str()).unwrap_or("document");
        let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let dest = self.path.with_file_name(format!("{}.{}.bak", name, ts));
        fs::copy(&self.path, &dest)?;
        tracing::debug!("backed up {} to {}", self.path.display(), dest.display());
        Ok(Some(dest))
    }

    fn replace(&self, text: &str) -> Result<(), EditError> {
        if self.backup_on_save {
            self.backup()?;
        }
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::debug!("wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn text(&self) -> Result<String, EditError> {
        Ok(fs::read_to_string(&self.path)?)
    }
    fn set_text(&mut self, text: &str) -> Result<(), EditError> {
        self.replace(text)
    }
}

impl MirrorStore for FileStore {
    // A file has no change pipeline to suppress.
    fn set_text(&mut self, text: &str, _opts: SyncOptions) -> Result<(), EditError> {
        self.replace(text)
    }
}
