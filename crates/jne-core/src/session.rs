//! View/edit/commit state for the node at the current selection.
//!
//! The session never caches the document: every read goes to the
//! [`DocumentStore`], so a view always reflects the last committed text.

use serde_json::Value;

use crate::document::{Document, EditOpts};
use crate::edit::{assign, resolve_with};
use crate::error::EditError;
use crate::path::Path;
use crate::store::{DocumentStore, MirrorStore, SyncOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read-only view of the selected node
    Viewing,
    /// A draft is open for the selected node
    Editing,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Viewing => "VIEWING",
            Mode::Editing => "EDITING",
        }
    }
}

pub struct EditSession<S, M> {
    store: S,
    mirror: M,
    opts: EditOpts,
    /// `None` addresses the document root.
    selection: Option<Path>,
    mode: Mode,
    draft: String,
    error: Option<String>,
}

impl<S: DocumentStore, M: MirrorStore> EditSession<S, M> {
    /// Start in `Viewing` with no selection, i.e. looking at the whole document.
    pub fn new(store: S, mirror: M, opts: EditOpts) -> Self {
        let mut session = Self {
            store,
            mirror,
            opts,
            selection: None,
            mode: Mode::Viewing,
            draft: String::new(),
            error: None,
        };
        session.draft = session.resolved();
        session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> Option<&Path> {
        self.selection.as_ref()
    }

    pub fn opts(&self) -> &EditOpts {
        &self.opts
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    pub fn into_stores(self) -> (S, M) {
        (self.store, self.mirror)
    }

    /// `$[...]` label of the selected node.
    pub fn path_label(&self) -> String {
        match &self.selection {
            Some(p) => p.to_string(),
            None => Path::root().to_string(),
        }
    }

    /// The selected node as currently committed, independent of any draft.
    pub fn view_text(&self) -> String {
        self.resolved()
    }

    /// Switch to another node. Any open draft is dropped without prompting.
    pub fn select(&mut self, selection: Option<Path>) {
        if self.mode == Mode::Editing {
            tracing::debug!("selection changed while editing {}; draft discarded", self.path_label());
        }
        self.selection = selection;
        self.mode = Mode::Viewing;
        self.draft = self.resolved();
        self.error = None;
        tracing::debug!("selected {}", self.path_label());
    }

    pub fn begin_edit(&mut self) {
        if self.mode == Mode::Editing {
            return;
        }
        self.draft = self.resolved();
        self.mode = Mode::Editing;
        tracing::debug!("editing {}", self.path_label());
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        if self.mode != Mode::Editing {
            return Err(EditError::NotEditing);
        }
        self.draft = text.into();
        Ok(())
    }

    /// Commit the draft into the selected node.
    ///
    /// On failure the session stays in `Editing` with the draft untouched and
    /// `error()` describing the problem; neither store is written.
    pub fn save(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Editing {
            return Err(EditError::NotEditing);
        }
        match self.commit() {
            Ok(()) => {
                self.mode = Mode::Viewing;
                self.error = None;
                self.draft = self.resolved();
                tracing::debug!("saved {}", self.path_label());
                Ok(())
            }
            Err(e) => {
                tracing::debug!("save of {} rejected: {}", self.path_label(), e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the draft and show the committed node again.
    pub fn cancel(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Editing {
            return Err(EditError::NotEditing);
        }
        self.mode = Mode::Viewing;
        self.draft = self.resolved();
        self.error = None;
        tracing::debug!("cancelled edit of {}", self.path_label());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EditError> {
        let new_value: Value = serde_json::from_str(&self.draft)?;
        let current = Document::parse(&self.store.text()?)?;
        let root = Path::root();
        let path = self.selection.as_ref().unwrap_or(&root);
        let updated = assign(current.value(), path, new_value)?;
        let committed = Document::from_value(updated, &self.opts);

        self.store.set_text(committed.text())?;
        // Mirror failures do not undo the canonical write.
        if let Err(e) = self.mirror.set_text(committed.text(), SyncOptions::committed()) {
            tracing::warn!("mirror update failed: {}", e);
        }
        Ok(())
    }

    fn resolved(&self) -> String {
        let root = Path::root();
        let path = self.selection.as_ref().unwrap_or(&root);
        match self.store.text() {
            Ok(text) => resolve_with(&text, path, &self.opts),
            Err(e) => {
                tracing::warn!("document store unreadable, showing null: {}", e);
                "null".to_string()
            }
        }
    }
}
