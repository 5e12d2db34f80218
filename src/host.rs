//! Interfaces to the environment around a contact panel: dialogs, the notes
//! editor and the registry of open characters.

use anyhow::{Context, bail};
use indexmap::IndexMap;
use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, info};

/// A full character record, as far as a contact link needs to know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub file_name: PathBuf,
    pub name: String,
}

impl Character {
    pub fn new(file_name: PathBuf, name: impl Into<String>) -> Self {
        Self {
            file_name,
            name: name.into(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let meta = fs::metadata(path).with_context(|| format!("reading {path:?}"))?;
        if !meta.is_file() {
            bail!("{path:?} is not a file");
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(path.to_path_buf(), name))
    }
}

/// Asks the user to pick a character file. `None` means the user cancelled.
pub trait FileSelector {
    /// `current` is the already-linked file, if it still exists, so the
    /// dialog can start next to it.
    fn select_character_file(&mut self, current: Option<&Path>) -> Option<PathBuf>;
}

/// Modal yes/no questions and blocking error messages.
pub trait Prompt {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    fn show_error(&mut self, title: &str, message: &str);
}

/// Edits free-form notes. `None` means the edit was cancelled.
pub trait NotesEditor {
    fn edit_notes(&mut self, notes: &str) -> Option<String>;
}

/// The application that owns open characters.
pub trait CharacterHost {
    /// Focus `character` if it is open. Returns false when it is not.
    fn switch_to_open_character(&mut self, character: &Rc<Character>) -> bool;
    fn load_character(&mut self, path: &Path) -> anyhow::Result<Rc<Character>>;
    /// Register a freshly loaded character as open and focus it.
    fn open_character(&mut self, character: Rc<Character>);
    /// Bring up an editor for a file on disk. What that means is up to the host.
    fn open_file(&mut self, path: &Path) -> anyhow::Result<()>;
}

/// In-memory registry of open characters, keyed by file.
///
/// Owns the characters; contacts only hold weak references into it.
#[derive(Debug, Default)]
pub struct CharacterRegistry {
    open: IndexMap<PathBuf, Rc<Character>>,
    active: Option<PathBuf>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn characters(&self) -> impl Iterator<Item = &Rc<Character>> {
        self.open.values()
    }

    pub fn get(&self, path: &Path) -> Option<&Rc<Character>> {
        self.open.get(path)
    }

    pub fn active(&self) -> Option<&Rc<Character>> {
        self.active.as_ref().and_then(|p| self.open.get(p))
    }

    pub fn is_open(&self, character: &Rc<Character>) -> bool {
        self.open.values().any(|c| Rc::ptr_eq(c, character))
    }

    /// Close a character. Any contact still linked to it keeps its path.
    pub fn close(&mut self, path: &Path) -> Option<Rc<Character>> {
        let closed = self.open.shift_remove(path);
        if self.active.as_deref() == Some(path) {
            self.active = self.open.keys().last().cloned();
        }
        closed
    }
}

impl CharacterHost for CharacterRegistry {
    fn switch_to_open_character(&mut self, character: &Rc<Character>) -> bool {
        if !self.is_open(character) {
            return false;
        }
        debug!(file = ?character.file_name, "switching to open character");
        self.active = Some(character.file_name.clone());
        true
    }

    fn load_character(&mut self, path: &Path) -> anyhow::Result<Rc<Character>> {
        Ok(Rc::new(Character::load(path)?))
    }

    fn open_character(&mut self, character: Rc<Character>) {
        info!(file = ?character.file_name, "opened character");
        self.active = Some(character.file_name.clone());
        self.open.insert(character.file_name.clone(), character);
    }

    fn open_file(&mut self, path: &Path) -> anyhow::Result<()> {
        if let Some(existing) = self.open.get(path).cloned() {
            self.switch_to_open_character(&existing);
            return Ok(());
        }
        let character = self.load_character(path)?;
        self.open_character(character);
        Ok(())
    }
}
