use crate::contact::Contact;
use crate::host::{CharacterHost, FileSelector, Prompt};
use crate::settings::Settings;
use crate::statics;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    LinkedByPath,
    LinkedByObject,
}

impl LinkState {
    pub fn of(contact: &Contact) -> Self {
        if contact.linked_character().is_some() {
            LinkState::LinkedByObject
        } else if !contact.file_name().is_empty() {
            LinkState::LinkedByPath
        } else {
            LinkState::Unlinked
        }
    }

    pub fn is_linked(self) -> bool {
        self != LinkState::Unlinked
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    /// Neither the absolute nor the relative path exists. Carries the
    /// absolute path as it was recorded on the contact.
    #[error("the file {} could not be found", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("could not open {}: {message}", .path.display())]
    Open { path: PathBuf, message: String },
}

/// What `LinkResolver::open` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// The linked character was already open and got focus.
    SwitchedTo,
    /// The linked character had been closed and was reloaded from its file.
    Reloaded(PathBuf),
    /// The host was asked to open a file found on disk.
    File(PathBuf),
}

/// Manages the link between a contact and an external character file.
///
/// Links are stored twice: as an absolute path, and relative to the
/// application root so a moved install can still find its data.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    application_root: PathBuf,
}

impl LinkResolver {
    pub fn new(application_root: impl Into<PathBuf>) -> Self {
        Self {
            application_root: application_root.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.application_root.clone())
    }

    pub fn application_root(&self) -> &Path {
        &self.application_root
    }

    pub fn link_state(&self, contact: &Contact) -> LinkState {
        LinkState::of(contact)
    }

    /// Portable counterpart of `target`, or an empty string when `target`
    /// shares no filesystem root with the application.
    pub fn relative_link(&self, target: &Path) -> String {
        relative_link(&self.application_root, target).unwrap_or_default()
    }

    pub fn resolve_relative(&self, relative: &str) -> PathBuf {
        normalize(&self.application_root.join(relative))
    }

    /// Ask for a file and link it. Returns false when the user cancelled.
    pub fn attach(&self, contact: &mut Contact, selector: &mut dyn FileSelector) -> bool {
        let current = Some(Path::new(contact.file_name()))
            .filter(|p| !p.as_os_str().is_empty() && p.is_file());
        let Some(chosen) = selector.select_character_file(current) else {
            debug!("attach cancelled");
            return false;
        };
        self.attach_path(contact, &chosen);
        true
    }

    /// Link `path` without asking. Relative input is taken against the
    /// application root.
    pub fn attach_path(&self, contact: &mut Contact, path: &Path) {
        let absolute = if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.application_root.join(path))
        };
        let relative = self.relative_link(&absolute);
        info!(file = ?absolute, %relative, "attached character file");
        contact.set_file_names(absolute.to_string_lossy().into_owned(), relative);
        contact.clear_linked_character();
    }

    /// The file `open` would act on. The absolute path wins over the relative
    /// one whenever it exists.
    pub fn resolve(&self, contact: &Contact) -> Result<PathBuf, LinkError> {
        let recorded = contact.file_name();
        let absolute = Path::new(recorded);
        if !recorded.is_empty() && absolute.is_file() {
            return Ok(absolute.to_path_buf());
        }

        let relative = contact.relative_file_name();
        if !relative.is_empty() {
            let resolved = self.resolve_relative(relative);
            if resolved.is_file() {
                debug!(file = ?resolved, "absolute link missing; using relative link");
                return Ok(resolved);
            }
        }

        warn!(file = %recorded, "linked file not found");
        Err(LinkError::FileNotFound {
            path: PathBuf::from(recorded),
        })
    }

    pub fn open(
        &self,
        contact: &Contact,
        host: &mut dyn CharacterHost,
    ) -> Result<Opened, LinkError> {
        if let Some(link) = contact.linked_character() {
            if let Some(character) = link.upgrade() {
                if host.switch_to_open_character(&character) {
                    return Ok(Opened::SwitchedTo);
                }
            }
            let path = link.file_name().to_path_buf();
            let character = host.load_character(&path).map_err(|e| LinkError::Open {
                path: path.clone(),
                message: format!("{e:#}"),
            })?;
            host.open_character(character);
            return Ok(Opened::Reloaded(path));
        }

        let path = self.resolve(contact)?;
        host.open_file(&path).map_err(|e| LinkError::Open {
            path: path.clone(),
            message: format!("{e:#}"),
        })?;
        Ok(Opened::File(path))
    }

    /// Remove the file link after the user confirms. A live linked character
    /// is left alone. Returns true when something was cleared.
    pub fn detach(&self, contact: &mut Contact, prompt: &mut dyn Prompt) -> bool {
        if !prompt.confirm(
            statics::EN_TITLE_REMOVE_ASSOCIATION,
            statics::EN_MSG_REMOVE_ASSOCIATION,
        ) {
            debug!("detach declined");
            return false;
        }
        self.clear(contact)
    }

    pub fn clear(&self, contact: &mut Contact) -> bool {
        if contact.file_name().is_empty() && contact.relative_file_name().is_empty() {
            return false;
        }
        info!(file = %contact.file_name(), "removed character file link");
        contact.set_file_names(String::new(), String::new());
        true
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Path from the application root to `target`, written with `/` and one
/// leading `../`.
///
/// The root is treated the way a URI base treats its last segment: as a file.
/// The segment after the prefix is therefore relative to the root's parent,
/// and `root.join(result)` lands back on `target`.
pub fn relative_link(application_root: &Path, target: &Path) -> Option<String> {
    let root = normalize(application_root);
    let target = normalize(target);
    if !root.has_root() || !target.has_root() {
        return None;
    }
    let base = root.parent().unwrap_or(&root);

    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    match (base_parts.first(), target_parts.first()) {
        (Some(a), Some(b)) if same_component(a, b) => {}
        _ => return None,
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| same_component(a, b))
        .count();

    let mut segments: Vec<String> = Vec::new();
    segments.extend(std::iter::repeat_n("..".to_string(), base_parts.len() - common));
    segments.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    Some(format!(
        "{}{}",
        statics::RELATIVE_LINK_PREFIX,
        segments.join("/")
    ))
}

/// Drive prefixes compare without regard to case (`c:` and `C:` are the same
/// drive); everything else compares exactly.
fn same_component(a: &Component<'_>, b: &Component<'_>) -> bool {
    match (a, b) {
        (Component::Prefix(a), Component::Prefix(b)) => a
            .as_os_str()
            .to_string_lossy()
            .eq_ignore_ascii_case(&b.as_os_str().to_string_lossy()),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkState, normalize, relative_link};
    use crate::contact::{Contact, ContactType};
    use crate::host::Character;
    use std::{
        path::{Path, PathBuf},
        rc::Rc,
    };

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(
            normalize(Path::new("/proj/app/../data/./jane.chum5")),
            PathBuf::from("/proj/data/jane.chum5")
        );
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_link_is_relative_to_roots_parent() {
        let root = Path::new("/proj/app");
        assert_eq!(
            relative_link(root, Path::new("/proj/data/jane.chum5")).as_deref(),
            Some("../data/jane.chum5")
        );
        assert_eq!(
            relative_link(root, Path::new("/proj/app/saves/bob.chum5")).as_deref(),
            Some("../app/saves/bob.chum5")
        );
        assert_eq!(
            relative_link(root, Path::new("/elsewhere/x.chum5")).as_deref(),
            Some("../../elsewhere/x.chum5")
        );
        assert_eq!(relative_link(Path::new("app"), Path::new("/x")), None);
    }

    #[cfg(unix)]
    #[test]
    fn relative_link_round_trips() {
        let root = Path::new("/proj/app");
        for target in [
            "/proj/data/jane.chum5",
            "/proj/app/saves/bob.chum5",
            "/proj/jane.chum5",
            "/other/tree/deep/z.chum5",
        ] {
            let relative = relative_link(root, Path::new(target)).expect("shared root");
            assert!(relative.starts_with("../"));
            assert_eq!(normalize(&root.join(&relative)), PathBuf::from(target));
        }
    }

    #[cfg(windows)]
    #[test]
    fn drive_letters_match_regardless_of_case() {
        assert_eq!(
            relative_link(Path::new(r"c:\proj\app"), Path::new(r"C:\proj\data\jane.chum5"))
                .as_deref(),
            Some("../data/jane.chum5")
        );
        assert_eq!(
            relative_link(Path::new(r"C:\proj\app"), Path::new(r"D:\data\jane.chum5")),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn directory_names_stay_case_sensitive() {
        assert_eq!(
            relative_link(Path::new("/proj/app"), Path::new("/Proj/data/jane.chum5")).as_deref(),
            Some("../../Proj/data/jane.chum5")
        );
    }

    #[test]
    fn link_state_prefers_live_character() {
        let mut contact = Contact::new(ContactType::Contact);
        assert_eq!(LinkState::of(&contact), LinkState::Unlinked);

        contact.set_file_names("/proj/data/a.chum5".into(), "../data/a.chum5".into());
        assert_eq!(LinkState::of(&contact), LinkState::LinkedByPath);

        let character = Rc::new(Character::new(PathBuf::from("/proj/data/b.chum5"), "b"));
        contact.set_linked_character(&character);
        assert_eq!(LinkState::of(&contact), LinkState::LinkedByObject);

        contact.set_file_names(String::new(), String::new());
        assert_eq!(LinkState::of(&contact), LinkState::LinkedByObject);
        assert!(LinkState::of(&contact).is_linked());
    }
}
