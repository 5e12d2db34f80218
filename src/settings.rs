use crate::statics;
use anyhow::Context;
use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Application-wide settings the contact panel depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base directory relative links are computed against.
    pub application_root: PathBuf,
    /// Directory holding the taxonomy documents.
    pub data_dir: PathBuf,
    pub character_extension: String,
    pub language: String,
}

// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSettings {
    application_root: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    character_extension: Option<String>,
    language: Option<String>,
}

impl Settings {
    pub fn with_root(application_root: impl Into<PathBuf>) -> Self {
        let application_root = application_root.into();
        Self {
            data_dir: application_root.join(statics::DEFAULT_DATA_DIR),
            application_root,
            character_extension: statics::CHARACTER_EXTENSION.to_string(),
            language: statics::DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// The directory of the running executable, falling back to the working
    /// directory.
    pub fn default_root() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default()
    }

    pub fn parse_json5(text: &str, default_root: &Path) -> anyhow::Result<Self> {
        let raw: RawSettings = json5::from_str(text).context("parsing settings")?;
        let application_root = match raw.application_root {
            Some(root) if root.is_relative() => default_root.join(root),
            Some(root) => root,
            None => default_root.to_path_buf(),
        };
        let mut settings = Self::with_root(application_root);
        if let Some(data_dir) = raw.data_dir {
            settings.data_dir = settings.application_root.join(data_dir);
        }
        if let Some(ext) = raw.character_extension {
            settings.character_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(language) = raw.language {
            settings.language = language;
        }
        Ok(settings)
    }

    /// Load `path`, or use defaults if it does not exist. A file that exists
    /// but does not parse is an error.
    pub fn load_or_default(path: &Path, default_root: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse_json5(&text, default_root)
                .with_context(|| format!("loading settings from {path:?}")),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::with_root(default_root)),
            Err(e) => Err(e).with_context(|| format!("reading {path:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::path::{Path, PathBuf};

    #[test]
    fn defaults_hang_off_the_root() {
        let settings = Settings::with_root("/opt/chummer");
        assert_eq!(settings.data_dir, PathBuf::from("/opt/chummer/data"));
        assert_eq!(settings.character_extension, "chum5");
    }

    #[test]
    fn relative_keys_resolve_against_the_root() {
        let settings = Settings::parse_json5(
            "{ applicationRoot: 'app', dataDir: 'taxonomy', characterExtension: '.chum', }",
            Path::new("/srv"),
        )
        .expect("parse");
        assert_eq!(settings.application_root, PathBuf::from("/srv/app"));
        assert_eq!(settings.data_dir, PathBuf::from("/srv/app/taxonomy"));
        assert_eq!(settings.character_extension, "chum");
        assert_eq!(settings.language, "en-us");
    }

    #[test]
    fn missing_file_means_defaults_but_bad_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json5");
        let settings = Settings::load_or_default(&path, dir.path()).expect("defaults");
        assert_eq!(settings.application_root, dir.path());

        std::fs::write(&path, "{ applicationRoot: ").expect("write");
        assert!(Settings::load_or_default(&path, dir.path()).is_err());
    }
}
