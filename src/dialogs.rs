use crate::host::{FileSelector, Prompt};
use crate::statics;
use std::path::{Path, PathBuf};

/// Native file and message dialogs.
#[derive(Debug, Clone)]
pub struct NativeDialogs {
    character_extension: String,
}

impl NativeDialogs {
    pub fn new(character_extension: impl Into<String>) -> Self {
        Self {
            character_extension: character_extension.into(),
        }
    }
}

/// Label of the character file filter, naming the configured extension.
pub fn character_filter_label(extension: &str) -> String {
    statics::EN_FILTER_CHARACTER_FILES.replace("{0}", extension)
}

impl Default for NativeDialogs {
    fn default() -> Self {
        Self::new(statics::CHARACTER_EXTENSION)
    }
}

impl FileSelector for NativeDialogs {
    fn select_character_file(&mut self, current: Option<&Path>) -> Option<PathBuf> {
        let mut dlg = rfd::FileDialog::new()
            .add_filter(
                character_filter_label(&self.character_extension),
                &[self.character_extension.as_str()],
            )
            .add_filter(statics::EN_FILTER_ALL_FILES, &["*"]);

        if let Some(current) = current {
            if let Some(dir) = current.parent() {
                dlg = dlg.set_directory(dir);
            }
            if let Some(file_name) = current.file_name() {
                dlg = dlg.set_file_name(file_name.to_string_lossy());
            }
        }

        dlg.pick_file()
    }
}

impl Prompt for NativeDialogs {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    fn show_error(&mut self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[cfg(test)]
mod tests {
    use super::character_filter_label;

    #[test]
    fn filter_label_follows_the_configured_extension() {
        assert_eq!(character_filter_label("chum5"), "Character Files (*.chum5)");
        assert_eq!(character_filter_label("chum6"), "Character Files (*.chum6)");
    }
}
