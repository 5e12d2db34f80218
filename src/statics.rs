// Central place for UI strings and other non-localized constants.
// Keep these out of panel.rs/gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Contact Editor";

pub const EN_FILTER_CHARACTER_FILES: &str = "Character Files (*.{0})";
pub const EN_FILTER_ALL_FILES: &str = "All Files (*.*)";

pub const EN_TIP_CONTACT_LINK: &str = "Link this Contact to a character file.";
pub const EN_TIP_CONTACT_OPEN_LINKED: &str = "Open the character file linked to this Contact.";
pub const EN_TIP_CONTACT_EDIT_NOTES: &str = "Edit the notes for this Contact.";
pub const EN_TIP_ENEMY_LINK: &str = "Link this Enemy to a character file.";
pub const EN_TIP_ENEMY_OPEN_LINKED: &str = "Open the character file linked to this Enemy.";
pub const EN_TIP_ENEMY_EDIT_NOTES: &str = "Edit the notes for this Enemy.";

pub const EN_TITLE_FILE_NOT_FOUND: &str = "File Not Found";
pub const EN_MSG_FILE_NOT_FOUND: &str = "The file {0} could not be found.";
pub const EN_TITLE_OPEN_FAILED: &str = "Could Not Open Character";
pub const EN_TITLE_REMOVE_ASSOCIATION: &str = "Remove Character Association";
pub const EN_MSG_REMOVE_ASSOCIATION: &str =
    "Are you sure you want to remove the association between this Contact and its character file?";

pub const EN_STATUS_LINKED: &str = "Linked {0}";
pub const EN_STATUS_SWITCHED: &str = "Switched to the open character";
pub const EN_STATUS_OPENED: &str = "Opened {0}";
pub const EN_STATUS_REMOVED: &str = "Removed character association";
pub const EN_STATUS_DELETED: &str = "Deleted {0}";

pub const EN_MENU_ATTACH: &str = "Attach Character...";
pub const EN_MENU_OPEN: &str = "Open Linked Character";
pub const EN_MENU_REMOVE: &str = "Remove Character Association";

pub const EN_LABEL_NAME: &str = "Name";
pub const EN_LABEL_LOCATION: &str = "Location";
pub const EN_LABEL_ROLE: &str = "Role";
pub const EN_LABEL_CONNECTION: &str = "Connection:";
pub const EN_LABEL_LOYALTY: &str = "Loyalty:";
pub const EN_LABEL_METATYPE: &str = "Metatype:";
pub const EN_LABEL_SEX: &str = "Sex:";
pub const EN_LABEL_AGE: &str = "Age:";
pub const EN_LABEL_PERSONAL_LIFE: &str = "Personal Life:";
pub const EN_LABEL_TYPE: &str = "Type:";
pub const EN_LABEL_PREFERRED_PAYMENT: &str = "Preferred Payment:";
pub const EN_LABEL_HOBBIES_VICE: &str = "Hobbies/Vice:";
pub const EN_CHECKBOX_GROUP: &str = "Group";
pub const EN_CHECKBOX_FREE: &str = "Free";
pub const EN_CHECKBOX_BLACKMAIL: &str = "Blackmail";
pub const EN_CHECKBOX_FAMILY: &str = "Family";

pub const EN_BTN_LINK: &str = "Link";
pub const EN_BTN_NOTES: &str = "Notes";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_EXPAND: &str = "+";
pub const EN_BTN_COLLAPSE: &str = "-";
pub const EN_BTN_OK: &str = "OK";
pub const EN_BTN_CANCEL: &str = "Cancel";

pub const EN_WINDOW_NOTES: &str = "Notes";
pub const EN_HEADING_CHANGES: &str = "Changes";
pub const EN_CHANGES_NONE: &str = "No changes.";

pub const EN_EMPTY: &str = "";

// Group marker shown in place of loyalty in the quick stats.
pub const EN_QUICK_GROUP: &str = "G";

// Linked character files.
pub const CHARACTER_EXTENSION: &str = "chum5";

// Relative links are written as if the application root were a file inside
// the directory they are relative to.
pub const RELATIVE_LINK_PREFIX: &str = "../";

// Notes tooltip wrap width, in characters.
pub const TOOLTIP_WRAP_WIDTH: usize = 100;

// Taxonomy documents, relative to the data directory.
pub const TAXONOMY_CONTACTS_FILE: &str = "contacts.json5";
pub const TAXONOMY_METATYPES_FILE: &str = "metatypes.json5";

pub const SETTINGS_FILE: &str = "settings.json5";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LANGUAGE: &str = "en-us";

// Contact bounds.
pub const CONNECTION_MINIMUM: i32 = 1;
pub const CONNECTION_MAXIMUM_DEFAULT: i32 = 12;
pub const LOYALTY_MINIMUM: i32 = 1;
pub const LOYALTY_MAXIMUM: i32 = 6;
