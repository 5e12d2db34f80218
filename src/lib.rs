//! Editor panel core for the contacts attached to a character sheet.
//! Keeps a contact in sync with its edit surface, reports field changes to the
//! owning document, resolves links to external character files, and builds the
//! taxonomy-backed option lists.

mod contact;
mod dialogs;
mod gui;
mod host;
mod link;
mod notifier;
mod panel;
mod settings;
pub mod statics;
mod taxonomy;

pub use contact::{Colour, Contact, ContactField, ContactType, LinkedCharacter, load_contacts};
pub use dialogs::NativeDialogs;
pub use gui::run_gui;
pub use host::{Character, CharacterHost, CharacterRegistry, FileSelector, NotesEditor, Prompt};
pub use link::{LinkError, LinkResolver, LinkState, Opened, normalize, relative_link};
pub use notifier::{ChangeListener, ChangeNotifier};
pub use panel::{ContactPanel, FieldEdit, FieldState, LinkAction, word_wrap};
pub use settings::Settings;
pub use taxonomy::{
    Category, ContactOptions, ListItem, MetatypeEntry, OptionList, Taxonomy, TaxonomyEntry,
    TaxonomySource, TaxonomyStore, compare_items, flatten_metatypes,
};
