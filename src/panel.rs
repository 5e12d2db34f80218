use crate::contact::{Contact, ContactField, ContactType};
use crate::host::{Character, CharacterHost, FileSelector, NotesEditor, Prompt};
use crate::link::{LinkError, LinkResolver, LinkState, Opened};
use crate::notifier::{ChangeListener, ChangeNotifier};
use crate::statics;
use crate::taxonomy::{Category, ContactOptions, TaxonomySource};
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::debug;

/// One user edit on the panel, expressed as an explicit setter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Name, location or a taxonomy-backed field. Taxonomy values are canonical.
    Text(ContactField, String),
    Connection(i32),
    Loyalty(i32),
    Free(bool),
    Group(bool),
    Family(bool),
    Blackmail(bool),
}

impl FieldEdit {
    pub fn field(&self) -> ContactField {
        match self {
            FieldEdit::Text(field, _) => *field,
            FieldEdit::Connection(_) => ContactField::Connection,
            FieldEdit::Loyalty(_) => ContactField::Loyalty,
            FieldEdit::Free(_) => ContactField::Free,
            FieldEdit::Group(_) => ContactField::Group,
            FieldEdit::Family(_) => ContactField::Family,
            FieldEdit::Blackmail(_) => ContactField::Blackmail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub visible: bool,
    pub enabled: bool,
}

impl FieldState {
    const EDITABLE: FieldState = FieldState {
        visible: true,
        enabled: true,
    };

    fn enabled_if(enabled: bool) -> Self {
        Self {
            visible: true,
            enabled,
        }
    }

    pub fn editable(self) -> bool {
        self.visible && self.enabled
    }
}

/// Entries of the link context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Attach,
    Open,
    Remove,
}

/// Editor panel state for one contact.
///
/// The contact itself is owned elsewhere and passed to each call. Nothing is
/// reported to the listener until `finish_loading` has run.
#[derive(Debug)]
pub struct ContactPanel {
    options: ContactOptions,
    selected: IndexMap<Category, usize>,
    notifier: ChangeNotifier,
    resolver: LinkResolver,
    expanded: bool,
}

impl ContactPanel {
    pub fn new(resolver: LinkResolver, listener: impl ChangeListener + 'static) -> Self {
        Self {
            options: ContactOptions::default(),
            selected: IndexMap::new(),
            notifier: ChangeNotifier::with_listener(listener),
            resolver,
            expanded: false,
        }
    }

    /// Build the option lists, bind the contact, then start reporting changes.
    pub fn load(
        contact: &Contact,
        taxonomy: &dyn TaxonomySource,
        resolver: LinkResolver,
        listener: impl ChangeListener + 'static,
    ) -> Self {
        let mut panel = Self::new(resolver, listener);
        panel.populate(contact, taxonomy);
        panel.finish_loading();
        panel
    }

    pub fn populate(&mut self, contact: &Contact, taxonomy: &dyn TaxonomySource) {
        self.options = ContactOptions::build(taxonomy);
        self.selected.clear();
        for category in Category::ALL {
            let value = contact.text(category.field());
            if let Some(list) = self.options.get_mut(category) {
                let idx = list.select_or_insert(value);
                self.selected.insert(category, idx);
            }
        }
    }

    pub fn finish_loading(&mut self) {
        self.notifier.arm();
    }

    pub fn is_loading(&self) -> bool {
        !self.notifier.is_armed()
    }

    pub fn options(&self) -> &ContactOptions {
        &self.options
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    pub fn selected_index(&self, category: Category) -> Option<usize> {
        self.selected.get(&category).copied()
    }

    /// Display text for a field, translated through its option list when it
    /// has one.
    pub fn display_value<'a>(&'a self, contact: &'a Contact, field: ContactField) -> &'a str {
        let value = contact.text(field);
        match self.options.for_field(field) {
            Some(list) => list.display_for(value),
            None => value,
        }
    }

    pub fn field_state(&self, contact: &Contact, field: ContactField) -> FieldState {
        let read_only = contact.read_only();
        match field {
            ContactField::Free => FieldState {
                visible: !read_only,
                enabled: !read_only,
            },
            ContactField::Group => FieldState::enabled_if(!read_only && contact.not_made_man()),
            ContactField::Connection => FieldState::enabled_if(!read_only),
            ContactField::Loyalty => {
                FieldState::enabled_if(!read_only && contact.loyalty_enabled())
            }
            ContactField::Family | ContactField::Blackmail => FieldState {
                visible: contact.is_not_enemy(),
                enabled: contact.is_not_enemy(),
            },
            // Owned by the linked character while one is attached.
            ContactField::Name | ContactField::Metatype | ContactField::Sex | ContactField::Age => {
                FieldState::enabled_if(contact.no_linked_character())
            }
            _ => FieldState::EDITABLE,
        }
    }

    pub fn delete_visible(&self, contact: &Contact) -> bool {
        !contact.read_only()
    }

    /// Apply one edit. Returns the changed field, or `None` when the field is
    /// not editable right now or already held that value.
    pub fn apply_edit(&mut self, contact: &mut Contact, edit: FieldEdit) -> Option<ContactField> {
        let field = edit.field();
        if !self.field_state(contact, field).editable() {
            debug!(%field, "edit refused");
            return None;
        }

        let changed = match edit {
            FieldEdit::Text(field, value) => {
                if !field.is_text() {
                    return None;
                }
                if let Some(category) = Category::for_field(field) {
                    if let Some(list) = self.options.get_mut(category) {
                        let idx = list.select_or_insert(&value);
                        self.selected.insert(category, idx);
                    }
                }
                contact.set_text(field, &value)
            }
            FieldEdit::Connection(value) => contact.set_connection(value),
            FieldEdit::Loyalty(value) => contact.set_loyalty(value),
            FieldEdit::Free(value) => contact.set_free(value),
            FieldEdit::Group(value) => contact.set_is_group(value),
            FieldEdit::Family(value) => contact.set_family(value),
            FieldEdit::Blackmail(value) => contact.set_blackmail(value),
        };

        if !changed {
            return None;
        }
        self.notifier.notify(field);
        Some(field)
    }

    /// Pick entry `index` of a category's option list.
    pub fn select_option(
        &mut self,
        contact: &mut Contact,
        category: Category,
        index: usize,
    ) -> Option<ContactField> {
        let value = self
            .options
            .get(category)?
            .items()
            .get(index)?
            .value
            .clone();
        self.apply_edit(contact, FieldEdit::Text(category.field(), value))
    }

    pub fn link_state(&self, contact: &Contact) -> LinkState {
        self.resolver.link_state(contact)
    }

    /// Menu entries to offer for the current link state.
    pub fn link_actions(&self, contact: &Contact) -> &'static [LinkAction] {
        if self.link_state(contact).is_linked() {
            &[LinkAction::Open, LinkAction::Remove]
        } else {
            &[LinkAction::Attach]
        }
    }

    pub fn attach_character(
        &mut self,
        contact: &mut Contact,
        selector: &mut dyn FileSelector,
    ) -> bool {
        if !self.resolver.attach(contact, selector) {
            return false;
        }
        self.notifier.notify(ContactField::File);
        true
    }

    /// Open the linked character. Failures are shown through `prompt` and
    /// returned; the contact is never modified.
    pub fn open_linked(
        &mut self,
        contact: &Contact,
        host: &mut dyn CharacterHost,
        prompt: &mut dyn Prompt,
    ) -> Result<Opened, LinkError> {
        self.resolver.open(contact, host).inspect_err(|err| match err {
            LinkError::FileNotFound { path } => prompt.show_error(
                statics::EN_TITLE_FILE_NOT_FOUND,
                &statics::EN_MSG_FILE_NOT_FOUND.replace("{0}", &path.display().to_string()),
            ),
            LinkError::Open { .. } => {
                prompt.show_error(statics::EN_TITLE_OPEN_FAILED, &err.to_string())
            }
        })
    }

    pub fn remove_character(&mut self, contact: &mut Contact, prompt: &mut dyn Prompt) -> bool {
        if !self.resolver.detach(contact, prompt) {
            return false;
        }
        self.notifier.notify(ContactField::File);
        true
    }

    /// Point the contact at a character that is already open.
    pub fn link_open_character(
        &mut self,
        contact: &mut Contact,
        character: &Rc<Character>,
    ) -> bool {
        if contact
            .linked_character()
            .is_some_and(|link| link.is(character))
        {
            return false;
        }
        contact.set_linked_character(character);
        self.notifier.notify(ContactField::File);
        true
    }

    /// Drop the live character link. The file paths are left to
    /// `remove_character`.
    pub fn unlink_open_character(&mut self, contact: &mut Contact) -> bool {
        if !contact.clear_linked_character() {
            return false;
        }
        self.notifier.notify(ContactField::File);
        true
    }

    pub fn edit_notes(&mut self, contact: &mut Contact, editor: &mut dyn NotesEditor) -> bool {
        let Some(notes) = editor.edit_notes(contact.notes()) else {
            return false;
        };
        if !contact.set_text(ContactField::Notes, &notes) {
            return false;
        }
        self.notifier.notify(ContactField::Notes);
        true
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn link_tooltip(&self, contact: &Contact) -> &'static str {
        let linked = self.link_state(contact).is_linked();
        match (contact.entity_type(), linked) {
            (ContactType::Enemy, true) => statics::EN_TIP_ENEMY_OPEN_LINKED,
            (ContactType::Enemy, false) => statics::EN_TIP_ENEMY_LINK,
            (ContactType::Contact, true) => statics::EN_TIP_CONTACT_OPEN_LINKED,
            (ContactType::Contact, false) => statics::EN_TIP_CONTACT_LINK,
        }
    }

    pub fn notes_tooltip(&self, contact: &Contact) -> String {
        let mut tip = match contact.entity_type() {
            ContactType::Enemy => statics::EN_TIP_ENEMY_EDIT_NOTES,
            ContactType::Contact => statics::EN_TIP_CONTACT_EDIT_NOTES,
        }
        .to_string();
        if !contact.notes().is_empty() {
            tip.push_str("\n\n");
            tip.push_str(contact.notes());
        }
        word_wrap(&tip, statics::TOOLTIP_WRAP_WIDTH)
    }
}

/// Greedy word wrap. Existing line breaks are kept; words longer than `width`
/// get a line of their own.
pub fn word_wrap(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut col = 0usize;
        for word in line.split_whitespace() {
            let len = word.chars().count();
            if col > 0 && col + 1 + len > width {
                out.push('\n');
                col = 0;
            } else if col > 0 {
                out.push(' ');
                col += 1;
            }
            out.push_str(word);
            col += len;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::word_wrap;

    #[test]
    fn word_wrap_breaks_on_spaces_and_keeps_paragraphs() {
        assert_eq!(word_wrap("aa bb cc", 5), "aa bb\ncc");
        assert_eq!(word_wrap("tip\n\nnote text", 100), "tip\n\nnote text");
        assert_eq!(word_wrap("abcdefgh ij", 4), "abcdefgh\nij");
    }
}
