use crate::host::Character;
use crate::statics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    rc::{Rc, Weak},
};

/// Whether a Contact is a friendly contact or an enemy. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactType {
    #[default]
    Contact,
    Enemy,
}

/// Tags carried by change events so the parent knows which field moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Location,
    Role,
    Metatype,
    Sex,
    Age,
    PersonalLife,
    Type,
    PreferredPayment,
    HobbiesVice,
    Connection,
    Loyalty,
    Free,
    Group,
    Family,
    Blackmail,
    Notes,
    File,
}

impl ContactField {
    /// The eight fields whose values come from a taxonomy list.
    pub const TAXONOMY_BACKED: [ContactField; 8] = [
        ContactField::Role,
        ContactField::Metatype,
        ContactField::Sex,
        ContactField::Age,
        ContactField::PersonalLife,
        ContactField::Type,
        ContactField::PreferredPayment,
        ContactField::HobbiesVice,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ContactField::Name => "Name",
            ContactField::Location => "Location",
            ContactField::Role => "Role",
            ContactField::Metatype => "Metatype",
            ContactField::Sex => "Sex",
            ContactField::Age => "Age",
            ContactField::PersonalLife => "PersonalLife",
            ContactField::Type => "Type",
            ContactField::PreferredPayment => "PreferredPayment",
            ContactField::HobbiesVice => "HobbiesVice",
            ContactField::Connection => "Connection",
            ContactField::Loyalty => "Loyalty",
            ContactField::Free => "Free",
            ContactField::Group => "Group",
            ContactField::Family => "Family",
            ContactField::Blackmail => "Blackmail",
            ContactField::Notes => "Notes",
            ContactField::File => "File",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, ContactField::Name | ContactField::Location)
            || Self::TAXONOMY_BACKED.contains(&self)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Display accent for a contact row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const READ_ONLY: Colour = Colour {
        r: 160,
        g: 160,
        b: 160,
    };
    pub const ENEMY: Colour = Colour {
        r: 255,
        g: 210,
        b: 210,
    };
}

/// Back-reference to a character held open by the host.
///
/// The registry owns the character; a Contact only looks it up, so dropping a
/// Contact never keeps a character alive and closing a character never
/// invalidates a Contact.
#[derive(Debug, Clone)]
pub struct LinkedCharacter {
    handle: Weak<Character>,
    file_name: PathBuf,
}

impl LinkedCharacter {
    pub fn new(character: &Rc<Character>) -> Self {
        Self {
            handle: Rc::downgrade(character),
            file_name: character.file_name.clone(),
        }
    }

    /// The character, if the host still has it open.
    pub fn upgrade(&self) -> Option<Rc<Character>> {
        self.handle.upgrade()
    }

    /// File the character was loaded from; used to reload it once closed.
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn is(&self, character: &Rc<Character>) -> bool {
        Weak::ptr_eq(&self.handle, &Rc::downgrade(character))
    }
}

/// A person, enemy or organization associated with a player character.
///
/// Owned by the surrounding document. Taxonomy-backed fields hold canonical
/// (untranslated) values; display text is looked up through an `OptionList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    entity_type: ContactType,
    name: String,
    location: String,
    role: String,
    metatype: String,
    sex: String,
    age: String,
    personal_life: String,
    #[serde(rename = "type")]
    contact_type: String,
    preferred_payment: String,
    hobbies_vice: String,
    connection: i32,
    loyalty: i32,
    connection_maximum: i32,
    free: bool,
    family: bool,
    blackmail: bool,
    is_group: bool,
    made_man: bool,
    notes: String,
    file_name: String,
    relative_file_name: String,
    #[serde(skip)]
    linked_character: Option<LinkedCharacter>,
    colour: Option<Colour>,
    read_only: bool,
}

impl Default for Contact {
    fn default() -> Self {
        Self::new(ContactType::Contact)
    }
}

impl Contact {
    pub fn new(entity_type: ContactType) -> Self {
        Self {
            entity_type,
            name: String::new(),
            location: String::new(),
            role: String::new(),
            metatype: String::new(),
            sex: String::new(),
            age: String::new(),
            personal_life: String::new(),
            contact_type: String::new(),
            preferred_payment: String::new(),
            hobbies_vice: String::new(),
            connection: statics::CONNECTION_MINIMUM,
            loyalty: statics::LOYALTY_MINIMUM,
            connection_maximum: statics::CONNECTION_MAXIMUM_DEFAULT,
            free: false,
            family: false,
            blackmail: false,
            is_group: false,
            made_man: false,
            notes: String::new(),
            file_name: String::new(),
            relative_file_name: String::new(),
            linked_character: None,
            colour: None,
            read_only: false,
        }
    }

    pub fn entity_type(&self) -> ContactType {
        self.entity_type
    }

    pub fn is_not_enemy(&self) -> bool {
        self.entity_type != ContactType::Enemy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn metatype(&self) -> &str {
        &self.metatype
    }

    /// Current value of a text field. Non-text fields read as empty.
    pub fn text(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Location => &self.location,
            ContactField::Role => &self.role,
            ContactField::Metatype => &self.metatype,
            ContactField::Sex => &self.sex,
            ContactField::Age => &self.age,
            ContactField::PersonalLife => &self.personal_life,
            ContactField::Type => &self.contact_type,
            ContactField::PreferredPayment => &self.preferred_payment,
            ContactField::HobbiesVice => &self.hobbies_vice,
            ContactField::Notes => &self.notes,
            _ => statics::EN_EMPTY,
        }
    }

    fn text_mut(&mut self, field: ContactField) -> Option<&mut String> {
        match field {
            ContactField::Name => Some(&mut self.name),
            ContactField::Location => Some(&mut self.location),
            ContactField::Role => Some(&mut self.role),
            ContactField::Metatype => Some(&mut self.metatype),
            ContactField::Sex => Some(&mut self.sex),
            ContactField::Age => Some(&mut self.age),
            ContactField::PersonalLife => Some(&mut self.personal_life),
            ContactField::Type => Some(&mut self.contact_type),
            ContactField::PreferredPayment => Some(&mut self.preferred_payment),
            ContactField::HobbiesVice => Some(&mut self.hobbies_vice),
            ContactField::Notes => Some(&mut self.notes),
            _ => None,
        }
    }

    /// Set a text field. Returns true when the stored value changed.
    pub fn set_text(&mut self, field: ContactField, value: &str) -> bool {
        let Some(slot) = self.text_mut(field) else {
            return false;
        };
        if slot.as_str() == value {
            return false;
        }
        value.clone_into(slot);
        true
    }

    pub fn connection(&self) -> i32 {
        self.connection
    }

    /// Never below the connection minimum, whatever the loaded file says.
    pub fn connection_maximum(&self) -> i32 {
        self.connection_maximum.max(statics::CONNECTION_MINIMUM)
    }

    pub fn set_connection_maximum(&mut self, maximum: i32) {
        self.connection_maximum = maximum.max(statics::CONNECTION_MINIMUM);
        self.connection = self.connection.min(self.connection_maximum);
    }

    pub fn set_connection(&mut self, value: i32) -> bool {
        let value = value.clamp(statics::CONNECTION_MINIMUM, self.connection_maximum());
        if value == self.connection {
            return false;
        }
        self.connection = value;
        true
    }

    /// Groups and made men have a fixed loyalty of 1.
    pub fn loyalty(&self) -> i32 {
        if self.is_group_or_made_man() {
            statics::LOYALTY_MINIMUM
        } else {
            self.loyalty
        }
    }

    pub fn loyalty_enabled(&self) -> bool {
        !self.is_group_or_made_man()
    }

    pub fn set_loyalty(&mut self, value: i32) -> bool {
        let value = value.clamp(statics::LOYALTY_MINIMUM, statics::LOYALTY_MAXIMUM);
        if value == self.loyalty {
            return false;
        }
        self.loyalty = value;
        true
    }

    pub fn free(&self) -> bool {
        self.free
    }

    pub fn set_free(&mut self, value: bool) -> bool {
        replace_flag(&mut self.free, value)
    }

    /// Family only applies to friendly contacts; enemies always read false.
    pub fn family(&self) -> bool {
        self.is_not_enemy() && self.family
    }

    pub fn set_family(&mut self, value: bool) -> bool {
        self.is_not_enemy() && replace_flag(&mut self.family, value)
    }

    /// Blackmail only applies to friendly contacts; enemies always read false.
    pub fn blackmail(&self) -> bool {
        self.is_not_enemy() && self.blackmail
    }

    pub fn set_blackmail(&mut self, value: bool) -> bool {
        self.is_not_enemy() && replace_flag(&mut self.blackmail, value)
    }

    pub fn is_group_or_made_man(&self) -> bool {
        self.is_group || self.made_man
    }

    pub fn not_made_man(&self) -> bool {
        !self.made_man
    }

    pub fn set_is_group(&mut self, value: bool) -> bool {
        replace_flag(&mut self.is_group, value)
    }

    pub fn made_man(&self) -> bool {
        self.made_man
    }

    pub fn set_made_man(&mut self, value: bool) -> bool {
        replace_flag(&mut self.made_man, value)
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn relative_file_name(&self) -> &str {
        &self.relative_file_name
    }

    /// Record a linked file. Only the link resolver should call this, since it
    /// keeps the relative path derived from the absolute one.
    pub(crate) fn set_file_names(&mut self, file_name: String, relative_file_name: String) {
        self.file_name = file_name;
        self.relative_file_name = relative_file_name;
    }

    pub fn linked_character(&self) -> Option<&LinkedCharacter> {
        self.linked_character.as_ref()
    }

    pub fn set_linked_character(&mut self, character: &Rc<Character>) {
        self.linked_character = Some(LinkedCharacter::new(character));
    }

    pub fn clear_linked_character(&mut self) -> bool {
        self.linked_character.take().is_some()
    }

    pub fn no_linked_character(&self) -> bool {
        self.linked_character.is_none()
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, value: bool) {
        self.read_only = value;
    }

    pub fn colour(&self) -> Option<Colour> {
        if let Some(colour) = self.colour {
            return Some(colour);
        }
        if self.read_only {
            Some(Colour::READ_ONLY)
        } else if !self.is_not_enemy() {
            Some(Colour::ENEMY)
        } else {
            None
        }
    }

    pub fn set_colour(&mut self, colour: Option<Colour>) {
        self.colour = colour;
    }

    /// Compact "(connection/loyalty)" summary shown on the collapsed row.
    pub fn quick_text(&self) -> String {
        if self.is_group_or_made_man() {
            format!("({}/{})", self.connection, statics::EN_QUICK_GROUP)
        } else {
            format!("({}/{})", self.connection, self.loyalty)
        }
    }
}

/// Read a JSON5 array of contacts, as written by the owning document.
pub fn load_contacts(path: &Path) -> anyhow::Result<Vec<Contact>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    json5::from_str(&text).with_context(|| format!("parsing contacts in {path:?}"))
}

fn replace_flag(slot: &mut bool, value: bool) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
