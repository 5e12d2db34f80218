//! Categorical option lists for contact fields.
//! Taxonomy documents are JSON5 files in the data directory: `contacts.json5`
//! (roles, sexes, ages, ...) and `metatypes.json5` (metatypes with nested
//! metavariants). Each entry carries a canonical value and an optional
//! translated display text.

use crate::contact::ContactField;
use crate::statics;
use anyhow::Context;
use deunicode::deunicode;
use indexmap::IndexMap;
use serde::Deserialize;
use std::{
    cmp::Ordering,
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Role,
    Metatype,
    Sex,
    Age,
    PersonalLife,
    Type,
    PreferredPayment,
    HobbiesVice,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Role,
        Category::Metatype,
        Category::Sex,
        Category::Age,
        Category::PersonalLife,
        Category::Type,
        Category::PreferredPayment,
        Category::HobbiesVice,
    ];

    pub fn field(self) -> ContactField {
        match self {
            Category::Role => ContactField::Role,
            Category::Metatype => ContactField::Metatype,
            Category::Sex => ContactField::Sex,
            Category::Age => ContactField::Age,
            Category::PersonalLife => ContactField::PersonalLife,
            Category::Type => ContactField::Type,
            Category::PreferredPayment => ContactField::PreferredPayment,
            Category::HobbiesVice => ContactField::HobbiesVice,
        }
    }

    pub fn for_field(field: ContactField) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.field() == field)
    }
}

/// One taxonomy value: either a bare string or `{ name, translate }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyEntry {
    Plain(String),
    Named {
        name: String,
        #[serde(default)]
        translate: Option<String>,
    },
}

impl TaxonomyEntry {
    pub fn value(&self) -> &str {
        match self {
            TaxonomyEntry::Plain(name) | TaxonomyEntry::Named { name, .. } => name,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            TaxonomyEntry::Plain(name) => name,
            TaxonomyEntry::Named { name, translate } => translate.as_deref().unwrap_or(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetatypeEntry {
    pub name: String,
    #[serde(default)]
    pub translate: Option<String>,
    #[serde(default)]
    pub metavariants: Vec<TaxonomyEntry>,
}

impl MetatypeEntry {
    pub fn display(&self) -> &str {
        self.translate.as_deref().unwrap_or(&self.name)
    }
}

/// Anything that can answer taxonomy queries by category.
pub trait TaxonomySource {
    /// Flat entries for a category. Metatypes are served by `metatypes`.
    fn entries(&self, category: Category) -> &[TaxonomyEntry];
    fn metatypes(&self) -> &[MetatypeEntry];
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ContactsDocument {
    contacts: Vec<TaxonomyEntry>,
    sexes: Vec<TaxonomyEntry>,
    ages: Vec<TaxonomyEntry>,
    personallives: Vec<TaxonomyEntry>,
    types: Vec<TaxonomyEntry>,
    preferredpayments: Vec<TaxonomyEntry>,
    hobbiesvices: Vec<TaxonomyEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct MetatypesDocument {
    metatypes: Vec<MetatypeEntry>,
}

/// The parsed contents of both taxonomy documents.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    contacts: ContactsDocument,
    metatypes: MetatypesDocument,
}

impl Taxonomy {
    pub fn parse_json5(contacts: &str, metatypes: &str) -> anyhow::Result<Self> {
        Ok(Self {
            contacts: json5::from_str(contacts).context("parsing contacts taxonomy")?,
            metatypes: json5::from_str(metatypes).context("parsing metatypes taxonomy")?,
        })
    }

    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let contacts_path = dir.join(statics::TAXONOMY_CONTACTS_FILE);
        let metatypes_path = dir.join(statics::TAXONOMY_METATYPES_FILE);
        let contacts = fs::read_to_string(&contacts_path)
            .with_context(|| format!("reading {contacts_path:?}"))?;
        let metatypes = fs::read_to_string(&metatypes_path)
            .with_context(|| format!("reading {metatypes_path:?}"))?;
        Self::parse_json5(&contacts, &metatypes)
            .with_context(|| format!("loading taxonomy from {dir:?}"))
    }
}

impl TaxonomySource for Taxonomy {
    fn entries(&self, category: Category) -> &[TaxonomyEntry] {
        let doc = &self.contacts;
        match category {
            Category::Role => &doc.contacts,
            Category::Sex => &doc.sexes,
            Category::Age => &doc.ages,
            Category::PersonalLife => &doc.personallives,
            Category::Type => &doc.types,
            Category::PreferredPayment => &doc.preferredpayments,
            Category::HobbiesVice => &doc.hobbiesvices,
            Category::Metatype => &[],
        }
    }

    fn metatypes(&self) -> &[MetatypeEntry] {
        &self.metatypes.metatypes
    }
}

/// Loads the taxonomy from the data directory on first use and hands out the
/// cached copy afterwards.
#[derive(Debug)]
pub struct TaxonomyStore {
    data_dir: PathBuf,
    cached: Option<Rc<Taxonomy>>,
}

impl TaxonomyStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cached: None,
        }
    }

    pub fn get(&mut self) -> anyhow::Result<Rc<Taxonomy>> {
        if let Some(taxonomy) = &self.cached {
            return Ok(Rc::clone(taxonomy));
        }
        let taxonomy = Rc::new(Taxonomy::load_dir(&self.data_dir)?);
        info!(dir = ?self.data_dir, "loaded taxonomy");
        self.cached = Some(Rc::clone(&taxonomy));
        Ok(taxonomy)
    }
}

/// A selectable choice: canonical `value` shown as `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub value: String,
    pub name: String,
}

impl ListItem {
    pub fn new(value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(statics::EN_EMPTY, statics::EN_EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.name.is_empty()
    }
}

/// Sort order for display lists: blank first, then by a transliterated,
/// case-folded key, then by the raw text so the order is total.
pub fn compare_items(a: &ListItem, b: &ListItem) -> Ordering {
    match (a.is_blank(), b.is_blank()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    collation_key(&a.name)
        .cmp(&collation_key(&b.name))
        .then_with(|| a.name.cmp(&b.name))
}

fn collation_key(text: &str) -> String {
    deunicode(text).to_lowercase()
}

/// The ordered choices for one taxonomy-backed field. Always starts with the
/// blank entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionList {
    items: Vec<ListItem>,
}

impl Default for OptionList {
    fn default() -> Self {
        Self {
            items: vec![ListItem::blank()],
        }
    }
}

impl OptionList {
    /// Build a list from unsorted items, adding the blank entry.
    pub fn from_items(items: impl IntoIterator<Item = ListItem>) -> Self {
        let mut list = Self::default();
        list.items.extend(items.into_iter().filter(|i| !i.is_blank()));
        list.items.sort_by(compare_items);
        list
    }

    pub fn build(source: &dyn TaxonomySource, category: Category) -> Self {
        match category {
            Category::Metatype => Self::from_items(flatten_metatypes(source.metatypes())),
            _ => Self::from_items(
                source
                    .entries(category)
                    .iter()
                    .map(|e| ListItem::new(e.value(), e.display())),
            ),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|i| i.value == value)
    }

    /// Display text for a stored canonical value. Unknown values show as-is.
    pub fn display_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.items
            .iter()
            .find(|i| i.value == value)
            .map_or(value, |i| i.name.as_str())
    }

    /// Canonical value for text typed or picked on the edit surface.
    pub fn value_for_display<'a>(&'a self, display: &'a str) -> &'a str {
        self.items
            .iter()
            .find(|i| i.name == display)
            .map_or(display, |i| i.value.as_str())
    }

    /// Index of `value`, inserting an ad-hoc item for it if the taxonomy does
    /// not know it so the stored value is not lost.
    pub fn select_or_insert(&mut self, value: &str) -> usize {
        if let Some(idx) = self.index_of(value) {
            return idx;
        }
        let item = ListItem::new(value, value);
        let idx = self
            .items
            .partition_point(|i| compare_items(i, &item) != Ordering::Greater);
        debug!(%value, "inserting value missing from taxonomy");
        self.items.insert(idx, item);
        idx
    }
}

/// Metatypes followed by their variants. A variant whose canonical value was
/// already seen is dropped; the first occurrence wins. The blank entry counts
/// as seen.
pub fn flatten_metatypes(metatypes: &[MetatypeEntry]) -> Vec<ListItem> {
    let mut seen: HashSet<&str> = HashSet::from([statics::EN_EMPTY]);
    let mut items = Vec::new();
    for metatype in metatypes {
        let parent_display = metatype.display();
        seen.insert(metatype.name.as_str());
        items.push(ListItem::new(&metatype.name, parent_display));

        for variant in &metatype.metavariants {
            if !seen.insert(variant.value()) {
                debug!(variant = variant.value(), "dropping duplicate metavariant");
                continue;
            }
            items.push(ListItem::new(
                variant.value(),
                format!("{parent_display} ({})", variant.display()),
            ));
        }
    }
    items
}

/// All eight option lists for a contact panel.
#[derive(Debug, Clone, Default)]
pub struct ContactOptions {
    lists: IndexMap<Category, OptionList>,
}

impl ContactOptions {
    pub fn build(source: &dyn TaxonomySource) -> Self {
        let lists = Category::ALL
            .into_iter()
            .map(|c| (c, OptionList::build(source, c)))
            .collect();
        Self { lists }
    }

    pub fn get(&self, category: Category) -> Option<&OptionList> {
        self.lists.get(&category)
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut OptionList> {
        self.lists.get_mut(&category)
    }

    pub fn for_field(&self, field: ContactField) -> Option<&OptionList> {
        Category::for_field(field).and_then(|c| self.get(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &OptionList)> {
        self.lists.iter().map(|(c, l)| (*c, l))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Category, ListItem, MetatypeEntry, OptionList, Taxonomy, TaxonomyEntry, TaxonomySource,
        flatten_metatypes,
    };
    use pretty_assertions::assert_eq;

    fn named(name: &str, translate: Option<&str>) -> TaxonomyEntry {
        TaxonomyEntry::Named {
            name: name.to_string(),
            translate: translate.map(str::to_string),
        }
    }

    #[test]
    fn entries_parse_as_strings_or_objects() {
        let taxonomy = Taxonomy::parse_json5(
            "{ contacts: ['Fixer', { name: 'Bartender', translate: 'Barkeeper' }], }",
            "{ metatypes: [] }",
        )
        .expect("parse");
        let roles = taxonomy.entries(Category::Role);
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].display(), "Fixer");
        assert_eq!(roles[1].value(), "Bartender");
        assert_eq!(roles[1].display(), "Barkeeper");
        assert!(taxonomy.entries(Category::Sex).is_empty());
    }

    #[test]
    fn metavariants_keep_first_occurrence() {
        let metatypes = vec![
            MetatypeEntry {
                name: "Human".into(),
                translate: None,
                metavariants: vec![named("Changeling", None), named("Nartaki", None)],
            },
            MetatypeEntry {
                name: "Elf".into(),
                translate: Some("Elfe".into()),
                metavariants: vec![named("Changeling", Some("Wechselbalg")), named("Human", None)],
            },
        ];
        let items = flatten_metatypes(&metatypes);
        assert_eq!(
            items,
            vec![
                ListItem::new("Human", "Human"),
                ListItem::new("Changeling", "Human (Changeling)"),
                ListItem::new("Nartaki", "Human (Nartaki)"),
                ListItem::new("Elf", "Elfe"),
            ]
        );
    }

    #[test]
    fn blank_metavariants_are_dropped() {
        let metatypes = vec![MetatypeEntry {
            name: "Human".into(),
            translate: None,
            metavariants: vec![TaxonomyEntry::Plain(String::new()), named("Nartaki", None)],
        }];
        assert_eq!(
            flatten_metatypes(&metatypes),
            vec![
                ListItem::new("Human", "Human"),
                ListItem::new("Nartaki", "Human (Nartaki)"),
            ]
        );

        let list = OptionList::from_items(flatten_metatypes(&metatypes));
        assert_eq!(list.items().iter().filter(|i| i.value.is_empty()).count(), 1);
    }

    #[test]
    fn lists_sort_blank_first_and_ignore_case_and_accents() {
        let list = OptionList::from_items([
            ListItem::new("z", "Zeta"),
            ListItem::new("e", "élan"),
            ListItem::new("a", "alpha"),
            ListItem::new("b", "Beta"),
        ]);
        let names: Vec<&str> = list.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["", "alpha", "Beta", "élan", "Zeta"]);
    }

    #[test]
    fn unknown_values_are_inserted_not_discarded() {
        let mut list = OptionList::from_items([
            ListItem::new("Fixer", "Fixer"),
            ListItem::new("Talismonger", "Talismonger"),
        ]);
        assert_eq!(list.select_or_insert(""), 0);
        assert_eq!(list.select_or_insert("Fixer"), 1);

        let idx = list.select_or_insert("Mr. Johnson");
        assert_eq!(list.items()[idx], ListItem::new("Mr. Johnson", "Mr. Johnson"));
        assert_eq!(list.len(), 4);
        assert!(list.items()[0].is_blank());
        assert_eq!(list.select_or_insert("Mr. Johnson"), idx);
    }

    #[test]
    fn display_and_value_lookups_fall_back_to_input() {
        let list = OptionList::from_items([ListItem::new("Male", "Männlich")]);
        assert_eq!(list.display_for("Male"), "Männlich");
        assert_eq!(list.display_for("Other"), "Other");
        assert_eq!(list.value_for_display("Männlich"), "Male");
        assert_eq!(list.value_for_display("Other"), "Other");
    }
}
