use contact_panel::{
    Category, ContactOptions, ContactType, ListItem, OptionList, TaxonomySource, TaxonomyStore,
    load_contacts, statics,
};
use pretty_assertions::assert_eq;
use std::{fs, path::Path, rc::Rc};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn write_taxonomy(dir: &Path) -> Result<()> {
    fs::write(
        dir.join(statics::TAXONOMY_CONTACTS_FILE),
        r#"{
  // Roles
  contacts: ["Talismonger", "fixer", { name: "Bartender", translate: "Barkeeper" }],
  sexes: [{ name: "Male", translate: "Männlich" }, { name: "Female", translate: "Weiblich" }],
  ages: ["Young"],
}"#,
    )?;
    fs::write(
        dir.join(statics::TAXONOMY_METATYPES_FILE),
        r#"{
  metatypes: [
    {
      name: "Human",
      metavariants: [
        { name: "Changeling", translate: "Wechselbalg" },
        { name: "Changeling", translate: "Changeling (SURGE)" },
      ],
    },
    { name: "Ork", metavariants: ["Changeling", "Hobgoblin"] },
  ],
}"#,
    )?;
    Ok(())
}

fn names(list: &OptionList) -> Vec<&str> {
    list.items().iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn store_loads_once_and_caches() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_taxonomy(dir.path())?;

    let mut store = TaxonomyStore::new(dir.path());
    let first = store.get()?;
    // Later edits on disk do not leak into the cached copy.
    fs::remove_file(dir.path().join(statics::TAXONOMY_CONTACTS_FILE))?;
    let second = store.get()?;

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(second.entries(Category::Role).len(), 3);
    Ok(())
}

#[test]
fn missing_documents_are_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let err = TaxonomyStore::new(dir.path())
        .get()
        .expect_err("nothing to load");
    assert!(format!("{err:#}").contains(statics::TAXONOMY_CONTACTS_FILE));
    Ok(())
}

#[test]
fn all_eight_lists_are_built_blank_first() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_taxonomy(dir.path())?;
    let taxonomy = TaxonomyStore::new(dir.path()).get()?;

    let options = ContactOptions::build(taxonomy.as_ref());
    let categories: Vec<Category> = options.iter().map(|(c, _)| c).collect();
    assert_eq!(categories, Category::ALL.to_vec());
    for (_, list) in options.iter() {
        assert_eq!(list.items()[0], ListItem::blank());
    }

    let payments = options.get(Category::PreferredPayment).expect("payments");
    assert_eq!(payments.len(), 1);

    let roles = options.get(Category::Role).expect("roles");
    assert_eq!(names(roles), vec!["", "Barkeeper", "fixer", "Talismonger"]);

    let sexes = options.for_field(Category::Sex.field()).expect("sexes");
    assert_eq!(sexes.display_for("Female"), "Weiblich");
    assert_eq!(sexes.value_for_display("Männlich"), "Male");
    Ok(())
}

#[test]
fn duplicate_metavariants_keep_the_first() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_taxonomy(dir.path())?;
    let taxonomy = TaxonomyStore::new(dir.path()).get()?;

    let metatypes = OptionList::build(taxonomy.as_ref(), Category::Metatype);
    let changelings: Vec<&ListItem> = metatypes
        .items()
        .iter()
        .filter(|i| i.value == "Changeling")
        .collect();
    assert_eq!(changelings, vec![&ListItem::new("Changeling", "Human (Wechselbalg)")]);

    assert_eq!(
        names(&metatypes),
        vec!["", "Human", "Human (Wechselbalg)", "Ork", "Ork (Hobgoblin)"]
    );
    Ok(())
}

#[test]
fn contacts_file_round_trips_through_the_loader() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("contacts.json5");
    fs::write(
        &path,
        r#"[
  { name: "Jane", role: "Fixer", connection: 4, loyalty: 2, free: true },
  { entityType: "Enemy", name: "Lone Star", family: true, isGroup: true },
]"#,
    )?;

    let contacts = load_contacts(&path)?;
    assert_eq!(contacts.len(), 2);

    let jane = &contacts[0];
    assert_eq!(jane.entity_type(), ContactType::Contact);
    assert_eq!(jane.role(), "Fixer");
    assert_eq!((jane.connection(), jane.loyalty()), (4, 2));
    assert!(jane.free());

    let enemy = &contacts[1];
    assert_eq!(enemy.entity_type(), ContactType::Enemy);
    assert!(!enemy.family());
    assert_eq!(enemy.loyalty(), 1);
    assert_eq!(enemy.quick_text(), "(1/G)");
    Ok(())
}

#[test]
fn malformed_contacts_file_names_the_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json5");
    fs::write(&path, "[{ name: ")?;

    let err = load_contacts(&path).expect_err("truncated file");
    assert!(format!("{err:#}").contains("broken.json5"));
    Ok(())
}
