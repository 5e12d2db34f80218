use anyhow::Context;
use contact_panel::{Contact, ContactType, Settings, Taxonomy, TaxonomyStore, statics};
use std::{path::PathBuf, rc::Rc};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("contact_panel=info")),
        )
        .init();

    let root = Settings::default_root();
    let settings = Settings::load_or_default(&root.join(statics::SETTINGS_FILE), &root)?;

    let taxonomy = match TaxonomyStore::new(&settings.data_dir).get() {
        Ok(taxonomy) => taxonomy,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "taxonomy unavailable; option lists will be empty");
            Rc::new(Taxonomy::default())
        }
    };

    let contacts = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => contact_panel::load_contacts(&path)
            .with_context(|| format!("loading contacts from {path:?}"))?,
        None => vec![
            Contact::new(ContactType::Contact),
            Contact::new(ContactType::Enemy),
        ],
    };

    contact_panel::run_gui(settings, taxonomy, contacts)
        .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
