use crate::contact::{Contact, ContactField};
use crate::dialogs::NativeDialogs;
use crate::host::{CharacterRegistry, NotesEditor};
use crate::link::{LinkResolver, Opened};
use crate::panel::{ContactPanel, FieldEdit, LinkAction};
use crate::settings::Settings;
use crate::statics;
use crate::taxonomy::{Category, Taxonomy};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{cell::RefCell, rc::Rc};

pub fn run_gui(settings: Settings, taxonomy: Rc<Taxonomy>, contacts: Vec<Contact>) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ContactApp::new(&settings, &taxonomy, contacts)))),
    )
}

fn opened_status(opened: &Opened) -> String {
    match opened {
        Opened::SwitchedTo => statics::EN_STATUS_SWITCHED.to_string(),
        Opened::Reloaded(path) | Opened::File(path) => {
            statics::EN_STATUS_OPENED.replace("{0}", &path.display().to_string())
        }
    }
}

/// One change reported by a row's panel: (row id, field).
type ChangeLog = Rc<RefCell<Vec<(u64, ContactField)>>>;

/// Hands a note committed in the notes window to `ContactPanel::edit_notes`.
struct CommittedNotes(Option<String>);

impl NotesEditor for CommittedNotes {
    fn edit_notes(&mut self, _notes: &str) -> Option<String> {
        self.0.take()
    }
}

struct ContactRow {
    id: u64,
    contact: Contact,
    panel: ContactPanel,
    notes_open: bool,
    notes_buffer: String,
}

/// Everything a row needs from the app while it renders.
struct RowEnv<'a> {
    registry: &'a mut CharacterRegistry,
    dialogs: &'a mut NativeDialogs,
    status: &'a mut String,
}

struct ContactApp {
    rows: Vec<ContactRow>,
    changes: ChangeLog,
    registry: CharacterRegistry,
    dialogs: NativeDialogs,
    status: String,
}

impl ContactApp {
    fn new(settings: &Settings, taxonomy: &Taxonomy, contacts: Vec<Contact>) -> Self {
        let changes: ChangeLog = Rc::default();
        let resolver = LinkResolver::from_settings(settings);
        let rows = contacts
            .into_iter()
            .zip(0u64..)
            .map(|(contact, id)| {
                let sink = Rc::clone(&changes);
                let panel = ContactPanel::load(&contact, taxonomy, resolver.clone(), move |field| {
                    sink.borrow_mut().push((id, field));
                });
                ContactRow {
                    id,
                    contact,
                    panel,
                    notes_open: false,
                    notes_buffer: String::new(),
                }
            })
            .collect();

        Self {
            rows,
            changes,
            registry: CharacterRegistry::new(),
            dialogs: NativeDialogs::new(settings.character_extension.clone()),
            status: String::new(),
        }
    }

    fn render_changes(&self, ui: &mut egui::Ui) {
        let changes = self.changes.borrow();
        if changes.is_empty() {
            ui.label(statics::EN_CHANGES_NONE);
            return;
        }
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        ui.push_id("changes_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(40.0).resizable(false))
                .column(Column::remainder())
                .body(|mut body| {
                    for (id, field) in changes.iter().rev() {
                        body.row(row_h, |mut row| {
                            row.col(|ui| {
                                ui.label(format!("#{id}"));
                            });
                            row.col(|ui| {
                                ui.label(field.tag());
                            });
                        });
                    }
                });
        });
    }
}

impl ContactRow {
    /// Draw the row. Returns true when the user asked to delete it.
    fn ui(&mut self, ui: &mut egui::Ui, env: &mut RowEnv<'_>) -> bool {
        let mut delete = false;
        let mut frame = egui::Frame::group(ui.style());
        if let Some(c) = self.contact.colour() {
            frame = frame.fill(egui::Color32::from_rgb(c.r, c.g, c.b));
        }

        frame.show(ui, |ui| {
            ui.horizontal(|ui| {
                let expand_label = if self.panel.expanded() {
                    statics::EN_BTN_COLLAPSE
                } else {
                    statics::EN_BTN_EXPAND
                };
                if ui.small_button(expand_label).clicked() {
                    self.panel.toggle_expanded();
                }

                self.text_field(ui, ContactField::Name, statics::EN_LABEL_NAME);
                self.text_field(ui, ContactField::Location, statics::EN_LABEL_LOCATION);
                self.combo(ui, Category::Role, statics::EN_LABEL_ROLE);

                let state = self.panel.field_state(&self.contact, ContactField::Connection);
                ui.label(statics::EN_LABEL_CONNECTION);
                let mut connection = self.contact.connection();
                let max = self.contact.connection_maximum();
                if ui
                    .add_enabled(
                        state.enabled,
                        egui::DragValue::new(&mut connection)
                            .range(statics::CONNECTION_MINIMUM..=max),
                    )
                    .changed()
                {
                    self.panel
                        .apply_edit(&mut self.contact, FieldEdit::Connection(connection));
                }

                let state = self.panel.field_state(&self.contact, ContactField::Loyalty);
                ui.label(statics::EN_LABEL_LOYALTY);
                let mut loyalty = self.contact.loyalty();
                if ui
                    .add_enabled(
                        state.enabled,
                        egui::DragValue::new(&mut loyalty)
                            .range(statics::LOYALTY_MINIMUM..=statics::LOYALTY_MAXIMUM),
                    )
                    .changed()
                {
                    self.panel
                        .apply_edit(&mut self.contact, FieldEdit::Loyalty(loyalty));
                }

                self.link_menu(ui, env);

                let notes_tip = self.panel.notes_tooltip(&self.contact);
                if ui
                    .button(statics::EN_BTN_NOTES)
                    .on_hover_text(notes_tip)
                    .clicked()
                {
                    self.notes_buffer = self.contact.notes().to_string();
                    self.notes_open = true;
                }

                self.flag(ui, ContactField::Group, statics::EN_CHECKBOX_GROUP);
                self.flag(ui, ContactField::Free, statics::EN_CHECKBOX_FREE);
                self.flag(ui, ContactField::Blackmail, statics::EN_CHECKBOX_BLACKMAIL);
                self.flag(ui, ContactField::Family, statics::EN_CHECKBOX_FAMILY);

                ui.label(self.contact.quick_text());

                if self.panel.delete_visible(&self.contact)
                    && ui.button(statics::EN_BTN_DELETE).clicked()
                {
                    delete = true;
                }
            });

            if self.panel.expanded() {
                egui::Grid::new(("contact_details", self.id))
                    .num_columns(4)
                    .show(ui, |ui| {
                        self.combo(ui, Category::Metatype, statics::EN_LABEL_METATYPE);
                        self.combo(ui, Category::Sex, statics::EN_LABEL_SEX);
                        ui.end_row();
                        self.combo(ui, Category::Age, statics::EN_LABEL_AGE);
                        self.combo(ui, Category::PersonalLife, statics::EN_LABEL_PERSONAL_LIFE);
                        ui.end_row();
                        self.combo(ui, Category::Type, statics::EN_LABEL_TYPE);
                        self.combo(
                            ui,
                            Category::PreferredPayment,
                            statics::EN_LABEL_PREFERRED_PAYMENT,
                        );
                        ui.end_row();
                        self.combo(ui, Category::HobbiesVice, statics::EN_LABEL_HOBBIES_VICE);
                        ui.end_row();
                    });
            }
        });

        self.notes_window(ui.ctx());
        delete
    }

    fn text_field(&mut self, ui: &mut egui::Ui, field: ContactField, hint: &str) {
        let state = self.panel.field_state(&self.contact, field);
        let mut text = self.contact.text(field).to_string();
        let edit = egui::TextEdit::singleline(&mut text)
            .hint_text(hint)
            .desired_width(140.0);
        if ui.add_enabled(state.enabled, edit).changed() {
            self.panel
                .apply_edit(&mut self.contact, FieldEdit::Text(field, text));
        }
    }

    fn combo(&mut self, ui: &mut egui::Ui, category: Category, label: &str) {
        let field = category.field();
        let state = self.panel.field_state(&self.contact, field);
        let Some(list) = self.panel.options().get(category) else {
            return;
        };

        let before = self.panel.selected_index(category).unwrap_or(0);
        let mut chosen = before;
        let selected_text = self.panel.display_value(&self.contact, field).to_string();

        ui.label(label);
        ui.add_enabled_ui(state.enabled, |ui| {
            egui::ComboBox::from_id_salt((label, self.id))
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (idx, item) in list.items().iter().enumerate() {
                        ui.selectable_value(&mut chosen, idx, item.name.as_str());
                    }
                });
        });

        if chosen != before {
            self.panel.select_option(&mut self.contact, category, chosen);
        }
    }

    fn flag(&mut self, ui: &mut egui::Ui, field: ContactField, label: &str) {
        let state = self.panel.field_state(&self.contact, field);
        if !state.visible {
            return;
        }
        let mut value = match field {
            ContactField::Group => self.contact.is_group_or_made_man(),
            ContactField::Free => self.contact.free(),
            ContactField::Family => self.contact.family(),
            ContactField::Blackmail => self.contact.blackmail(),
            _ => return,
        };
        if ui
            .add_enabled(state.enabled, egui::Checkbox::new(&mut value, label))
            .changed()
        {
            let edit = match field {
                ContactField::Group => FieldEdit::Group(value),
                ContactField::Free => FieldEdit::Free(value),
                ContactField::Family => FieldEdit::Family(value),
                _ => FieldEdit::Blackmail(value),
            };
            self.panel.apply_edit(&mut self.contact, edit);
        }
    }

    fn link_menu(&mut self, ui: &mut egui::Ui, env: &mut RowEnv<'_>) {
        let actions = self.panel.link_actions(&self.contact);
        let tooltip = self.panel.link_tooltip(&self.contact);
        let mut picked = None;
        ui.menu_button(statics::EN_BTN_LINK, |ui| {
            for action in actions {
                let label = match action {
                    LinkAction::Attach => statics::EN_MENU_ATTACH,
                    LinkAction::Open => statics::EN_MENU_OPEN,
                    LinkAction::Remove => statics::EN_MENU_REMOVE,
                };
                if ui.button(label).clicked() {
                    picked = Some(*action);
                    ui.close();
                }
            }
        })
        .response
        .on_hover_text(tooltip);

        match picked {
            Some(LinkAction::Attach) => {
                if self.panel.attach_character(&mut self.contact, &mut *env.dialogs) {
                    *env.status = statics::EN_STATUS_LINKED.replace("{0}", self.contact.file_name());
                }
            }
            Some(LinkAction::Open) => {
                if let Ok(opened) =
                    self.panel
                        .open_linked(&self.contact, &mut *env.registry, &mut *env.dialogs)
                {
                    *env.status = opened_status(&opened);
                }
            }
            Some(LinkAction::Remove) => {
                if self.panel.remove_character(&mut self.contact, &mut *env.dialogs) {
                    *env.status = statics::EN_STATUS_REMOVED.to_string();
                }
            }
            None => {}
        }
    }

    fn notes_window(&mut self, ctx: &egui::Context) {
        if !self.notes_open {
            return;
        }
        let mut open = self.notes_open;
        let mut commit = None;
        let mut cancel = false;

        egui::Window::new(statics::EN_WINDOW_NOTES)
            .id(egui::Id::new(("notes", self.id)))
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.text_edit_multiline(&mut self.notes_buffer);
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_OK).clicked() {
                        commit = Some(self.notes_buffer.clone());
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        cancel = true;
                    }
                });
            });

        if commit.is_some() {
            let mut editor = CommittedNotes(commit);
            self.panel.edit_notes(&mut self.contact, &mut editor);
            open = false;
        }
        if cancel {
            open = false;
        }
        self.notes_open = open;
    }
}

impl eframe::App for ContactApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::right("changes")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_CHANGES);
                ui.separator();
                self.render_changes(ui);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut env = RowEnv {
                registry: &mut self.registry,
                dialogs: &mut self.dialogs,
                status: &mut self.status,
            };
            let mut deleted = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (idx, row) in self.rows.iter_mut().enumerate() {
                    if row.ui(ui, &mut env) {
                        deleted = Some(idx);
                    }
                }
            });
            if let Some(idx) = deleted {
                let row = self.rows.remove(idx);
                *env.status = statics::EN_STATUS_DELETED.replace("{0}", row.contact.name());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::opened_status;
    use crate::link::Opened;
    use crate::statics;
    use std::path::PathBuf;

    #[test]
    fn open_results_read_as_status_lines() {
        assert_eq!(opened_status(&Opened::SwitchedTo), statics::EN_STATUS_SWITCHED);
        assert_eq!(
            opened_status(&Opened::File(PathBuf::from("/chars/jane.chum5"))),
            "Opened /chars/jane.chum5"
        );
    }
}
