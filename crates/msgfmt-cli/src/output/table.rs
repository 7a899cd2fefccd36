//! Table rendering for `msgfmt inspect`.

use comfy_table::{presets, ContentArrangement, Table};
use msgfmt::{Message, MessageBody};
use serde::Serialize;

/// One row of the inspect table.
#[derive(Debug, Serialize)]
pub struct EntryRow {
    pub name: String,
    pub kind: &'static str,
    pub locales: Vec<String>,
    pub parameters: Vec<String>,
    pub templates: Vec<String>,
}

impl EntryRow {
    pub fn message(code: &str, message: &Message) -> Self {
        let kind = match message.body() {
            MessageBody::Node(_) => "message",
            MessageBody::Bundle(_) => "bundle",
        };
        Self::new(code, kind, message)
    }

    pub fn template(name: &str, message: &Message) -> Self {
        Self::new(name, "template", message)
    }

    fn new(name: &str, kind: &'static str, message: &Message) -> Self {
        EntryRow {
            name: name.to_string(),
            kind,
            locales: message.locales().iter().map(ToString::to_string).collect(),
            parameters: message.parameter_names().into_iter().collect(),
            templates: message.template_names().into_iter().collect(),
        }
    }
}

pub fn format_entry_table(rows: &[EntryRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Kind", "Locales", "Parameters", "Templates"]);

    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.kind.to_string(),
            row.locales.join(" "),
            row.parameters.join(", "),
            row.templates.join(", "),
        ]);
    }

    table
}
