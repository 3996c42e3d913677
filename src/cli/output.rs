use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::criteria::DisplayGroup;
use crate::model::sheet::Sheet;
use crate::model::status::Status;
use crate::ops::reorder::ReorderOutcome;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SheetJson {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_color: Option<String>,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub position: usize,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub key: String,
    pub sheets: Vec<SheetJson>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub sheet: String,
    #[serde(flatten)]
    pub outcome: ReorderOutcome,
    pub order: Vec<String>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn sheet_to_json(sheet: &Sheet) -> SheetJson {
    SheetJson {
        id: sheet.id.to_string(),
        name: sheet.name.clone(),
        status: sheet.status,
        status_label: sheet.status.label(),
        tab_color: sheet.tab_color.clone(),
        day: sheet.date.day,
        month: sheet.date.month,
        year: sheet.date.year,
        position: sheet.position,
    }
}

pub fn groups_to_json(groups: &[DisplayGroup]) -> Vec<GroupJson> {
    groups
        .iter()
        .map(|g| GroupJson {
            key: g.key.clone(),
            sheets: g.items.iter().map(sheet_to_json).collect(),
        })
        .collect()
}

pub fn recovery_entry_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One sheet line: position, name, status label
pub fn format_sheet_line(sheet: &Sheet) -> String {
    format!("  {:>3}  {}  [{}]", sheet.position, sheet.name, sheet.status.label())
}

/// Group headers with their sheets, blank line between groups
pub fn format_groups(groups: &[DisplayGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("== {} ({}) ==", group.key, group.items.len()));
        lines.extend(group.items.iter().map(format_sheet_line));
    }
    lines
}

/// Flat listing in workbook order
pub fn format_order(sheets: &[Sheet]) -> Vec<String> {
    sheets.iter().map(format_sheet_line).collect()
}

pub fn format_move(sheet_name: &str, outcome: &ReorderOutcome) -> String {
    match outcome {
        ReorderOutcome::Moved { from, to } => {
            format!("moved {} from position {} to {}", sheet_name, from, to)
        }
        ReorderOutcome::Unchanged => format!("{} is already in place", sheet_name),
    }
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("    {}", line));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sheet::{SheetDate, SheetId};
    use insta::assert_snapshot;

    fn sheet(name: &str, status: Status, date: (u32, u32, i32), position: usize) -> Sheet {
        Sheet {
            id: SheetId::new(format!("sheet-{}", position + 1)),
            name: name.to_string(),
            status,
            tab_color: None,
            date: SheetDate {
                day: date.0,
                month: date.1,
                year: date.2,
            },
            position,
        }
    }

    #[test]
    fn grouped_listing() {
        let groups = vec![
            DisplayGroup {
                key: "Sistema".to_string(),
                items: vec![sheet("Plantilla Nacional", Status::System, (0, 0, 0), 0)],
            },
            DisplayGroup {
                key: "Marzo 2025".to_string(),
                items: vec![
                    sheet("Samaná 05.03", Status::Open, (5, 3, 2025), 2),
                    sheet("Constanza 18.03", Status::Closed, (18, 3, 2025), 11),
                ],
            },
        ];
        assert_snapshot!(format_groups(&groups).join("\n"), @r"
        == Sistema (1) ==
            0  Plantilla Nacional  [Sistema]

        == Marzo 2025 (2) ==
            2  Samaná 05.03  [Abierto]
           11  Constanza 18.03  [Cerrado]
        ");
    }

    #[test]
    fn move_messages() {
        assert_eq!(
            format_move("Samaná 05.03", &ReorderOutcome::Moved { from: 3, to: 1 }),
            "moved Samaná 05.03 from position 3 to 1"
        );
        assert_eq!(
            format_move("Samaná 05.03", &ReorderOutcome::Unchanged),
            "Samaná 05.03 is already in place"
        );
    }

    #[test]
    fn sheet_json_shape() {
        let json = serde_json::to_value(sheet_to_json(&sheet("Samaná 05.03", Status::Open, (5, 3, 2025), 2))).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["status_label"], "Abierto");
        assert_eq!(json["year"], 2025);
        assert!(json.get("tab_color").is_none());
    }
}
