use indexmap::IndexMap;

use crate::model::criteria::{DisplayGroup, FilterCriteria};
use crate::model::sheet::Sheet;
use crate::model::status::Status;
use crate::parse::name_parser::month_label;
use crate::util::unicode::{compare_names, fold, query_tokens};

/// Group key for system sheets
pub const SYSTEM_GROUP: &str = "Sistema";
/// Group key for sheets without a resolvable date
pub const UNDATED_GROUP: &str = "Sin fecha";

/// Where a sheet lands. Variant order is group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum GroupSlot {
    System,
    Month { year: i32, month: u32 },
    Undated,
}

impl GroupSlot {
    fn of(sheet: &Sheet) -> GroupSlot {
        if sheet.status == Status::System {
            GroupSlot::System
        } else if sheet.date.is_resolved() {
            GroupSlot::Month {
                year: sheet.date.year,
                month: sheet.date.month,
            }
        } else {
            GroupSlot::Undated
        }
    }

    fn key(&self, sample: &Sheet) -> String {
        match self {
            GroupSlot::System => SYSTEM_GROUP.to_string(),
            GroupSlot::Month { .. } => {
                month_label(&sample.date).unwrap_or_else(|| UNDATED_GROUP.to_string())
            }
            GroupSlot::Undated => UNDATED_GROUP.to_string(),
        }
    }
}

/// Folded text a query is matched against: name, month label and status
fn haystack(sheet: &Sheet) -> String {
    let month = month_label(&sheet.date).unwrap_or_default();
    fold(&format!(
        "{} {} {} {}",
        sheet.name,
        month,
        sheet.status.key(),
        sheet.status.label()
    ))
}

/// Every query token must occur in the sheet's searchable text
pub fn matches_query(sheet: &Sheet, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    let text = haystack(sheet);
    tokens.iter().all(|t| text.contains(t.as_str()))
}

/// Whether a sheet survives both filters
pub fn matches(sheet: &Sheet, criteria: &FilterCriteria) -> bool {
    criteria.status_filter.accepts(sheet.status)
        && matches_query(sheet, &query_tokens(&criteria.text_query))
}

/// Filter, group and sort sheets for display.
///
/// Groups come out as `Sistema`, then month groups by ascending
/// (year, month), then `Sin fecha`. Empty groups are never emitted. Within a
/// group, sheets sort by (year, month, day) and then by name.
pub fn view(sheets: &[Sheet], criteria: &FilterCriteria) -> Vec<DisplayGroup> {
    let tokens = query_tokens(&criteria.text_query);

    let mut buckets: IndexMap<GroupSlot, Vec<Sheet>> = IndexMap::new();
    for sheet in sheets {
        if !criteria.status_filter.accepts(sheet.status) || !matches_query(sheet, &tokens) {
            continue;
        }
        buckets
            .entry(GroupSlot::of(sheet))
            .or_default()
            .push(sheet.clone());
    }
    buckets.sort_keys();

    buckets
        .into_iter()
        .map(|(slot, mut items)| {
            items.sort_by(|a, b| {
                a.date
                    .sort_key()
                    .cmp(&b.date.sort_key())
                    .then_with(|| compare_names(&a.name, &b.name))
            });
            DisplayGroup {
                key: slot.key(&items[0]),
                items,
            }
        })
        .collect()
}

/// Filtered sheets in workbook position order, for reordering
pub fn workbook_order(sheets: &[Sheet], criteria: &FilterCriteria) -> Vec<Sheet> {
    let tokens = query_tokens(&criteria.text_query);
    let mut items: Vec<Sheet> = sheets
        .iter()
        .filter(|s| criteria.status_filter.accepts(s.status) && matches_query(s, &tokens))
        .cloned()
        .collect();
    items.sort_by_key(|s| s.position);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sheet::{SheetDate, SheetId};
    use crate::model::status::StatusFilter;
    use pretty_assertions::assert_eq;

    fn sheet(id: &str, name: &str, status: Status, date: (u32, u32, i32), position: usize) -> Sheet {
        Sheet {
            id: SheetId::new(id),
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

    fn sample() -> Vec<Sheet> {
        vec![
            sheet("1", "Sin fecha", Status::Unclassified, (0, 0, 0), 0),
            sheet("2", "Samaná 10.01", Status::Open, (10, 1, 2025), 1),
            sheet("3", "Plantilla Nacional", Status::System, (0, 0, 0), 2),
            sheet("4", "Jarabacoa 05.03", Status::Cancelled, (5, 3, 2024), 3),
        ]
    }

    fn keys(groups: &[DisplayGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn group_order_system_months_undated() {
        let groups = view(&sample(), &FilterCriteria::default());
        assert_eq!(
            keys(&groups),
            vec!["Sistema", "Marzo 2024", "Enero 2025", "Sin fecha"]
        );
    }

    #[test]
    fn system_wins_over_date() {
        let sheets = vec![sheet("1", "Plantilla 05.03", Status::System, (5, 3, 2024), 0)];
        let groups = view(&sheets, &FilterCriteria::default());
        assert_eq!(keys(&groups), vec!["Sistema"]);
    }

    #[test]
    fn bad_month_goes_undated() {
        let sheets = vec![sheet("1", "Tour 05.13", Status::Open, (5, 13, 0), 0)];
        let groups = view(&sheets, &FilterCriteria::default());
        assert_eq!(keys(&groups), vec!["Sin fecha"]);
    }

    #[test]
    fn items_sort_by_date_then_name() {
        let sheets = vec![
            sheet("1", "Zona 20.03", Status::Open, (20, 3, 2024), 0),
            sheet("2", "Ávila 05.03", Status::Open, (5, 3, 2024), 1),
            sheet("3", "Bani 05.03", Status::Open, (5, 3, 2024), 2),
            sheet("4", "avila 05.03", Status::Open, (5, 3, 2024), 3),
        ];
        let groups = view(&sheets, &FilterCriteria::default());
        let names: Vec<&str> = groups[0].items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["avila 05.03", "Ávila 05.03", "Bani 05.03", "Zona 20.03"]);
    }

    #[test]
    fn empty_groups_are_omitted() {
        let criteria = FilterCriteria::new("", StatusFilter::Only(Status::Open));
        let groups = view(&sample(), &criteria);
        assert_eq!(keys(&groups), vec!["Enero 2025"]);
        assert!(view(&[], &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn query_tokens_are_anded_and_accent_blind() {
        let criteria = FilterCriteria::new("SAMANA enero", StatusFilter::All);
        let groups = view(&sample(), &criteria);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].name, "Samaná 10.01");

        let criteria = FilterCriteria::new("samana marzo", StatusFilter::All);
        assert!(view(&sample(), &criteria).is_empty());
    }

    #[test]
    fn query_matches_status_label_and_key() {
        let by_label = FilterCriteria::new("cancelado", StatusFilter::All);
        let by_key = FilterCriteria::new("cancelled", StatusFilter::All);
        for criteria in [by_label, by_key] {
            let groups = view(&sample(), &criteria);
            assert_eq!(keys(&groups), vec!["Marzo 2024"]);
        }
    }

    #[test]
    fn filter_order_does_not_matter() {
        let sheets = sample();
        let text = FilterCriteria::new("a", StatusFilter::All);
        let status = FilterCriteria::new("", StatusFilter::Only(Status::Open));
        let both = FilterCriteria::new("a", StatusFilter::Only(Status::Open));

        let text_then_status: Vec<Sheet> = workbook_order(&workbook_order(&sheets, &text), &status);
        let status_then_text: Vec<Sheet> = workbook_order(&workbook_order(&sheets, &status), &text);
        assert_eq!(text_then_status, status_then_text);
        assert_eq!(text_then_status, workbook_order(&sheets, &both));
    }

    #[test]
    fn view_is_idempotent() {
        let sheets = sample();
        let criteria = FilterCriteria::new("2024", StatusFilter::All);
        assert_eq!(view(&sheets, &criteria), view(&sheets, &criteria));
    }

    #[test]
    fn workbook_order_follows_positions() {
        let mut sheets = sample();
        sheets.reverse();
        let items = workbook_order(&sheets, &FilterCriteria::default());
        let positions: Vec<usize> = items.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }
}
