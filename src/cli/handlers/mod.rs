mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::config_path_for;
use crate::io::file_workbook::{FileWorkbook, discover_workbook};
use crate::io::recovery::read_recovery_entries;
use crate::io::workbook::WorkbookError;
use crate::model::criteria::FilterCriteria;
use crate::model::sheet::SheetId;
use crate::model::status::{Status, StatusFilter};
use crate::ops::create::CreateRequest;
use crate::ops::reorder::Edge;
use crate::panel::Panel;
use crate::util::unicode::names_eq_case_insensitive;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let workbook = cli.workbook.as_deref();

    // The panel and the demo are started by main
    let Some(cmd) = cli.command else {
        return Ok(());
    };
    match cmd {
        Commands::Init(args) => cmd_init(args, workbook),

        // Read commands
        Commands::List(args) => cmd_list(args, workbook, json),
        Commands::Recovery(args) => cmd_recovery(args, workbook, json),

        // Write commands
        Commands::Status(args) => cmd_status(args, workbook, json),
        Commands::Mv(args) => cmd_mv(args, workbook, json),
        Commands::Activate(args) => cmd_activate(args, workbook),
        Commands::New(args) => cmd_new(args, workbook, json),
        Commands::Headings => cmd_headings(workbook),
        Commands::AutoReorder => cmd_auto_reorder(workbook),
        Commands::Demo => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `-w` if given, otherwise the nearest workbook.toml above the cwd
pub fn resolve_workbook_path(workbook: Option<&str>) -> Result<PathBuf, WorkbookError> {
    match workbook {
        Some(p) => Ok(PathBuf::from(p)),
        None => {
            let cwd = std::env::current_dir().map_err(|e| WorkbookError::ReadError {
                path: PathBuf::from("."),
                source: e,
            })?;
            discover_workbook(&cwd)
        }
    }
}

/// Open the workbook with its panel.toml and take a first snapshot
fn open_panel(workbook: Option<&str>) -> Result<Panel<FileWorkbook>, Box<dyn std::error::Error>> {
    let path = resolve_workbook_path(workbook)?;
    let file = FileWorkbook::open(&path)?;
    let mut panel = Panel::with_config_file(file, &config_path_for(&path))?;
    panel.refresh()?;
    Ok(panel)
}

/// Find a sheet by exact id, then by name ignoring case
fn resolve_sheet(panel: &Panel<FileWorkbook>, reference: &str) -> Result<SheetId, String> {
    let sheets = &panel.snapshot().sheets;
    sheets
        .iter()
        .find(|s| s.id.as_str() == reference)
        .or_else(|| sheets.iter().find(|s| names_eq_case_insensitive(&s.name, reference)))
        .map(|s| s.id.clone())
        .ok_or_else(|| format!("no sheet matching '{}'", reference))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, workbook: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status_filter = StatusFilter::parse(&args.status).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: all, open, cancelled, closed, system, unclassified)",
            args.status
        )
    })?;
    let mut panel = open_panel(workbook)?;
    panel.set_criteria(FilterCriteria::new(
        args.query.unwrap_or_default(),
        status_filter,
    ));

    if args.order {
        let sheets = panel.workbook_order();
        if json {
            let out: Vec<SheetJson> = sheets.iter().map(sheet_to_json).collect();
            return print_json(&out);
        }
        for line in format_order(&sheets) {
            println!("{}", line);
        }
    } else {
        let groups = panel.groups();
        if json {
            return print_json(&groups_to_json(&groups));
        }
        for line in format_groups(&groups) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, workbook: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve_workbook_path(workbook)?;
    let entries = read_recovery_entries(&path, args.limit);

    if json {
        let out: Vec<RecoveryEntryJson> = entries.iter().map(recovery_entry_to_json).collect();
        return print_json(&out);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_recovery_entry(entry) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_status(args: StatusArgs, workbook: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = Status::parse_key(&args.status).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: open, cancelled, closed, system, unclassified)",
            args.status
        )
    })?;
    let mut panel = open_panel(workbook)?;
    let id = resolve_sheet(&panel, &args.sheet)?;
    panel.set_status(&id, status)?;

    if let Some(sheet) = panel.sheet(&id) {
        if json {
            return print_json(&sheet_to_json(sheet));
        }
        println!("{}: {}", sheet.name, sheet.status.label());
    }
    Ok(())
}

fn cmd_mv(args: MvArgs, workbook: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (target, edge) = match (args.before, args.after) {
        (Some(t), None) => (t, Edge::Before),
        (None, Some(t)) => (t, Edge::After),
        _ => return Err("exactly one of --before or --after is required".into()),
    };
    let mut panel = open_panel(workbook)?;
    if !panel.config().settings.auto_reorder {
        return Err("moves are disabled (settings.auto_reorder = false)".into());
    }
    let source = resolve_sheet(&panel, &args.sheet)?;
    let target = resolve_sheet(&panel, &target)?;
    let name = panel
        .sheet(&source)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| source.to_string());

    let outcome = panel.reorder(&source, &target, edge)?;
    let order: Vec<String> = panel.workbook_order().into_iter().map(|s| s.name).collect();

    if json {
        return print_json(&MoveJson {
            sheet: name,
            outcome,
            order,
        });
    }
    println!("{}", format_move(&name, &outcome));
    Ok(())
}

fn cmd_activate(args: SheetArg, workbook: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = open_panel(workbook)?;
    let id = resolve_sheet(&panel, &args.sheet)?;
    panel.activate(&id)?;
    println!("{}", panel.status_line());
    Ok(())
}

fn cmd_new(args: NewArgs, workbook: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = open_panel(workbook)?;
    let request = CreateRequest {
        base_name: args.name,
        template: args.template,
        date: args.date.unwrap_or_default(),
    };
    let sheet = panel.create_sheet(&request)?;

    if json {
        return print_json(&sheet_to_json(&sheet));
    }
    println!("{}", sheet.id);
    Ok(())
}

fn cmd_headings(workbook: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = open_panel(workbook)?;
    panel.toggle_headings()?;
    println!("{}", panel.status_line());
    Ok(())
}

fn cmd_auto_reorder(workbook: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut panel = open_panel(workbook)?;
    panel.toggle_auto_reorder();
    println!("{}", panel.status_line());
    Ok(())
}
