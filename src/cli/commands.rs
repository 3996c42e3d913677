use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tp", about = concat!("tourpanel v", env!("CARGO_PKG_VERSION"), " - tour sheets at a glance"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Workbook file to use (default: nearest workbook.toml)
    #[arg(short = 'w', long = "workbook", global = true)]
    pub workbook: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter workbook.toml in the current directory
    Init(InitArgs),
    /// List sheets grouped by month
    List(ListArgs),
    /// Set a sheet's status (writes its tab color)
    Status(StatusArgs),
    /// Move a sheet before or after another one
    Mv(MvArgs),
    /// Make a sheet the active one
    Activate(SheetArg),
    /// Create a tour sheet from a template
    New(NewArgs),
    /// Toggle row/column headings on every sheet
    Headings,
    /// Toggle whether moves are written to the workbook
    AutoReorder,
    /// Show the recovery log
    Recovery(RecoveryArgs),
    /// Open the panel on a throwaway in-memory workbook
    Demo,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing workbook.toml
    #[arg(long)]
    pub force: bool,
    /// Start without the template sheets
    #[arg(long)]
    pub empty: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Text filter; every word must match (accents and case are ignored)
    #[arg(short, long)]
    pub query: Option<String>,
    /// Status filter (all, open, cancelled, closed, system, unclassified)
    #[arg(long, default_value = "all")]
    pub status: String,
    /// Flat list in workbook order instead of month groups
    #[arg(long)]
    pub order: bool,
}

#[derive(Args)]
pub struct SheetArg {
    /// Sheet id or name
    pub sheet: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Sheet id or name
    pub sheet: String,
    /// New status (open, cancelled, closed, system, unclassified)
    pub status: String,
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("edge").required(true).args(["before", "after"])))]
pub struct MvArgs {
    /// Sheet to move (id or name)
    pub sheet: String,
    /// Drop right before this sheet
    #[arg(long, value_name = "SHEET")]
    pub before: Option<String>,
    /// Drop right after this sheet
    #[arg(long, value_name = "SHEET")]
    pub after: Option<String>,
}

#[derive(Args)]
pub struct NewArgs {
    /// Tour name; the date suffix is added automatically
    pub name: String,
    /// Template sheet to copy (id or name); an unknown one starts a blank sheet
    #[arg(short, long)]
    pub template: Option<String>,
    /// Tour date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(short, long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the most recent N entries
    #[arg(long)]
    pub limit: Option<usize>,
}
