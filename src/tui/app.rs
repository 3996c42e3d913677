use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::book::SheetBook;
use crate::io::config_io::config_path_for;
use crate::io::file_workbook::FileWorkbook;
use crate::io::memory::MemoryWorkbook;
use crate::io::watcher::{WorkbookEvent, WorkbookWatcher};
use crate::io::workbook::Workbook;
use crate::model::config::PanelConfig;
use crate::model::sheet::{Sheet, SheetId};
use crate::model::status::{
    CANCELLED_COLOR, CLOSED_COLOR, OPEN_COLOR, Status, SYSTEM_COLOR,
};
use crate::panel::Panel;
use crate::parse::name_parser::tour_name;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a text filter; the list follows every keystroke
    Search,
    /// Keyboard move: a gap marker picks the drop point
    Move,
    /// New-sheet form is open
    Create,
}

/// How the list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Month groups (the default view)
    Grouped,
    /// Flat, in workbook position order
    Workbook,
}

/// One line item of the sheet list
#[derive(Debug, Clone)]
pub enum ListRow {
    Header { key: String, count: usize },
    Sheet(Sheet),
}

/// Keyboard move in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveState {
    pub source: SheetId,
    /// Gap the sheet will be dropped into: 0 is above the first listed
    /// sheet, `len` is below the last
    pub gap: usize,
}

/// Which create-form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Name,
    Template,
    Date,
}

impl CreateField {
    pub fn next(self) -> CreateField {
        match self {
            CreateField::Name => CreateField::Template,
            CreateField::Template => CreateField::Date,
            CreateField::Date => CreateField::Name,
        }
    }
}

/// The new-sheet form
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub name: String,
    /// Choices offered for the template: system sheets, then a blank option
    pub templates: Vec<String>,
    pub template_idx: usize,
    pub date: String,
    pub field: CreateField,
}

/// Label of the "no template" choice
pub const BLANK_TEMPLATE: &str = "(hoja en blanco)";

impl CreateForm {
    pub fn new(templates: Vec<String>, today: NaiveDate) -> Self {
        let mut templates = templates;
        templates.push(BLANK_TEMPLATE.to_string());
        CreateForm {
            name: String::new(),
            templates,
            template_idx: 0,
            date: today.format("%Y-%m-%d").to_string(),
            field: CreateField::Name,
        }
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.templates.get(self.template_idx).map(String::as_str)
    }
}

/// Where a sheet card was drawn, for mouse hit testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArea {
    pub id: SheetId,
    pub area: Rect,
}

/// Main application state
pub struct App {
    pub panel: Panel<Box<dyn Workbook>>,
    pub mode: Mode,
    pub order: ListOrder,
    pub should_quit: bool,
    pub theme: Theme,
    /// Index into `visible_sheets()`
    pub cursor: usize,
    /// First list line drawn
    pub scroll_offset: usize,
    pub search_input: String,
    pub move_state: Option<MoveState>,
    pub create_form: Option<CreateForm>,
    /// Sheet picked up by a mouse press
    pub drag_source: Option<SheetId>,
    /// Card rectangles from the last draw
    pub card_areas: Vec<CardArea>,
    /// Workbook changed on disk while a move or the form was open
    pub pending_refresh: bool,
}

impl App {
    pub fn new(panel: Panel<Box<dyn Workbook>>) -> Self {
        let theme = Theme::from_config(&panel.config().ui);
        App {
            panel,
            mode: Mode::Navigate,
            order: ListOrder::Grouped,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            search_input: String::new(),
            move_state: None,
            create_form: None,
            drag_source: None,
            card_areas: Vec::new(),
            pending_refresh: false,
        }
    }

    /// Apply a deferred outside change once no move or form is open
    pub fn apply_pending_refresh(&mut self) {
        if !self.pending_refresh || !matches!(self.mode, Mode::Navigate | Mode::Search) {
            return;
        }
        self.pending_refresh = false;
        let _ = self.panel.handle_event(&WorkbookEvent::Changed);
        self.clamp_cursor();
    }

    /// List rows for the current order and criteria
    pub fn rows(&self) -> Vec<ListRow> {
        match self.order {
            ListOrder::Grouped => self
                .panel
                .groups()
                .into_iter()
                .flat_map(|g| {
                    let header = ListRow::Header {
                        key: g.key,
                        count: g.items.len(),
                    };
                    std::iter::once(header).chain(g.items.into_iter().map(ListRow::Sheet))
                })
                .collect(),
            ListOrder::Workbook => self
                .panel
                .workbook_order()
                .into_iter()
                .map(ListRow::Sheet)
                .collect(),
        }
    }

    /// Sheets in display order, the cursor moves over these
    pub fn visible_sheets(&self) -> Vec<Sheet> {
        self.rows()
            .into_iter()
            .filter_map(|row| match row {
                ListRow::Sheet(s) => Some(s),
                ListRow::Header { .. } => None,
            })
            .collect()
    }

    pub fn cursor_sheet(&self) -> Option<Sheet> {
        self.visible_sheets().into_iter().nth(self.cursor)
    }

    /// Keep the cursor on a sheet after the list changed
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_sheets().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on `id` if it is listed
    pub fn focus_sheet(&mut self, id: &SheetId) {
        if let Some(idx) = self.visible_sheets().iter().position(|s| &s.id == id) {
            self.cursor = idx;
        }
    }

    /// Card under a terminal cell
    pub fn card_at(&self, column: u16, row: u16) -> Option<&CardArea> {
        self.card_areas.iter().find(|c| {
            let a = c.area;
            column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
        })
    }

    /// Template choices for the create form
    pub fn template_choices(&self) -> Vec<String> {
        self.panel
            .snapshot()
            .sheets
            .iter()
            .filter(|s| s.status == Status::System)
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Sample workbook for `tp demo`, dated around `today`
pub fn demo_workbook(today: NaiveDate) -> MemoryWorkbook {
    let day = |offset: i64| today + chrono::Duration::days(offset);
    let names = [
        tour_name("Samaná", day(-20)),
        tour_name("Jarabacoa", day(3)),
        tour_name("Bávaro", day(12)),
        tour_name("Constanza", day(40)),
        tour_name("Puerto Plata", day(75)),
    ];
    let colors = [
        Some(CLOSED_COLOR),
        Some(OPEN_COLOR),
        Some(OPEN_COLOR),
        Some(CANCELLED_COLOR),
        None,
    ];

    let mut sheets: Vec<(&str, Option<&str>)> = vec![
        ("Plantilla Nacional", Some(SYSTEM_COLOR)),
        ("Plantilla Internacional", Some(SYSTEM_COLOR)),
    ];
    sheets.extend(names.iter().map(String::as_str).zip(colors));
    sheets.push(("Notas", None));
    MemoryWorkbook::new(SheetBook::from_names(&sheets))
}

/// Run the panel against a workbook file
pub fn run(workbook: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn Workbook> = Box::new(FileWorkbook::open(workbook)?);
    let panel = Panel::with_config_file(file, &config_path_for(workbook))?;
    let watcher = match WorkbookWatcher::start(workbook) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "workbook watcher not started");
            None
        }
    };
    run_app(App::new(panel), watcher.as_ref())
}

/// Run the panel on an in-memory sample workbook
pub fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let today = chrono::Local::now().date_naive();
    let memory: Box<dyn Workbook> = Box::new(demo_workbook(today));
    let panel = Panel::new(memory, PanelConfig::default());
    run_app(App::new(panel), None)
}

fn run_app(
    mut app: App,
    watcher: Option<&WorkbookWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    // A failed first read is shown in the status row
    let _ = app.panel.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&WorkbookWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        // Outside edits never interrupt a move or the form
        if watcher.and_then(WorkbookWatcher::poll).is_some() {
            app.pending_refresh = true;
        }
        app.apply_pending_refresh();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
