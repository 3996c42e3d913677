use std::fmt;

use serde::{Deserialize, Serialize};

/// Tour status, carried out-of-band by the sheet's tab color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Cancelled,
    Closed,
    System,
    Unclassified,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::Cancelled,
        Status::Closed,
        Status::System,
        Status::Unclassified,
    ];

    /// Stable lowercase key used on the command line and in JSON
    pub fn key(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Cancelled => "cancelled",
            Status::Closed => "closed",
            Status::System => "system",
            Status::Unclassified => "unclassified",
        }
    }

    /// Label shown in the panel
    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Abierto",
            Status::Cancelled => "Cancelado",
            Status::Closed => "Cerrado",
            Status::System => "Sistema",
            Status::Unclassified => "Sin clasificar",
        }
    }

    /// Parse a status key (case-insensitive)
    pub fn parse_key(s: &str) -> Option<Status> {
        let lower = s.trim().to_lowercase();
        Status::ALL.into_iter().find(|st| st.key() == lower)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which statuses survive the status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn accepts(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }

    /// Cycle All → Open → Cancelled → ... → Unclassified → All
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::ALL[0]),
            StatusFilter::Only(s) => {
                let idx = Status::ALL.iter().position(|x| *x == s).unwrap_or(0);
                match Status::ALL.get(idx + 1) {
                    Some(next) => StatusFilter::Only(*next),
                    None => StatusFilter::All,
                }
            }
        }
    }

    /// Parse `all` or a status key
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        Status::parse_key(s).map(StatusFilter::Only)
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Only(s) => s.label(),
        }
    }
}

/// Default tab colors for the four managed statuses
pub const OPEN_COLOR: &str = "#00B050";
pub const CANCELLED_COLOR: &str = "#FF0000";
pub const CLOSED_COLOR: &str = "#808080";
pub const SYSTEM_COLOR: &str = "#7030A0";

/// The status ↔ tab color codec.
///
/// Only this type looks at raw color strings. Comparison is a case-insensitive
/// exact match on the `#RRGGBB` form; anything else (including no color at all)
/// decodes to [`Status::Unclassified`]. Encoding `Unclassified` clears the color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPalette {
    pub open: String,
    pub cancelled: String,
    pub closed: String,
    pub system: String,
}

impl Default for StatusPalette {
    fn default() -> Self {
        StatusPalette {
            open: OPEN_COLOR.to_string(),
            cancelled: CANCELLED_COLOR.to_string(),
            closed: CLOSED_COLOR.to_string(),
            system: SYSTEM_COLOR.to_string(),
        }
    }
}

impl StatusPalette {
    /// Decode a tab color into a status
    pub fn status_of(&self, tab_color: Option<&str>) -> Status {
        let color = match tab_color.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Status::Unclassified,
        };
        [
            (&self.open, Status::Open),
            (&self.cancelled, Status::Cancelled),
            (&self.closed, Status::Closed),
            (&self.system, Status::System),
        ]
        .into_iter()
        .find(|(managed, _)| managed.eq_ignore_ascii_case(color))
        .map_or(Status::Unclassified, |(_, status)| status)
    }

    /// Encode a status as the tab color to write. `None` clears the color.
    pub fn color_of(&self, status: Status) -> Option<&str> {
        match status {
            Status::Open => Some(&self.open),
            Status::Cancelled => Some(&self.cancelled),
            Status::Closed => Some(&self.closed),
            Status::System => Some(&self.system),
            Status::Unclassified => None,
        }
    }
}
