use trendscope_common::{
    DatasetEndpoint, NavKey, RequestId, SeriesCatalog, TimeRange, TimeSeriesDataset,
};

/// Messages for the TrendScope application.
#[derive(Debug, Clone)]
pub enum Message {
    /// User switched pages from the navigation bar.
    Navigate(Page),

    /// Series catalog fetched on startup.
    CatalogLoaded(Result<SeriesCatalog, String>),

    /// Search box text changed.
    SearchChanged(Board, String),

    /// Arrow/Enter/Escape pressed while a dropdown may be open.
    NavKeyPressed(NavKey),

    /// User picked a candidate from the dropdown.
    SelectSeries(Board, String),

    /// User removed a selected series.
    RemoveSeries(Board, String),

    /// Debounce timer fired for the given generation.
    DebounceElapsed(Board, u64),

    /// A fetch cycle completed.
    DatasetsLoaded {
        board: Board,
        request: RequestId,
        result: Result<Vec<TimeSeriesDataset>, String>,
    },

    /// User picked a time range for one chart.
    SetTimeRange {
        board: Board,
        endpoint: DatasetEndpoint,
        range: TimeRange,
    },

    /// Financial records fetched.
    FinancialsLoaded(Result<TimeSeriesDataset, String>),

    /// Switch the financials chart between line and bar.
    ToggleChartKind,

    /// Close the active page's candidate dropdown without selecting.
    DismissCandidates,
}

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Housing,
    Trends,
    Financials,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Housing, Page::Trends, Page::Financials];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Housing => "Housing",
            Page::Trends => "City Trends",
            Page::Financials => "Financials",
        }
    }

    /// The selector dashboard shown on this page, if any.
    pub fn board(&self) -> Option<Board> {
        match self {
            Page::Housing => Some(Board::Housing),
            Page::Trends => Some(Board::Trends),
            Page::Financials => None,
        }
    }
}

/// Dashboards driven by a series selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Board {
    /// Price and inventory charts.
    Housing,
    /// Single city trend chart.
    Trends,
}

impl Board {
    /// Endpoints fetched for this dashboard, in display order.
    pub fn endpoints(&self) -> &'static [DatasetEndpoint] {
        match self {
            Board::Housing => &[DatasetEndpoint::Price, DatasetEndpoint::Inventory],
            Board::Trends => &[DatasetEndpoint::City],
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::Housing => write!(f, "housing"),
            Board::Trends => write!(f, "trends"),
        }
    }
}
