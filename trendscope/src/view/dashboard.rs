//! Selector-driven dashboards: the housing pair and the city trend chart.

use std::time::Duration;

use chrono::NaiveDate;
use iced::widget::{Column, Row, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use trendscope_common::{
    DatasetEndpoint, Debouncer, LoadState, RequestTracker, TimeRange, TimeSeriesDataset,
};

use super::chart::{ChartOptions, ChartSlot, slot_view};
use super::selector::{SelectorState, selector_view};
use super::theme::ThemeColors;
use crate::message::{Board, Message};

/// Generic message shown when a fetch cycle fails.
pub const FETCH_FAILED: &str = "Failed to load chart data.";

/// One chart with its own time range.
#[derive(Debug)]
pub struct ChartPanel {
    pub endpoint: DatasetEndpoint,
    range: TimeRange,
    full: Option<TimeSeriesDataset>,
    pub slot: ChartSlot,
}

impl ChartPanel {
    pub fn new(endpoint: DatasetEndpoint) -> Self {
        Self {
            endpoint,
            range: TimeRange::default(),
            full: None,
            slot: ChartSlot::new(),
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Full-length data as last fetched.
    pub fn full(&self) -> Option<&TimeSeriesDataset> {
        self.full.as_ref()
    }

    /// Keep `data` as the unfiltered copy and render it under the active range.
    pub fn install(&mut self, data: TimeSeriesDataset, today: NaiveDate) {
        let visible = self.range.apply(&data, today);
        self.full = Some(data);
        self.slot
            .render(visible, ChartOptions::for_endpoint(self.endpoint));
    }

    /// Switch the time range. Returns `false` if `range` was already active.
    pub fn set_range(&mut self, range: TimeRange, today: NaiveDate) -> bool {
        if range == self.range {
            return false;
        }
        self.range = range;
        if let Some(full) = &self.full {
            self.slot
                .render(range.apply(full, today), ChartOptions::for_endpoint(self.endpoint));
        }
        true
    }

    /// Drop the data and destroy the chart.
    pub fn clear(&mut self) {
        self.full = None;
        self.slot.clear();
    }
}

/// State for one selector-driven dashboard.
#[derive(Debug)]
pub struct DashboardState {
    pub board: Board,
    pub selector: SelectorState,
    pub panels: Vec<ChartPanel>,
    pub debouncer: Debouncer,
    pub tracker: RequestTracker,
    pub load: LoadState,
}

impl DashboardState {
    pub fn new(board: Board, max_series: usize, debounce: Duration) -> Self {
        Self {
            board,
            selector: SelectorState::new(max_series),
            panels: board.endpoints().iter().map(|&e| ChartPanel::new(e)).collect(),
            debouncer: Debouncer::new(debounce),
            tracker: RequestTracker::new(),
            load: LoadState::Idle,
        }
    }

    pub fn panel(&self, endpoint: DatasetEndpoint) -> Option<&ChartPanel> {
        self.panels.iter().find(|p| p.endpoint == endpoint)
    }

    pub fn panel_mut(&mut self, endpoint: DatasetEndpoint) -> Option<&mut ChartPanel> {
        self.panels.iter_mut().find(|p| p.endpoint == endpoint)
    }

    /// Install a complete fetch result, one dataset per panel in order.
    pub fn install(&mut self, datasets: Vec<TimeSeriesDataset>, today: NaiveDate) {
        for (panel, data) in self.panels.iter_mut().zip(datasets) {
            panel.install(data, today);
        }
        self.load = LoadState::Loaded;
    }

    /// Empty selection: destroy charts and supersede in-flight fetches.
    pub fn clear_charts(&mut self) {
        for panel in &mut self.panels {
            panel.clear();
        }
        self.tracker.invalidate();
        self.load = LoadState::Idle;
    }
}

/// Render a dashboard page.
pub fn dashboard_view<'a>(
    state: &'a DashboardState,
    catalog_error: Option<&'a str>,
) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(16)
        .padding(20)
        .push(selector_view(state.board, &state.selector));

    if let Some(error) = catalog_error {
        content = content.push(error_text(error));
    }

    match &state.load {
        LoadState::Loading => {
            content = content.push(text("Loading...").size(12));
        }
        LoadState::Failed(message) => {
            content = content.push(error_text(message));
        }
        LoadState::Idle | LoadState::Loaded => {}
    }

    for panel in &state.panels {
        content = content
            .push(rule::horizontal(1))
            .push(render_panel(state.board, panel));
    }

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn render_panel(board: Board, panel: &ChartPanel) -> Element<'_, Message> {
    let title = text(panel.endpoint.title()).size(18);

    let ranges = TimeRange::ALL.iter().map(|&range| {
        let btn = button(text(range.label()).size(12)).on_press(Message::SetTimeRange {
            board,
            endpoint: panel.endpoint,
            range,
        });
        let btn = if range == panel.range() {
            btn.style(iced::widget::button::primary)
        } else {
            btn.style(iced::widget::button::secondary)
        };
        btn.into()
    });

    let header = row![title, Row::with_children(ranges).spacing(4)]
        .spacing(20)
        .align_y(Alignment::Center);

    column![
        header,
        slot_view(&panel.slot, "Select a city to display data.")
    ]
    .spacing(8)
    .into()
}

fn error_text(message: &str) -> Element<'_, Message> {
    text(message)
        .size(14)
        .style(|theme: &Theme| text::Style {
            color: Some(ThemeColors::new(theme).danger()),
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_common::Series;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn monthly() -> TimeSeriesDataset {
        let labels: Vec<String> = (2020..=2024)
            .flat_map(|y| (1..=12).map(move |m| format!("{y}-{m:02}-15")))
            .take(54)
            .collect();
        let values: Vec<f64> = (0..labels.len()).map(|i| i as f64).collect();
        TimeSeriesDataset::new(labels, vec![Series::from_values("LA", values)]).unwrap()
    }

    #[test]
    fn test_panel_range_switch() {
        let mut panel = ChartPanel::new(DatasetEndpoint::Price);
        panel.install(monthly(), today());
        assert_eq!(panel.slot.created(), 1);
        assert_eq!(panel.slot.instance().unwrap().data().len(), 54);

        assert!(panel.set_range(TimeRange::OneYear, today()));
        assert_eq!(panel.slot.created(), 2);
        assert_eq!(panel.slot.instance().unwrap().data().labels()[0], "2023-07-15");
        assert_eq!(panel.full().map(TimeSeriesDataset::len), Some(54));
    }

    #[test]
    fn test_same_range_is_noop() {
        let mut panel = ChartPanel::new(DatasetEndpoint::Inventory);
        panel.install(monthly(), today());
        assert!(!panel.set_range(TimeRange::Max, today()));
        assert_eq!(panel.slot.created(), 1);
    }

    #[test]
    fn test_range_before_data() {
        let mut panel = ChartPanel::new(DatasetEndpoint::City);
        assert!(panel.set_range(TimeRange::TwoYears, today()));
        assert!(panel.slot.is_empty());

        panel.install(monthly(), today());
        assert_eq!(panel.slot.instance().unwrap().data().labels()[0], "2022-07-15");
    }

    #[test]
    fn test_clear_charts_invalidates_requests() {
        let mut state = DashboardState::new(Board::Housing, 8, Duration::from_millis(300));
        assert_eq!(state.panels.len(), 2);

        let request = state.tracker.issue();
        state.install(vec![monthly(), monthly()], today());
        assert_eq!(state.load, LoadState::Loaded);

        state.clear_charts();
        assert!(state.panels.iter().all(|p| p.slot.is_empty()));
        assert!(!state.tracker.is_latest(request));
    }
}
