//! TrendScope Iced application.
//!
//! [`App`] is the single owner of UI state: the catalog, both selector
//! dashboards, the financials page and the active page. Every async result
//! comes back through [`App::update`] as a [`Message`].

use chrono::NaiveDate;
use iced::event;
use iced::keyboard::{self, key::Named};
use iced::mouse;
use iced::widget::{column, rule};
use iced::{Element, Event, Subscription, Task, Theme};
use std::time::Duration;

use trendscope_common::{AppConfig, LoadState, NavKey, SelectOutcome, SeriesCatalog};

use crate::message::{Board, Message, Page};
use crate::source::DataSource;
use crate::view::dashboard::{DashboardState, FETCH_FAILED, dashboard_view};
use crate::view::financials::{FinancialsState, financials_view};
use crate::view::nav_bar;

/// Shown when the catalog request fails.
pub const CATALOG_FAILED: &str = "Could not load city data.";

/// Shown when the financial records request fails.
pub const FINANCIALS_FAILED: &str = "Failed to load financial data.";

/// The main TrendScope application.
pub struct App {
    config: AppConfig,
    source: DataSource,
    catalog: SeriesCatalog,
    catalog_error: Option<String>,
    housing: DashboardState,
    trends: DashboardState,
    financials: FinancialsState,
    page: Page,
    /// Fixed reference date for time-range filtering; the calendar date otherwise.
    pinned_today: Option<NaiveDate>,
}

impl App {
    /// Create the application without starting any requests.
    pub fn new(config: AppConfig, source: DataSource) -> Self {
        let debounce = Duration::from_millis(config.dashboard.debounce_ms);
        Self {
            housing: DashboardState::new(
                Board::Housing,
                config.dashboard.housing_max_series,
                debounce,
            ),
            trends: DashboardState::new(
                Board::Trends,
                config.dashboard.trends_max_series,
                debounce,
            ),
            financials: FinancialsState::default(),
            catalog: SeriesCatalog::default(),
            catalog_error: None,
            page: Page::default(),
            config,
            source,
            pinned_today: None,
        }
    }

    /// Filter time ranges against `today` instead of the calendar date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.pinned_today = Some(today);
        self
    }

    /// Reference date for time-range filtering, read on every use.
    pub fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(trendscope_common::today)
    }

    /// Boot the application (called by iced::application). Loads the catalog.
    pub fn boot(config: AppConfig, source: DataSource) -> (Self, Task<Message>) {
        tracing::info!(source = %source.describe(), "Booting TrendScope");
        let app = Self::new(config, source);
        let task = Task::perform(app.source.clone().catalog(), |result| {
            Message::CatalogLoaded(result.map_err(|e| e.to_string()))
        });
        (app, task)
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        format!("TrendScope - {}", self.page.label())
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }

    pub fn dashboard(&self, board: Board) -> &DashboardState {
        match board {
            Board::Housing => &self.housing,
            Board::Trends => &self.trends,
        }
    }

    pub fn financials(&self) -> &FinancialsState {
        &self.financials
    }

    /// Split borrow of one dashboard plus the catalog.
    fn board_mut(&mut self, board: Board) -> (&mut DashboardState, &SeriesCatalog) {
        let dashboard = match board {
            Board::Housing => &mut self.housing,
            Board::Trends => &mut self.trends,
        };
        (dashboard, &self.catalog)
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(page) => return self.navigate(page),

            Message::CatalogLoaded(Ok(catalog)) => {
                tracing::info!(count = catalog.len(), "Loaded series catalog");
                self.catalog = catalog;
                self.catalog_error = None;
                return self.apply_default_selection();
            }

            Message::CatalogLoaded(Err(error)) => {
                tracing::error!(error = %error, "Failed to load series catalog");
                self.catalog_error = Some(CATALOG_FAILED.to_string());
            }

            Message::SearchChanged(board, term) => {
                let (dashboard, catalog) = self.board_mut(board);
                dashboard.selector.set_search(term, catalog);
            }

            Message::NavKeyPressed(key) => {
                let Some(board) = self.page.board() else {
                    return Task::none();
                };
                let (dashboard, _) = self.board_mut(board);
                if let Some(name) = dashboard.selector.navigate(key) {
                    return self.select(board, &name);
                }
            }

            Message::SelectSeries(board, name) => return self.select(board, &name),

            Message::RemoveSeries(board, name) => {
                let (dashboard, catalog) = self.board_mut(board);
                if dashboard.selector.remove(&name, catalog) {
                    tracing::info!(board = %board, series = %name, "Removed series");
                    return self.schedule_fetch(board);
                }
            }

            Message::DebounceElapsed(board, generation) => {
                if self.dashboard(board).debouncer.is_current(generation) {
                    return self.start_fetch(board);
                }
                tracing::trace!(board = %board, generation, "Superseded debounce timer");
            }

            Message::DatasetsLoaded {
                board,
                request,
                result,
            } => {
                let today = self.today();
                let (dashboard, _) = self.board_mut(board);
                if !dashboard.tracker.is_latest(request) {
                    tracing::debug!(board = %board, request_id = %request, "Discarding stale response");
                    return Task::none();
                }

                match result {
                    Ok(datasets) => {
                        tracing::debug!(board = %board, request_id = %request, "Rendering charts");
                        dashboard.install(datasets, today);
                    }
                    Err(error) => {
                        tracing::error!(board = %board, request_id = %request, error = %error, "Failed to load chart data");
                        dashboard.load = LoadState::Failed(FETCH_FAILED.to_string());
                    }
                }
            }

            Message::SetTimeRange {
                board,
                endpoint,
                range,
            } => {
                let today = self.today();
                let (dashboard, _) = self.board_mut(board);
                if let Some(panel) = dashboard.panel_mut(endpoint) {
                    if panel.set_range(range, today) {
                        tracing::debug!(board = %board, endpoint = %endpoint, range = %range, "Changed time range");
                    }
                }
            }

            Message::FinancialsLoaded(Ok(data)) => {
                tracing::info!(points = data.len(), "Loaded financial records");
                self.financials.install(data);
            }

            Message::FinancialsLoaded(Err(error)) => {
                tracing::error!(error = %error, "Failed to load financial records");
                self.financials.fail(FINANCIALS_FAILED.to_string());
            }

            Message::ToggleChartKind => {
                self.financials.toggle_kind();
            }

            Message::DismissCandidates => {
                if let Some(board) = self.page.board() {
                    let (dashboard, _) = self.board_mut(board);
                    dashboard.selector.candidates.hide();
                }
            }
        }

        Task::none()
    }

    /// Keyboard events for dropdown navigation, and clicks that close it.
    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|ev, status, _window| match ev {
            // Widgets inside the selector capture their own presses.
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
                if status == event::Status::Ignored =>
            {
                Some(Message::DismissCandidates)
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(named),
                ..
            }) => {
                let key = match named {
                    Named::ArrowDown => NavKey::Down,
                    Named::ArrowUp => NavKey::Up,
                    Named::Escape => NavKey::Escape,
                    // A focused search box reports Enter through on_submit.
                    Named::Enter if status == event::Status::Ignored => NavKey::Enter,
                    _ => return None,
                };
                Some(Message::NavKeyPressed(key))
            }
            _ => None,
        })
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        let page = match self.page {
            Page::Housing => dashboard_view(&self.housing, self.catalog_error()),
            Page::Trends => dashboard_view(&self.trends, self.catalog_error()),
            Page::Financials => financials_view(&self.financials),
        };

        column![nav_bar(self.page), rule::horizontal(1), page].into()
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn navigate(&mut self, page: Page) -> Task<Message> {
        self.page = page;
        if page == Page::Financials && self.financials.begin_load() {
            tracing::info!("Fetching financial records");
            return Task::perform(self.source.clone().financials(), |result| {
                Message::FinancialsLoaded(result.map_err(|e| e.to_string()))
            });
        }
        Task::none()
    }

    /// Pre-select the configured defaults that exist, then fetch right away.
    fn apply_default_selection(&mut self) -> Task<Message> {
        let defaults = self.config.dashboard.default_selection.clone();
        let mut tasks = Vec::new();

        for board in [Board::Housing, Board::Trends] {
            let (dashboard, catalog) = self.board_mut(board);
            for name in defaults.iter().filter(|n| catalog.contains(n)) {
                dashboard.selector.selection.select(name);
            }
            if !dashboard.selector.selection.is_empty() {
                tasks.push(self.start_fetch(board));
            }
        }

        Task::batch(tasks)
    }

    fn select(&mut self, board: Board, name: &str) -> Task<Message> {
        let (dashboard, _) = self.board_mut(board);
        match dashboard.selector.select(name) {
            SelectOutcome::Added => {
                tracing::info!(board = %board, series = %name, "Selected series");
                self.schedule_fetch(board)
            }
            SelectOutcome::AlreadySelected => {
                tracing::debug!(board = %board, series = %name, "Series already selected");
                Task::none()
            }
            SelectOutcome::AtCapacity => {
                tracing::warn!(board = %board, series = %name, "Selection is full");
                Task::none()
            }
        }
    }

    /// Restart the debounce window after a selection change.
    ///
    /// Responses still in flight belong to the old selection and are dropped.
    /// An emptied selection clears the charts immediately instead.
    fn schedule_fetch(&mut self, board: Board) -> Task<Message> {
        let (dashboard, _) = self.board_mut(board);
        let generation = dashboard.debouncer.trigger();
        dashboard.tracker.invalidate();

        if dashboard.selector.selection.is_empty() {
            dashboard.clear_charts();
            return Task::none();
        }

        let window = dashboard.debouncer.window();
        Task::perform(async move { tokio::time::sleep(window).await }, move |_| {
            Message::DebounceElapsed(board, generation)
        })
    }

    /// Issue a new request id and fetch every endpoint of `board`.
    fn start_fetch(&mut self, board: Board) -> Task<Message> {
        let source = self.source.clone();
        let (dashboard, _) = self.board_mut(board);

        if dashboard.selector.selection.is_empty() {
            dashboard.clear_charts();
            return Task::none();
        }

        let request = dashboard.tracker.issue();
        dashboard.load = LoadState::Loading;
        let selection = dashboard.selector.selection.names().to_vec();
        tracing::debug!(board = %board, request_id = %request, series = selection.len(), "Fetching chart data");

        Task::perform(
            source.datasets(board.endpoints().to_vec(), selection),
            move |result| Message::DatasetsLoaded {
                board,
                request,
                result: result.map_err(|e| e.to_string()),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoSource;
    use trendscope_common::{DatasetEndpoint, RequestId, TimeRange};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn app() -> App {
        let source = DataSource::Demo(DemoSource::new(1, today()).with_latency(Duration::ZERO));
        App::new(AppConfig::default(), source).with_today(today())
    }

    fn loaded_app() -> App {
        let mut app = app();
        let DataSource::Demo(demo) = &app.source else {
            unreachable!()
        };
        let catalog = demo.catalog();
        let _ = app.update(Message::CatalogLoaded(Ok(catalog)));
        app
    }

    #[test]
    fn test_default_selection_applied() {
        let app = loaded_app();
        let names = app.dashboard(Board::Housing).selector.selection.names();
        assert_eq!(names, &["Los Angeles, CA".to_string(), "New York, NY".to_string()][..]);
        assert!(app.dashboard(Board::Trends).load.is_loading());
    }

    #[test]
    fn test_catalog_failure_message() {
        let mut app = app();
        let _ = app.update(Message::CatalogLoaded(Err("connection refused".into())));
        assert_eq!(app.catalog_error(), Some(CATALOG_FAILED));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut app = loaded_app();
        let data = DemoSource::new(1, today())
            .dataset(DatasetEndpoint::City, &["Austin, TX".to_string()])
            .unwrap();

        // The default selection issued request #1; a later fetch supersedes it.
        let _ = app.update(Message::SelectSeries(Board::Trends, "Austin, TX".into()));
        let generation = app.dashboard(Board::Trends).debouncer.generation();
        let _ = app.update(Message::DebounceElapsed(Board::Trends, generation));
        let current = app.dashboard(Board::Trends).tracker.latest();

        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request: RequestId(1),
            result: Ok(vec![data.clone()]),
        });
        assert!(app.dashboard(Board::Trends).panels[0].slot.is_empty());

        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request: current,
            result: Ok(vec![data]),
        });
        let panel = &app.dashboard(Board::Trends).panels[0];
        assert_eq!(panel.slot.created(), 1);
        assert_eq!(app.dashboard(Board::Trends).load, LoadState::Loaded);
    }

    #[test]
    fn test_fetch_failure_keeps_previous_charts() {
        let mut app = loaded_app();
        let data = DemoSource::new(1, today())
            .dataset(DatasetEndpoint::City, &["Austin, TX".to_string()])
            .unwrap();
        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request: RequestId(1),
            result: Ok(vec![data]),
        });

        let _ = app.update(Message::SelectSeries(Board::Trends, "Miami, FL".into()));
        let generation = app.dashboard(Board::Trends).debouncer.generation();
        let _ = app.update(Message::DebounceElapsed(Board::Trends, generation));
        let request = app.dashboard(Board::Trends).tracker.latest();
        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request,
            result: Err("HTTP 500".into()),
        });

        let dashboard = app.dashboard(Board::Trends);
        assert_eq!(dashboard.load.error(), Some(FETCH_FAILED));
        assert!(!dashboard.panels[0].slot.is_empty());
    }

    #[test]
    fn test_superseded_debounce_does_not_fetch() {
        let mut app = loaded_app();
        let _ = app.update(Message::SelectSeries(Board::Housing, "Austin, TX".into()));
        let first = app.dashboard(Board::Housing).debouncer.generation();
        let _ = app.update(Message::SelectSeries(Board::Housing, "Miami, FL".into()));
        let before = app.dashboard(Board::Housing).tracker.latest();

        let _ = app.update(Message::DebounceElapsed(Board::Housing, first));
        assert_eq!(app.dashboard(Board::Housing).tracker.latest(), before);
    }

    #[test]
    fn test_reselect_drops_in_flight_response() {
        let mut app = loaded_app();
        let _ = app.update(Message::SelectSeries(Board::Trends, "Austin, TX".into()));
        let generation = app.dashboard(Board::Trends).debouncer.generation();
        let _ = app.update(Message::DebounceElapsed(Board::Trends, generation));
        let in_flight = app.dashboard(Board::Trends).tracker.latest();

        // Changing the selection again before that response lands.
        let _ = app.update(Message::SelectSeries(Board::Trends, "Miami, FL".into()));
        let old_selection = [
            "Los Angeles, CA".to_string(),
            "New York, NY".to_string(),
            "Austin, TX".to_string(),
        ];
        let data = DemoSource::new(1, today())
            .dataset(DatasetEndpoint::City, &old_selection)
            .unwrap();
        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request: in_flight,
            result: Ok(vec![data]),
        });

        let dashboard = app.dashboard(Board::Trends);
        assert!(dashboard.panels[0].slot.is_empty());
        assert_ne!(dashboard.load, LoadState::Loaded);
        assert!(dashboard.selector.selection.contains("Miami, FL"));
    }

    #[test]
    fn test_dismiss_hides_active_dropdown() {
        let mut app = loaded_app();
        let _ = app.update(Message::SearchChanged(Board::Housing, "aus".into()));
        let _ = app.update(Message::SearchChanged(Board::Trends, "aus".into()));

        let _ = app.update(Message::DismissCandidates);
        assert!(!app.dashboard(Board::Housing).selector.candidates.is_visible());
        assert!(app.dashboard(Board::Trends).selector.candidates.is_visible());

        let _ = app.update(Message::NavKeyPressed(NavKey::Enter));
        assert!(!app.dashboard(Board::Housing).selector.selection.contains("Austin, TX"));
    }

    #[test]
    fn test_reference_date_follows_calendar() {
        let source = DataSource::Demo(DemoSource::new(1, today()));
        let live = App::new(AppConfig::default(), source);
        assert_eq!(live.today(), trendscope_common::today());
        assert_eq!(app().today(), today());
    }

    #[test]
    fn test_removing_everything_clears_charts() {
        let mut app = loaded_app();
        let data = DemoSource::new(1, today())
            .dataset(DatasetEndpoint::City, &["Los Angeles, CA".to_string()])
            .unwrap();
        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Trends,
            request: RequestId(1),
            result: Ok(vec![data]),
        });

        let _ = app.update(Message::RemoveSeries(Board::Trends, "Los Angeles, CA".into()));
        let _ = app.update(Message::RemoveSeries(Board::Trends, "New York, NY".into()));

        let dashboard = app.dashboard(Board::Trends);
        assert!(dashboard.panels[0].slot.is_empty());
        assert!(dashboard.panels[0].full().is_none());
        assert!(!dashboard.tracker.is_latest(RequestId(1)));
    }

    #[test]
    fn test_keyboard_select_on_active_page() {
        let mut app = loaded_app();
        let _ = app.update(Message::SearchChanged(Board::Housing, "aus".into()));
        let _ = app.update(Message::NavKeyPressed(NavKey::Down));
        let _ = app.update(Message::NavKeyPressed(NavKey::Enter));

        let selector = &app.dashboard(Board::Housing).selector;
        assert!(selector.selection.contains("Austin, TX"));
        assert!(selector.search.is_empty());
    }

    #[test]
    fn test_time_range_per_chart() {
        let mut app = loaded_app();
        let demo = DemoSource::new(1, today());
        let selection = ["Los Angeles, CA".to_string()];
        let datasets = vec![
            demo.dataset(DatasetEndpoint::Price, &selection).unwrap(),
            demo.dataset(DatasetEndpoint::Inventory, &selection).unwrap(),
        ];
        let _ = app.update(Message::DatasetsLoaded {
            board: Board::Housing,
            request: RequestId(1),
            result: Ok(datasets),
        });

        let _ = app.update(Message::SetTimeRange {
            board: Board::Housing,
            endpoint: DatasetEndpoint::Price,
            range: TimeRange::OneYear,
        });

        let dashboard = app.dashboard(Board::Housing);
        let price = dashboard.panel(DatasetEndpoint::Price).unwrap();
        let inventory = dashboard.panel(DatasetEndpoint::Inventory).unwrap();
        assert_eq!(price.slot.instance().unwrap().data().len(), 12);
        assert_eq!(inventory.slot.instance().unwrap().data().len(), 72);
        assert_eq!(inventory.range(), TimeRange::Max);
    }

    #[test]
    fn test_financials_fetched_once() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Page::Financials));
        assert!(app.financials().load.is_loading());
        let _ = app.update(Message::Navigate(Page::Housing));
        let _ = app.update(Message::Navigate(Page::Financials));
        assert!(app.financials().load.is_loading());

        let _ = app.update(Message::FinancialsLoaded(Err("timeout".into())));
        assert_eq!(app.financials().load.error(), Some(FINANCIALS_FAILED));
    }
}
