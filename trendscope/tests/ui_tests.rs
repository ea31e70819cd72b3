//! UI tests using iced_test Simulator.
//!
//! These tests verify the UI behavior without needing a running backend.

use std::time::Duration;

use chrono::NaiveDate;
use iced_test::simulator;

use trendscope::demo::DemoSource;
use trendscope::message::{Board, Message, Page};
use trendscope::view::dashboard::{DashboardState, FETCH_FAILED, dashboard_view};
use trendscope::view::financials::{FinancialsState, financials_view};
use trendscope::view::nav_bar;
use trendscope::{App, DataSource};
use trendscope_common::{AppConfig, DatasetEndpoint, LoadState, SeriesCatalog, TimeRange};

fn catalog() -> SeriesCatalog {
    SeriesCatalog::new(
        ["Los Angeles, CA", "New York, NY", "Newark, NJ", "Chicago, IL"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}

fn housing() -> DashboardState {
    DashboardState::new(Board::Housing, 8, Duration::from_millis(300))
}

/// An empty dashboard asks for a selection.
#[test]
fn test_dashboard_empty() {
    let state = housing();
    let mut ui = simulator(dashboard_view(&state, None));

    assert!(ui.find("Select at least one city.").is_ok());
    assert!(ui.find("Mean List Price").is_ok());
    assert!(ui.find("For-Sale Inventory").is_ok());
    assert!(ui.find("Select a city to display data.").is_ok());
}

/// Selected series are listed as chips.
#[test]
fn test_dashboard_shows_selection() {
    let mut state = housing();
    state.selector.select("Chicago, IL");

    let mut ui = simulator(dashboard_view(&state, None));
    assert!(ui.find("Chicago, IL").is_ok());
    assert!(ui.find("Select at least one city.").is_err());
}

/// The capacity message replaces the empty-selection message.
#[test]
fn test_dashboard_at_capacity() {
    let mut state = DashboardState::new(Board::Trends, 2, Duration::from_millis(300));
    state.selector.select("Chicago, IL");
    state.selector.select("Newark, NJ");

    let mut ui = simulator(dashboard_view(&state, None));
    assert!(ui.find("Maximum of 2 cities allowed.").is_ok());
}

/// Fetch and catalog failures show their generic messages.
#[test]
fn test_dashboard_errors() {
    let mut state = housing();
    state.load = LoadState::Failed(FETCH_FAILED.to_string());

    let mut ui = simulator(dashboard_view(&state, Some("Could not load city data.")));
    assert!(ui.find("Failed to load chart data.").is_ok());
    assert!(ui.find("Could not load city data.").is_ok());
}

/// Clicking a candidate selects it.
#[test]
fn test_candidate_click() {
    let mut state = DashboardState::new(Board::Trends, 5, Duration::from_millis(300));
    state.selector.set_search("new".to_string(), &catalog());

    let mut ui = simulator(dashboard_view(&state, None));
    assert!(ui.find("New York, NY").is_ok());

    let _ = ui.click("Newark, NJ");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::SelectSeries(Board::Trends, name) if name == "Newark, NJ"
    )));
}

/// Range buttons target their own chart.
#[test]
fn test_range_button_click() {
    let state = housing();
    let mut ui = simulator(dashboard_view(&state, None));

    let _ = ui.click("1Y");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::SetTimeRange {
            board: Board::Housing,
            endpoint: DatasetEndpoint::Price,
            range: TimeRange::OneYear,
        }
    )));
}

/// The navigation bar switches pages.
#[test]
fn test_nav_bar() {
    let mut ui = simulator(nav_bar(Page::Housing));
    assert!(ui.find("City Trends").is_ok());

    let _ = ui.click("Financials");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::Navigate(Page::Financials)))
    );
}

/// The financials toggle names the kind it switches to.
#[test]
fn test_financials_toggle() {
    let mut state = FinancialsState::default();
    let mut ui = simulator(financials_view(&state));
    assert!(ui.find("No financial data.").is_ok());

    let _ = ui.click("Switch to Bar Chart");
    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::ToggleChartKind)));

    state.toggle_kind();
    let mut ui = simulator(financials_view(&state));
    assert!(ui.find("Switch to Line Chart").is_ok());
}

/// The whole application renders the navigation bar and the housing page.
#[test]
fn test_app_view() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let source = DataSource::Demo(DemoSource::new(3, today).with_latency(Duration::ZERO));
    let mut app = App::new(AppConfig::default(), source).with_today(today);

    let mut ui = simulator(app.view());
    assert!(ui.find("Housing").is_ok());
    assert!(ui.find("Mean List Price").is_ok());
    drop(ui);

    let _ = app.update(Message::Navigate(Page::Trends));
    assert_eq!(app.title(), "TrendScope - City Trends");
    let mut ui = simulator(app.view());
    assert!(ui.find("City Trends").is_ok());
}
