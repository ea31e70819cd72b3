//! Company financials page with a line/bar toggle.

use iced::widget::{Column, button, container, text};
use iced::{Element, Length, Theme};

use trendscope_common::{LoadState, TimeSeriesDataset};

use super::chart::{ChartKind, ChartOptions, ChartSlot, slot_view};
use super::theme::ThemeColors;
use crate::message::Message;

/// State of the financials page.
#[derive(Debug, Default)]
pub struct FinancialsState {
    kind: ChartKind,
    data: Option<TimeSeriesDataset>,
    pub slot: ChartSlot,
    pub load: LoadState,
    requested: bool,
}

impl FinancialsState {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Mark the one-time fetch as started. Returns `false` if it already was.
    pub fn begin_load(&mut self) -> bool {
        if self.requested {
            return false;
        }
        self.requested = true;
        self.load = LoadState::Loading;
        true
    }

    pub fn install(&mut self, data: TimeSeriesDataset) {
        self.slot.render(data.clone(), ChartOptions::financials(self.kind));
        self.data = Some(data);
        self.load = LoadState::Loaded;
    }

    pub fn fail(&mut self, message: String) {
        self.load = LoadState::Failed(message);
    }

    /// Flip line/bar and recreate the chart if there is data.
    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
        if let Some(data) = &self.data {
            self.slot.render(data.clone(), ChartOptions::financials(self.kind));
        }
    }
}

/// Render the financials page.
pub fn financials_view(state: &FinancialsState) -> Element<'_, Message> {
    let toggle = button(text(state.kind.toggle_label()).size(14))
        .on_press(Message::ToggleChartKind)
        .style(iced::widget::button::secondary);

    let mut content = Column::new().spacing(16).padding(20).push(toggle);

    match &state.load {
        LoadState::Loading => content = content.push(text("Loading...").size(12)),
        LoadState::Failed(message) => {
            content = content.push(text(message.as_str()).size(14).style(|theme: &Theme| {
                text::Style {
                    color: Some(ThemeColors::new(theme).danger()),
                }
            }));
        }
        LoadState::Idle | LoadState::Loaded => {}
    }

    content = content.push(slot_view(&state.slot, "No financial data."));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_common::Series;

    fn data() -> TimeSeriesDataset {
        TimeSeriesDataset::new(
            vec!["2022".into(), "2023".into()],
            vec![Series::from_values("Revenue", [394.3e9, 383.3e9])],
        )
        .unwrap()
    }

    #[test]
    fn test_loads_once() {
        let mut state = FinancialsState::default();
        assert!(state.begin_load());
        assert!(state.load.is_loading());
        assert!(!state.begin_load());
    }

    #[test]
    fn test_toggle_recreates_chart() {
        let mut state = FinancialsState::default();
        state.install(data());
        assert_eq!(state.slot.created(), 1);

        state.toggle_kind();
        assert_eq!(state.kind(), ChartKind::Bar);
        assert_eq!(state.slot.created(), 2);
        let options = state.slot.instance().unwrap().options();
        assert_eq!(options.kind, ChartKind::Bar);
        assert_eq!(options.title.as_deref(), Some("Financial and Shares Trends"));

        state.toggle_kind();
        assert_eq!(state.kind(), ChartKind::Line);
        assert_eq!(state.slot.created(), 3);
    }

    #[test]
    fn test_toggle_without_data() {
        let mut state = FinancialsState::default();
        state.toggle_kind();
        assert_eq!(state.kind(), ChartKind::Bar);
        assert!(state.slot.is_empty());
    }
}
