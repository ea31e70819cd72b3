//! Series selector: search box, candidate dropdown, and selected chips.

use iced::widget::{Column, Row, button, container, row, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use trendscope_common::{CandidateList, NavKey, SelectOutcome, Selection, SeriesCatalog};

use super::theme::ThemeColors;
use crate::message::{Board, Message};

/// State of one selector widget.
#[derive(Debug, Clone)]
pub struct SelectorState {
    pub selection: Selection,
    pub search: String,
    pub candidates: CandidateList,
}

impl SelectorState {
    pub fn new(max: usize) -> Self {
        Self {
            selection: Selection::new(max),
            search: String::new(),
            candidates: CandidateList::default(),
        }
    }

    /// Update the search term and rebuild the dropdown.
    pub fn set_search(&mut self, term: String, catalog: &SeriesCatalog) {
        self.candidates.refresh(&self.selection, catalog, &term);
        self.search = term;
    }

    /// Select `name`, clearing the search box either way.
    pub fn select(&mut self, name: &str) -> SelectOutcome {
        let outcome = self.selection.select(name);
        self.search.clear();
        self.candidates.reset();
        outcome
    }

    /// Remove `name`; an open dropdown is rebuilt so it can offer it again.
    pub fn remove(&mut self, name: &str, catalog: &SeriesCatalog) -> bool {
        let removed = self.selection.remove(name);
        if removed && !self.search.is_empty() {
            self.candidates.refresh(&self.selection, catalog, &self.search);
        }
        removed
    }

    /// Apply a dropdown key. Returns the name Enter chose.
    pub fn navigate(&mut self, key: NavKey) -> Option<String> {
        if !self.candidates.is_visible() {
            return None;
        }
        self.candidates.navigate(key)
    }
}

/// Render the selector for `board`.
pub fn selector_view(board: Board, state: &SelectorState) -> Element<'_, Message> {
    let mut input = text_input("Search cities...", &state.search)
        .padding(8)
        .width(Length::Fixed(320.0));
    if !state.selection.is_full() {
        input = input
            .on_input(move |term| Message::SearchChanged(board, term))
            .on_submit(Message::NavKeyPressed(NavKey::Enter));
    }

    let mut content = Column::new().spacing(6).push(input);

    if state.candidates.is_visible() {
        content = content.push(render_candidates(board, &state.candidates));
    }

    if let Some(message) = state.selection.validation_message() {
        content = content.push(text(message).size(12).style(|theme: &Theme| text::Style {
            color: Some(ThemeColors::new(theme).danger()),
        }));
    }

    content = content.push(render_chips(board, &state.selection));
    content.into()
}

fn render_candidates(board: Board, candidates: &CandidateList) -> Element<'_, Message> {
    let items = candidates.items().iter().enumerate().map(|(i, name)| {
        let style: fn(&Theme, iced::widget::button::Status) -> iced::widget::button::Style =
            if candidates.highlighted() == Some(i) {
                iced::widget::button::primary
            } else {
                iced::widget::button::text
            };
        button(text(name.as_str()).size(14))
            .on_press(Message::SelectSeries(board, name.clone()))
            .width(Length::Fill)
            .style(style)
            .into()
    });

    container(Column::with_children(items).spacing(2))
        .width(Length::Fixed(320.0))
        .padding(4)
        .style(container::rounded_box)
        .into()
}

fn render_chips(board: Board, selection: &Selection) -> Element<'_, Message> {
    let chips = selection.names().iter().map(|name| {
        container(
            row![
                text(name.as_str()).size(13),
                button(text("×").size(13))
                    .on_press(Message::RemoveSeries(board, name.clone()))
                    .padding([0, 6])
                    .style(iced::widget::button::text),
            ]
            .spacing(4)
            .align_y(Alignment::Center),
        )
        .padding([2, 8])
        .style(container::rounded_box)
        .into()
    });

    Row::with_children(chips).spacing(6).wrap().into()
}
