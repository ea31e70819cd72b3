//! View components for the TrendScope application.

pub mod chart;
pub mod dashboard;
pub mod financials;
pub mod formatting;
pub mod selector;
pub mod theme;

use iced::widget::{Row, button, text};
use iced::{Element, Length};

use crate::message::{Message, Page};

/// Navigation bar across the top of the window.
pub fn nav_bar(current: Page) -> Element<'static, Message> {
    let buttons = Page::ALL.iter().map(|&page| {
        let btn = button(text(page.label()).size(14)).on_press(Message::Navigate(page));
        let btn = if page == current {
            btn.style(iced::widget::button::primary)
        } else {
            btn.style(iced::widget::button::secondary)
        };
        btn.into()
    });

    Row::with_children(buttons)
        .spacing(8)
        .padding(10)
        .width(Length::Fill)
        .into()
}
