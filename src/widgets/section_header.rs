use std::borrow::Cow;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{StatefulWidget, Widget},
};

use super::label::Label;
use super::memo::Memo;
use super::style::merge_styles;
use crate::theme::ThemeContext;

/// Header background when no theme sets one
pub const DEFAULT_HEADER_BACKGROUND: Color = Color::Rgb(127, 127, 127);

/// Horizontal padding inside the header, in cells
const PADDING: u16 = 1;

/// What a section header draws, computed from its text and the ambient background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaderView {
    /// Header text
    pub text: String,
    /// Container style, including the background
    pub style: Style,
}

impl SectionHeaderView {
    /// Compute the view for `text` on top of an optional themed background
    pub fn compute(text: &str, background: Option<Color>) -> Self {
        Self {
            text: text.to_string(),
            style: merge_styles([
                Some(Style::default().bg(DEFAULT_HEADER_BACKGROUND)),
                background.map(|color| Style::default().bg(color)),
            ]),
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        buf.set_style(area, self.style);

        let inner = Rect {
            x: area.x.saturating_add(PADDING),
            width: area.width.saturating_sub(PADDING * 2),
            height: 1,
            ..area
        };
        Label::new(self.text.as_str()).style(self.style).render(inner, buf);
    }
}

/// Memoized view for a [`SectionHeader`]
#[derive(Debug, Default)]
pub struct SectionHeaderState {
    memo: Memo<(String, Option<Color>), SectionHeaderView>,
}

impl SectionHeaderState {
    /// Create a new header state
    pub fn new() -> Self {
        Self::default()
    }

    /// The view for `text` and `background`, reused if both match the previous draw
    pub fn view(&mut self, text: &str, background: Option<Color>) -> &SectionHeaderView {
        self.memo.get_or_compute((text.to_string(), background), |(text, background)| {
            SectionHeaderView::compute(text, *background)
        })
    }

    /// How many times the view has been computed
    pub fn computations(&self) -> usize {
        self.memo.computations()
    }
}

/// Section title on a themed background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader<'a> {
    /// Header text
    pub text: Cow<'a, str>,
}

impl<'a> SectionHeader<'a> {
    /// Create a new section header
    pub fn new<T: Into<Cow<'a, str>>>(text: T) -> Self {
        Self { text: text.into() }
    }

    /// Compute the view against the currently bound theme
    pub fn view(&self) -> SectionHeaderView {
        SectionHeaderView::compute(&self.text, ThemeContext::select(|styles| styles.background_color))
    }
}

impl Widget for SectionHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.view().draw(area, buf);
    }
}

impl StatefulWidget for SectionHeader<'_> {
    type State = SectionHeaderState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let background = ThemeContext::select(|styles| styles.background_color);
        state.view(&self.text, background).draw(area, buf);
    }
}
