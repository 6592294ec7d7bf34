use std::borrow::Cow;

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "…";

/// Single line of plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<'a> {
    /// Text to display
    pub text: Cow<'a, str>,
    /// Style for the text
    pub style: Style,
}

impl<'a> Label<'a> {
    /// Create a new label
    pub fn new<T: Into<Cow<'a, str>>>(text: T) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    /// Set the style for the label
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for Label<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text = fit_to_width(&self.text, area.width as usize);
        buf.set_stringn(area.x, area.y, text, area.width as usize, self.style);
    }
}

/// Shorten `text` to at most `width` columns, ending in an ellipsis when anything was cut.
///
/// Cuts only between grapheme clusters.
pub fn fit_to_width(text: &str, width: usize) -> Cow<'_, str> {
    if text.width() <= width {
        return Cow::Borrowed(text);
    }
    if width == 0 {
        return Cow::Borrowed("");
    }

    let budget = width - ELLIPSIS.width();
    let mut fitted = String::new();
    let mut used = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_width = grapheme.width();
        if used + grapheme_width > budget {
            break;
        }
        fitted.push_str(grapheme);
        used += grapheme_width;
    }

    fitted.push_str(ELLIPSIS);
    Cow::Owned(fitted)
}
