#[cfg(test)]
mod tests {
    use super::super::section_header::{
        SectionHeader, SectionHeaderState, SectionHeaderView, DEFAULT_HEADER_BACKGROUND,
    };
    use crate::theme::{Theme, ThemeContext};
    use pretty_assertions::assert_eq;
    use ratatui::{
        buffer::Buffer,
        layout::Rect,
        style::{Color, Style},
        widgets::{StatefulWidget, Widget},
    };

    fn background_at(buf: &Buffer, x: u16, y: u16) -> Color {
        buf[(x, y)].bg
    }

    #[test]
    fn test_default_background_without_theme() {
        let view = SectionHeader::new("Members").view();
        assert_eq!(view.text, "Members");
        assert_eq!(view.style, Style::default().bg(DEFAULT_HEADER_BACKGROUND));
    }

    #[test]
    fn test_theme_background_wins() {
        let _scope = ThemeContext::provide(Theme::default().with_background(Color::Blue));
        let view = SectionHeader::new("Members").view();
        assert_eq!(view.style, Style::default().bg(Color::Blue));
    }

    #[test]
    fn test_render_pads_text_on_background() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);

        ThemeContext::scoped(Theme::default().with_background(Color::Red), || {
            Widget::render(SectionHeader::new("Online"), area, &mut buf);
        });

        let mut expected = Buffer::with_lines([" Online     "]);
        expected.set_style(area, Style::default().bg(Color::Red));
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_render_truncates_long_text() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        Widget::render(SectionHeader::new("Recently active"), area, &mut buf);

        let mut expected = Buffer::with_lines([" Recen… "]);
        expected.set_style(area, Style::default().bg(DEFAULT_HEADER_BACKGROUND));
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_view_is_reused_for_equal_inputs() {
        let mut state = SectionHeaderState::new();
        let area = Rect::new(0, 0, 10, 1);

        let mut first = Buffer::empty(area);
        StatefulWidget::render(SectionHeader::new("Offline"), area, &mut first, &mut state);
        let mut second = Buffer::empty(area);
        StatefulWidget::render(SectionHeader::new("Offline"), area, &mut second, &mut state);

        assert_eq!(state.computations(), 1);
        assert_eq!(first, second);

        let cached = state.view("Offline", None) as *const SectionHeaderView;
        let again = state.view("Offline", None) as *const SectionHeaderView;
        assert_eq!(cached, again);
        assert_eq!(state.computations(), 1);
    }

    #[test]
    fn test_view_recomputed_when_theme_or_text_changes() {
        let mut state = SectionHeaderState::new();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);

        StatefulWidget::render(SectionHeader::new("Offline"), area, &mut buf, &mut state);
        assert_eq!(background_at(&buf, 0, 0), DEFAULT_HEADER_BACKGROUND);

        ThemeContext::scoped(Theme::default().with_background(Color::Green), || {
            StatefulWidget::render(SectionHeader::new("Offline"), area, &mut buf, &mut state);
        });
        assert_eq!(state.computations(), 2);
        assert_eq!(background_at(&buf, 9, 0), Color::Green);

        StatefulWidget::render(SectionHeader::new("Idle"), area, &mut buf, &mut state);
        assert_eq!(state.computations(), 3);
        assert_eq!(background_at(&buf, 0, 0), DEFAULT_HEADER_BACKGROUND);
    }

    #[test]
    fn test_zero_area_is_untouched() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        Widget::render(SectionHeader::new("Members"), Rect::new(0, 0, 0, 0), &mut buf);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 4, 1)));
    }
}
