#[cfg(test)]
mod tests {
    use super::super::label::{fit_to_width, Label};
    use super::super::style::merge_styles;
    use pretty_assertions::assert_eq;
    use ratatui::{
        buffer::Buffer,
        layout::Rect,
        style::{Color, Modifier, Style},
        widgets::Widget,
    };

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("Members", 10), "Members");
        assert_eq!(fit_to_width("Members", 7), "Members");
        assert_eq!(fit_to_width("Members", 5), "Memb…");
        assert_eq!(fit_to_width("Members", 1), "…");
        assert_eq!(fit_to_width("Members", 0), "");
    }

    #[test]
    fn test_fit_to_width_respects_wide_graphemes() {
        // Each ideograph takes two columns.
        assert_eq!(fit_to_width("日本語", 6), "日本語");
        assert_eq!(fit_to_width("日本語", 5), "日本…");
        assert_eq!(fit_to_width("日本語", 4), "日…");
        assert_eq!(fit_to_width("e\u{301}tude", 3), "e\u{301}t…");
    }

    #[test]
    fn test_label_render() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        Label::new("Hello world")
            .style(Style::default().fg(Color::Green))
            .render(area, &mut buf);

        let mut expected = Buffer::with_lines(["Hello w…"]);
        expected.set_style(area, Style::default().fg(Color::Green));
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_label_zero_area() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        Label::new("Hi").render(Rect::new(0, 0, 0, 1), &mut buf);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 4, 1)));
    }

    #[test]
    fn test_merge_styles_last_present_wins() {
        let merged = merge_styles([
            Some(Style::default().fg(Color::Gray).bg(Color::Black)),
            None,
            Some(Style::default().fg(Color::Red)),
            None,
        ]);
        assert_eq!(merged, Style::default().fg(Color::Red).bg(Color::Black));

        let merged = merge_styles([
            Some(Style::default().add_modifier(Modifier::BOLD)),
            Some(Style::default().fg(Color::Blue)),
        ]);
        assert_eq!(
            merged,
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        );

        assert_eq!(merge_styles(std::iter::empty()), Style::default());
        assert_eq!(merge_styles([None, None]), Style::default());
    }
}
