use ratatui::style::Style;

/// Merge optional style deltas left to right.
///
/// Absent entries are skipped and later values win for every attribute they set, so
/// `[inherited, Some(override)]` keeps whatever the override leaves unset.
pub fn merge_styles<I>(fragments: I) -> Style
where
    I: IntoIterator<Item = Option<Style>>,
{
    fragments
        .into_iter()
        .flatten()
        .fold(Style::default(), |merged, fragment| merged.patch(fragment))
}
