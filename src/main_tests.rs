#[cfg(test)]
mod tests {
    use super::super::name_column_width;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_column_counts_display_cells() {
        let users = vec!["@bob:example.org".to_string()];
        assert_eq!(name_column_width(&users, 48), 17);

        // Three ideographs: 9 bytes, 6 cells.
        let users = vec!["@日本語:x".to_string(), "@a:x".to_string()];
        assert_eq!(name_column_width(&users, 48), 10);
    }

    #[test]
    fn test_name_column_is_capped_at_half_the_row() {
        let users = vec!["@a-very-long-user-name:example.org".to_string()];
        assert_eq!(name_column_width(&users, 20), 10);
        assert_eq!(name_column_width(&[], 20), 1);
    }
}
