use std::fmt::Write;

/// Display width of every data column. Wider values overflow, they are never cut.
pub const COLUMN_WIDTH: usize = 20;

const NUMBER_WIDTH: usize = 3;
const NULL: &str = "NULL";

/// A single value as it will be displayed; `None` is SQL NULL.
pub type Cell = Option<String>;

pub type Row = Vec<Cell>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableResult {
    pub fn new(columns: Vec<String>) -> Self {
        TableResult { columns, rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, the usual shape of a lookup.
    pub fn first_value(&self) -> Option<&str> {
        self.rows.first()
            .and_then(|r| r.first())
            .and_then(|c| c.as_deref())
    }
}

/// Renders a whole result, numbering rows from 1.
pub fn render(columns: &[String], rows: &[Row]) -> String {
    render_from(columns, rows, 1)
}

/// Renders `rows` numbering them from `first_number`, so a page of a larger
/// listing keeps its absolute row numbers.
pub fn render_from(columns: &[String], rows: &[Row], first_number: usize) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("No results found.\n");
        return out;
    }

    out.push_str(&" ".repeat(NUMBER_WIDTH));
    out.push('|');
    for c in columns {
        let _ = write!(out, " {:width$} |", c, width = COLUMN_WIDTH);
    }
    out.push('\n');

    out.push_str(&"-".repeat(NUMBER_WIDTH));
    out.push('|');
    for _ in columns {
        out.push_str(&"-".repeat(COLUMN_WIDTH + 2));
        out.push('|');
    }
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        let _ = write!(out, "{:>width$}|", first_number + i, width = NUMBER_WIDTH);
        for cell in row {
            let _ = write!(
                out,
                " {:width$} |",
                cell.as_deref().unwrap_or(NULL),
                width = COLUMN_WIDTH
            );
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "({} {})",
        rows.len(),
        if rows.len() == 1 { "row" } else { "rows" }
    );
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_render() {
        let out = render(
            &columns(&["team_name", "season"]),
            &vec![
                vec![Some("Kansas City Chiefs".to_string()), Some("2023".to_string())],
            ]
        );
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("   | {:20} | {:20} |", "team_name", "season"));
        assert_eq!(lines[1], format!("---|{}|{}|", "-".repeat(22), "-".repeat(22)));
        assert_eq!(lines[2], format!("  1| {:20} | {:20} |", "Kansas City Chiefs", "2023"));
        assert_eq!(lines[3], "(1 row)");
    }

    #[test]
    fn test_render_null_and_offset() {
        let out = render_from(
            &columns(&["a"]),
            &vec![vec![None], vec![Some("x".to_string())]],
            21
        );

        assert!(out.contains(&format!(" 21| {:20} |", "NULL")));
        assert!(out.contains(&format!(" 22| {:20} |", "x")));
        assert!(out.ends_with("(2 rows)\n"));
    }

    #[test]
    fn test_render_empty() {
        let out = render(&columns(&["a", "b"]), &[]);
        assert_eq!(out, "No results found.\n");
    }

    #[test]
    fn test_wide_value_not_truncated() {
        let long = "a".repeat(35);
        let out = render(&columns(&["a"]), &vec![vec![Some(long.clone())]]);
        assert!(out.contains(&format!(" {} |", long)));
    }

    #[test]
    fn test_first_value() {
        let mut t = TableResult::new(columns(&["display_name"]));
        assert_eq!(t.first_value(), None);
        t.rows.push(vec![Some("Patrick Mahomes".to_string())]);
        assert_eq!(t.first_value(), Some("Patrick Mahomes"));
    }
}
