use crate::table::DcfTable;
use std::fmt::{self, Write};

const LABEL_HEADER: &str = "Line Item";
const UNSET: &str = "-";

/// Renders the table as aligned text: one line per row, one column per year.
pub fn render(table: &DcfTable) -> String {
    let years = table.column_labels();
    let rows: Vec<(&str, Vec<String>)> = table
        .row_labels()
        .map(|label| {
            let cells = table
                .row(label)
                .unwrap_or(&[])
                .iter()
                .map(|c| c.map_or_else(|| UNSET.to_string(), |v| format!("{:.2}", v)))
                .collect();
            (label, cells)
        })
        .collect();

    let label_width = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .chain(std::iter::once(LABEL_HEADER.len()))
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = years
        .iter()
        .enumerate()
        .map(|(i, y)| rows.iter().map(|(_, c)| c[i].len()).chain(std::iter::once(y.len())).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:<w$}", LABEL_HEADER, w = label_width);
    for (y, w) in years.iter().zip(&col_widths) {
        let _ = write!(out, "  {:>w$}", y, w = *w);
    }
    let _ = writeln!(out);

    for (label, cells) in &rows {
        let _ = write!(out, "{:<w$}", label, w = label_width);
        for (c, w) in cells.iter().zip(&col_widths) {
            let _ = write!(out, "  {:>w$}", c, w = *w);
        }
        let _ = writeln!(out);
    }
    out
}

impl fmt::Display for DcfTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_alignment_and_unset_cells() {
        let mut t = DcfTable::new(["Gross Revenue", "Vacancy"], 2024, 2).unwrap();
        t.insert_row("Gross Revenue", [100.0, 1100.5]).unwrap();
        let text = t.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Line Item        2024     2025");
        assert_eq!(lines[1], "Gross Revenue  100.00  1100.50");
        assert_eq!(lines[2], "Vacancy             -        -");
    }

    #[test]
    fn test_render_without_years() {
        let t = DcfTable::new(["A"], 2024, 0).unwrap();
        assert_eq!(render(&t), format!("Line Item\n{:<9}\n", "A"));
    }
}
