//! Broadcasting static (non-escalating) assumptions across every year.

use super::DcfTable;

impl DcfTable {
    /// Returns a new table in which every cell holds its row's first-column value.
    ///
    /// Row and column labels are preserved; unset first cells stay unset. The
    /// receiver is not modified, and applying this to its own output is a no-op.
    pub fn replicate_first_column(&self) -> DcfTable {
        let mut out = self.clone();
        if self.width == 0 {
            return out;
        }
        for chunk in out.cells.chunks_exact_mut(self.width) {
            let first = chunk[0];
            chunk.fill(first);
        }
        tracing::debug!(rows = self.row_count(), width = self.width, "replicated first column");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserves() -> DcfTable {
        let mut t = DcfTable::new(["Structural Reserve", "Vacancy Rate", "Blank"], 2024, 4).unwrap();
        t.insert_year(2024, [("Structural Reserve", 0.02), ("Vacancy Rate", 0.05)]).unwrap();
        t.insert_year(2026, [("Vacancy Rate", 0.5)]).unwrap();
        t
    }

    #[test]
    fn test_first_column_fills_every_year() {
        let t = reserves();
        let r = t.replicate_first_column();
        assert_eq!(r.values("Structural Reserve").unwrap(), vec![0.02; 4]);
        assert_eq!(r.values("Vacancy Rate").unwrap(), vec![0.05; 4]);
        assert_eq!(r.row("Blank"), Some(&[None; 4][..]));
        assert_eq!(r.column_labels(), t.column_labels());
        assert_eq!(r.row_labels().collect::<Vec<_>>(), t.row_labels().collect::<Vec<_>>());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let t = reserves();
        let before = t.clone();
        let _ = t.replicate_first_column();
        assert_eq!(t, before);
    }

    #[test]
    fn test_idempotent() {
        let once = reserves().replicate_first_column();
        let twice = once.replicate_first_column();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_zero_width_returns_copy() {
        let t = DcfTable::new(["A"], 2024, 0).unwrap();
        assert_eq!(t.replicate_first_column(), t);
    }
}
