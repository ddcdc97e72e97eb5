// One loaded sheet as rows of trimmed cell text.

/// Cell text of a single worksheet. Rows may have different lengths; reads
/// outside the stored cells return the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.trim().to_string()).collect())
            .collect();
        Self { rows }
    }

    /// Convenience for tests and fixtures.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|c| is_blank(c)))
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Parse a spreadsheet column letter ("A", "AB") into a 0-based index.
pub fn letter_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut col = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        col = col * 26 + (ch as usize - 'A' as usize + 1);
    }
    Some(col - 1)
}

/// Inverse of `letter_to_col`: 0 is "A", 26 is "AA".
pub fn col_to_letter(col: usize) -> String {
    let prefix = match col / 26 {
        0 => String::new(),
        n => col_to_letter(n - 1),
    };
    let last = char::from(b'A' + (col % 26) as u8);
    format!("{prefix}{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_trimmed_and_out_of_range_is_empty() {
        let grid = Grid::from_strs(&[&["  [금일 작업] ", "x"], &["a"]]);
        assert_eq!(grid.cell(0, 0), "[금일 작업]");
        assert_eq!(grid.cell(1, 1), "");
        assert_eq!(grid.cell(9, 0), "");
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 2);
    }

    #[test]
    fn blank_grid() {
        assert!(Grid::from_strs(&[&["", "  "]]).is_empty());
        assert!(!Grid::from_strs(&[&["", "a"]]).is_empty());
    }

    #[test]
    fn column_letters() {
        assert_eq!(letter_to_col("A"), Some(0));
        assert_eq!(letter_to_col("Z"), Some(25));
        assert_eq!(letter_to_col("AA"), Some(26));
        assert_eq!(letter_to_col("ZZ"), Some(701));
        assert_eq!(letter_to_col("a"), None);
        assert_eq!(letter_to_col(""), None);
        assert_eq!(letter_to_col("비고"), None);
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
        for col in [0, 5, 25, 27, 300, 701] {
            assert_eq!(letter_to_col(&col_to_letter(col)), Some(col));
        }
    }
}
