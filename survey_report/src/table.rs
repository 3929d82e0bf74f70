// ********* Tabular data as read from a store ***********

use std::fmt::Display;

/// The content of one cell, as it comes out of a store.
///
/// Stores are not typed: the same column may hold numbers in one
/// spreadsheet and text in another. Interpretation happens later, in the
/// coercion pass of the report builder.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Builds a cell from raw text. Empty text is an empty cell.
    pub fn from_text(s: &str) -> CellValue {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from_text(&s)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Number(x)
    }
}

impl From<u32> for CellValue {
    fn from(x: u32) -> Self {
        CellValue::Number(x as f64)
    }
}

/// One submitted survey, as an ordered list of (column name, value) pairs.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Row {
    pub cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Row {
        Row { cells: Vec::new() }
    }

    /// Adds a cell, replacing the previous value if the column is already present.
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Row {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<CellValue>) {
        let value = value.into();
        if let Some(cell) = self.cells.iter_mut().find(|(name, _)| name == column) {
            cell.1 = value;
        } else {
            self.cells.push((column.to_string(), value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

/// An ordered collection of rows sharing the same header.
///
/// Rows are kept in submission order.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Table {
        Table {
            header,
            rows: Vec::new(),
        }
    }

    /// Builds a table from rows alone. The header is the union of the
    /// column names, in order of first appearance.
    pub fn from_rows(rows: Vec<Row>) -> Table {
        let mut header: Vec<String> = Vec::new();
        for row in rows.iter() {
            for name in row.columns() {
                if !header.iter().any(|h| h == name) {
                    header.push(name.to_string());
                }
            }
        }
        Table { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All the values of one column, in row order. Rows that do not carry
    /// the column yield an empty cell.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows.iter().map(move |r| r.get(name).unwrap_or(EMPTY))
    }

    pub fn push(&mut self, row: Row) {
        for name in row.columns() {
            if !self.header.iter().any(|h| h == name) {
                self.header.push(name.to_string());
            }
        }
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_empty_cell() {
        assert_eq!(CellValue::from_text(""), CellValue::Empty);
        assert_eq!(CellValue::from("3"), CellValue::Text("3".to_string()));
    }

    #[test]
    fn row_set_replaces() {
        let mut r = Row::new().with("Aroma", 3u32);
        r.set("Aroma", 4u32);
        assert_eq!(r.cells.len(), 1);
        assert_eq!(r.get("Aroma"), Some(&CellValue::Number(4.0)));
        assert_eq!(r.get("Flavor"), None);
    }

    #[test]
    fn header_from_rows() {
        let t = Table::from_rows(vec![
            Row::new().with("A", "x").with("B", "y"),
            Row::new().with("B", "z").with("C", "w"),
        ]);
        assert_eq!(t.header, vec!["A", "B", "C"]);
        let col_a: Vec<&CellValue> = t.column("A").collect();
        assert_eq!(
            col_a,
            vec![&CellValue::Text("x".to_string()), &CellValue::Empty]
        );
    }
}
