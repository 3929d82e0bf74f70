use std::path::{Path, PathBuf};

use calamine::DataType;
use survey_report::CellValue;

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolves a path from a configuration file against the directory of that file.
pub fn resolve_path(root: Option<&Path>, path: &str) -> PathBuf {
    let p = Path::new(path);
    match root {
        Some(r) if p.is_relative() => r.join(p),
        _ => p.to_path_buf(),
    }
}

pub fn cell_from_calamine(cell: &DataType) -> CellValue {
    match cell {
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::DateTime(f) => CellValue::Number(*f),
        DataType::String(s) => CellValue::from_text(s),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        DataType::Empty => CellValue::Empty,
        // Formula errors (#DIV/0!, ...) carry no value.
        _ => CellValue::Empty,
    }
}

/// The name of a column, as found in the first row of a worksheet.
pub fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Empty => String::new(),
        other => cell_from_calamine(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_cells() {
        assert_eq!(cell_from_calamine(&DataType::Int(4)), CellValue::Number(4.0));
        assert_eq!(
            cell_from_calamine(&DataType::Float(3.5)),
            CellValue::Number(3.5)
        );
        assert_eq!(
            cell_from_calamine(&DataType::String("".to_string())),
            CellValue::Empty
        );
        assert_eq!(
            cell_from_calamine(&DataType::String("5".to_string())),
            CellValue::Text("5".to_string())
        );
        assert_eq!(cell_from_calamine(&DataType::Empty), CellValue::Empty);
        assert_eq!(
            cell_from_calamine(&DataType::Bool(true)),
            CellValue::Text("true".to_string())
        );
    }

    #[test]
    fn header_names() {
        assert_eq!(header_name(&DataType::String(" Aroma ".to_string())), "Aroma");
        assert_eq!(header_name(&DataType::Int(2024)), "2024");
        assert_eq!(header_name(&DataType::Empty), "");
    }

    #[test]
    fn paths() {
        let root = Path::new("/data/config");
        assert_eq!(
            resolve_path(Some(root), "meals.csv"),
            PathBuf::from("/data/config/meals.csv")
        );
        assert_eq!(
            resolve_path(Some(root), "/tmp/meals.csv"),
            PathBuf::from("/tmp/meals.csv")
        );
        assert_eq!(resolve_path(None, "meals.csv"), PathBuf::from("meals.csv"));
        assert_eq!(
            simplify_file_name(Path::new("/data/config/meals.csv")),
            "meals.csv"
        );
    }
}
