// Primitives for reading and appending to CSV files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use survey_report::{CellValue, Row, RowStore, Table};

use crate::survey::*;

/// A store backed by a CSV file with a header row.
///
/// A missing file is an empty store. It is created by the first append.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> CsvStore {
        CsvStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    // None when there is no file yet, or when it is empty.
    fn read_header(&self) -> SurveyResult<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .context(OpeningCsvSnafu {
                path: self.path_str(),
            })?;
        let header: Vec<String> = rdr
            .headers()
            .context(CsvLineParseSnafu { lineno: 1usize })?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();
        if header.is_empty() {
            Ok(None)
        } else {
            Ok(Some(header))
        }
    }

    fn ends_with_newline(&self) -> SurveyResult<bool> {
        let bytes = fs::read(&self.path).context(WritingFileSnafu {
            path: self.path_str(),
        })?;
        Ok(bytes.last().map(|b| *b == b'\n').unwrap_or(true))
    }
}

impl RowStore for CsvStore {
    type Error = SurveyError;

    fn read(&self) -> SurveyResult<Table> {
        if !self.path.exists() {
            info!("read: {:?} does not exist yet, no evaluations", self.path);
            return Ok(Table::default());
        }
        info!("read: reading evaluations from {:?}", self.path);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .context(OpeningCsvSnafu {
                path: self.path_str(),
            })?;
        let header: Vec<String> = rdr
            .headers()
            .context(CsvLineParseSnafu { lineno: 1usize })?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();
        debug!("read: header: {:?}", header);

        let mut table = Table::new(header.clone());
        for (idx, record_r) in rdr.records().enumerate() {
            // The header is line 1.
            let lineno = idx + 2;
            let record = record_r.context(CsvLineParseSnafu { lineno })?;
            if record.len() != header.len() {
                warn!(
                    "read: line {}: {} fields for {} columns",
                    lineno,
                    record.len(),
                    header.len()
                );
            }
            let cells: Vec<(String, CellValue)> = header
                .iter()
                .zip(record.iter())
                .map(|(name, s)| (name.clone(), CellValue::from_text(s)))
                .collect();
            table.rows.push(Row { cells });
        }
        info!("read: {} evaluations", table.len());
        Ok(table)
    }

    fn append(&mut self, row: Row) -> SurveyResult<Table> {
        let (header, values, write_header) = match self.read_header()? {
            None => {
                let header: Vec<String> = row.columns().map(|s| s.to_string()).collect();
                let values: Vec<String> = row.cells.iter().map(|(_, v)| v.to_string()).collect();
                (header, values, true)
            }
            Some(header) => {
                // No schema migration: the columns of the file are fixed.
                if let Some(unknown) = row.columns().find(|c| !header.iter().any(|h| h == c)) {
                    return CsvUnknownColumnSnafu {
                        column: unknown.to_string(),
                        path: self.path_str(),
                    }
                    .fail();
                }
                let values: Vec<String> = header
                    .iter()
                    .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
                    .collect();
                (header, values, false)
            }
        };
        debug!("append: header: {:?} values: {:?}", header, values);

        let missing_newline = !write_header && !self.ends_with_newline()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(WritingFileSnafu {
                path: self.path_str(),
            })?;
        if missing_newline {
            file.write_all(b"\n").context(WritingFileSnafu {
                path: self.path_str(),
            })?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            wtr.write_record(&header).context(WritingCsvSnafu {
                path: self.path_str(),
            })?;
        }
        wtr.write_record(&values).context(WritingCsvSnafu {
            path: self.path_str(),
        })?;
        wtr.flush().context(WritingFileSnafu {
            path: self.path_str(),
        })?;
        info!("append: added one evaluation to {:?}", self.path);
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn missing_file_is_empty() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("none.csv"));
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn append_then_read() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(dir.path().join("meals.csv"));
        store
            .append(Row::new().with("Evaluator", "Ana").with("Aroma", 4u32))
            .unwrap();
        let t = store
            .append(Row::new().with("Aroma", "5").with("Evaluator", "Bia, Jr."))
            .unwrap();
        assert_eq!(t.header, vec!["Evaluator", "Aroma"]);
        assert_eq!(t.len(), 2);
        let names: Vec<String> = t.column("Evaluator").map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["Ana", "Bia, Jr."]);
        let aromas: Vec<&CellValue> = t.column("Aroma").collect();
        assert_eq!(
            aromas,
            vec![
                &CellValue::Text("4".to_string()),
                &CellValue::Text("5".to_string())
            ]
        );
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "Evaluator,Aroma\nAna,4\n\"Bia, Jr.\",5\n");
    }

    #[test]
    fn missing_columns_are_blank() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meals.csv");
        // No trailing newline.
        fs::write(&path, "Evaluator,Aroma,Notes\nAna,4,ok").unwrap();
        let mut store = CsvStore::new(&path);
        let t = store.append(Row::new().with("Evaluator", "Bia")).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[1].get("Aroma"), Some(&CellValue::Empty));
        assert_eq!(t.rows[0].get("Notes"), Some(&CellValue::Text("ok".to_string())));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meals.csv");
        fs::write(&path, "Evaluator,Aroma\nAna,4\n").unwrap();
        let mut store = CsvStore::new(&path);
        let res = store.append(Row::new().with("Evaluator", "Bia").with("Smell", 3u32));
        assert!(matches!(res, Err(SurveyError::CsvUnknownColumn { .. })));
        assert_eq!(store.read().unwrap().len(), 1);
    }

    #[test]
    fn short_lines_are_kept() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meals.csv");
        fs::write(&path, "Evaluator,Aroma,Flavor\nAna,4\nBia,3,2\n").unwrap();
        let t = CsvStore::new(&path).read().unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].get("Flavor"), None);
        assert_eq!(t.rows[1].get("Flavor"), Some(&CellValue::Text("2".to_string())));
    }

    #[test]
    fn padded_headers_are_trimmed() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meals.csv");
        fs::write(&path, "Evaluator, Aroma ,Flavor\nAna,4,2\n").unwrap();
        let mut store = CsvStore::new(&path);
        let t = store.read().unwrap();
        assert_eq!(t.header, vec!["Evaluator", "Aroma", "Flavor"]);
        let summary = ReportBuilder::default().summarize(&t);
        assert_eq!(summary.mean(RatingColumn::Aroma), Some(4.0));

        // Appending matches the trimmed names.
        store
            .append(Row::new().with("Evaluator", "Bia").with("Aroma", 2u32))
            .unwrap();
        let t = store.read().unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[1].get("Aroma"), Some(&CellValue::Text("2".to_string())));
    }
}
