use std::path::PathBuf;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use survey_report::{Row, RowStore, Table};

use crate::survey::{
    io_common::{cell_from_calamine, header_name, simplify_file_name},
    *,
};

/// Evaluations exported from an online spreadsheet, in Excel format.
///
/// The first row of the worksheet is the header. This store is read only.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExcelStore {
    path: PathBuf,
    worksheet_name: Option<String>,
}

impl ExcelStore {
    pub fn new(path: impl Into<PathBuf>, worksheet_name: Option<String>) -> ExcelStore {
        ExcelStore {
            path: path.into(),
            worksheet_name,
        }
    }

    fn get_range(&self) -> SurveyResult<calamine::Range<DataType>> {
        let path = self.path.display().to_string();
        debug!(
            "get_range: path: {:?} worksheet: {:?}",
            &path, &self.worksheet_name
        );
        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).context(OpeningExcelSnafu { path: path.clone() })?;

        // A worksheet name was provided, use it.
        if let Some(worksheet_name) = self.worksheet_name.clone() {
            let wrange = workbook
                .worksheet_range(&worksheet_name)
                .context(MissingWorksheetSnafu {
                    name: worksheet_name.clone(),
                })?
                .context(OpeningExcelSnafu { path })?;
            Ok(wrange)
        } else {
            let all_worksheets = workbook.worksheets();
            match all_worksheets.as_slice() {
                [] => EmptyExcelSnafu { path }.fail(),
                [(worksheet_name, wrange)] => {
                    debug!("get_range: using the only worksheet {:?}", worksheet_name);
                    Ok(wrange.clone())
                }
                _ => TooManyWorksheetsSnafu {
                    path,
                    names: all_worksheets
                        .iter()
                        .map(|(name, _)| name.clone())
                        .collect::<Vec<String>>(),
                }
                .fail(),
            }
        }
    }
}

impl RowStore for ExcelStore {
    type Error = SurveyError;

    fn read(&self) -> SurveyResult<Table> {
        info!(
            "read: reading evaluations from {}",
            simplify_file_name(&self.path)
        );
        let wrange = self.get_range()?;
        let mut iter = wrange.rows();
        let header: Vec<String> = match iter.next() {
            Some(cells) => cells.iter().map(header_name).collect(),
            None => return Ok(Table::default()),
        };
        debug!("read: header: {:?}", header);

        let mut table = Table::new(
            header
                .iter()
                .filter(|name| !name.is_empty())
                .cloned()
                .collect(),
        );
        for (idx, row) in iter.enumerate() {
            // Unnamed columns cannot be looked up, they are dropped.
            let cells = header
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), cell_from_calamine(cell)))
                .collect();
            let row = Row { cells };
            // Exports often end with rows that only have formatting.
            if row.cells.iter().all(|(_, v)| v.is_empty()) {
                debug!("read: skipping empty row {}", idx + 2);
                continue;
            }
            table.rows.push(row);
        }
        info!("read: {} evaluations", table.len());
        Ok(table)
    }

    fn append(&mut self, _row: Row) -> SurveyResult<Table> {
        warn!("append: {:?} is an Excel file", self.path);
        ReadOnlyStoreSnafu {
            provider: Provider::Xlsx.name(),
        }
        .fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_report::CellValue;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_data(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(name)
    }

    #[test]
    fn read_evaluations() {
        init();
        let store = ExcelStore::new(test_data("evaluations.xlsx"), None);
        let t = store.read().unwrap();
        // The padded header is trimmed and the unnamed column is gone.
        assert_eq!(
            t.header,
            vec!["Appearance", "Aroma", "Overall", "Evaluator", "Date"]
        );
        // The blank third row and the row with a value only in the unnamed
        // column are skipped.
        assert_eq!(t.len(), 2);
        for row in t.rows.iter() {
            assert!(row.columns().all(|name| !name.is_empty()));
        }
        assert_eq!(t.rows[0].get("Appearance"), Some(&CellValue::Number(4.0)));
        assert_eq!(t.rows[0].get("Date"), Some(&CellValue::Number(45413.0)));
        assert_eq!(
            t.rows[1].get("Evaluator"),
            Some(&CellValue::Text("Bia".to_string()))
        );
        assert_eq!(
            t.rows[1].get("Aroma"),
            Some(&CellValue::Text("n/a".to_string()))
        );
    }

    #[test]
    fn report_from_workbook() {
        init();
        let t = ExcelStore::new(test_data("evaluations.xlsx"), Some("Form1".to_string()))
            .read()
            .unwrap();
        let summary = ReportBuilder::default().summarize(&t);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.mean(RatingColumn::Appearance), Some(3.5));
        assert_eq!(summary.mean(RatingColumn::Overall), Some(3.5));
        // "n/a" is not a rating.
        assert_eq!(summary.mean(RatingColumn::Aroma), Some(5.0));
        assert_eq!(summary.mean(RatingColumn::Flavor), None);
    }

    #[test]
    fn several_worksheets_need_a_name() {
        init();
        let store = ExcelStore::new(test_data("two_sheets.xlsx"), None);
        match store.read() {
            Err(SurveyError::TooManyWorksheets { names, .. }) => {
                assert_eq!(names, vec!["Form1", "Form2"])
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let store = ExcelStore::new(test_data("two_sheets.xlsx"), Some("Form2".to_string()));
        let t = store.read().unwrap();
        assert_eq!(t.header, vec!["Aroma"]);
        assert_eq!(t.rows[0].get("Aroma"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn unknown_worksheet() {
        init();
        let store = ExcelStore::new(test_data("evaluations.xlsx"), Some("Sheet9".to_string()));
        assert!(matches!(
            store.read(),
            Err(SurveyError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn workbook_without_worksheets() {
        init();
        let store = ExcelStore::new(test_data("no_sheets.xlsx"), None);
        assert!(matches!(store.read(), Err(SurveyError::EmptyExcel { .. })));
    }

    #[test]
    fn missing_workbook() {
        let store = ExcelStore::new("/nonexistent/responses.xlsx", None);
        assert!(matches!(
            store.read(),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }

    #[test]
    fn append_is_refused() {
        let mut store = ExcelStore::new("responses.xlsx", Some("Form1".to_string()));
        assert!(matches!(
            store.append(Row::new().with("Aroma", 3u32)),
            Err(SurveyError::ReadOnlyStore { .. })
        ));
    }
}
