use log::{debug, info};

use crate::document::{Line, RenderError, ReportDocument, Section, SectionStyle};
use crate::rating::{ColumnLabels, ColumnStats, RatingColumn, RatingColumns, RATING_MAX};
use crate::table::Table;

pub const REPORT_TITLE: &str = "Meal Evaluation Report";
pub const STATISTICS_HEADING: &str = "Statistical Averages";
/// Shown in place of a mean when a column has no valid rating.
pub const MISSING_MEAN: &str = "N/A";

/// Name under which the report is offered for download.
pub const REPORT_FILE_NAME: &str = "meal_report.pdf";
pub const REPORT_MIME_TYPE: &str = "application/pdf";

/// The figures shown in a report.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportSummary {
    /// Number of stored evaluations, valid ratings or not.
    pub total: usize,
    /// One entry per rating column, in canonical order.
    pub stats: Vec<ColumnStats>,
}

impl ReportSummary {
    pub fn mean(&self, column: RatingColumn) -> Option<f64> {
        self.stats
            .iter()
            .find(|s| s.column == column)
            .and_then(|s| s.mean())
    }
}

/// Builds the summary report of a table of surveys.
///
/// ```
/// use survey_report::{ReportBuilder, Row, Table};
///
/// let table = Table::from_rows(vec![
///     Row::new().with("Appearance", "3"),
///     Row::new().with("Appearance", "5"),
/// ]);
/// let doc = ReportBuilder::default().document(&table);
/// let stats = doc.section("Statistical Averages").unwrap();
/// assert_eq!(stats.lines[0].to_string(), "- Appearance: 4.00 / 5.00");
/// let pdf: Vec<u8> = ReportBuilder::default().build(&table)?;
/// # Ok::<(), survey_report::RenderError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReportBuilder {
    labels: ColumnLabels,
}

impl ReportBuilder {
    pub fn new(labels: ColumnLabels) -> ReportBuilder {
        ReportBuilder { labels }
    }

    pub fn labels(&self) -> &ColumnLabels {
        &self.labels
    }

    pub fn summarize(&self, table: &Table) -> ReportSummary {
        info!("summarize: processing {} rows", table.len());
        let stats = RatingColumns::coerce(table, &self.labels).stats();
        for s in stats.iter() {
            debug!(
                "summarize: {:?}: {} valid values, mean {:?}",
                s.column,
                s.count,
                s.mean()
            );
        }
        ReportSummary {
            total: table.len(),
            stats,
        }
    }

    pub fn document(&self, table: &Table) -> ReportDocument {
        let summary = self.summarize(table);
        self.document_from_summary(&summary)
    }

    pub fn document_from_summary(&self, summary: &ReportSummary) -> ReportDocument {
        let title = Section {
            heading: REPORT_TITLE.to_string(),
            style: SectionStyle::Title,
            lines: vec![Line::Text(format!("Total evaluations: {}", summary.total))],
        };
        let averages = Section {
            heading: STATISTICS_HEADING.to_string(),
            style: SectionStyle::Subsection,
            lines: summary
                .stats
                .iter()
                .map(|s| Line::Field {
                    label: format!("- {}:", self.labels.display_name(s.column)),
                    value: format_mean(s.mean()),
                })
                .collect(),
        };
        ReportDocument {
            sections: vec![title, averages],
        }
    }

    /// Renders the report of the table as a PDF document.
    ///
    /// Malformed cells never make this fail: they are left out of the
    /// averages. The table is not modified.
    pub fn build(&self, table: &Table) -> Result<Vec<u8>, RenderError> {
        let bytes = self.document(table).to_pdf()?;
        info!("build: rendered {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Formats a mean on the rating scale, for example `4.00 / 5.00`.
pub fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(x) => format!("{:.2} / {:.2}", x, RATING_MAX),
        None => MISSING_MEAN.to_string(),
    }
}
