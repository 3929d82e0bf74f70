use std::error::Error;
use std::fmt::Display;

use crate::pdf::{Align, Font, PageWriter};

/// Line height of the body text, in millimeters.
const LINE_HEIGHT: f64 = 8.0;
/// Height of a section heading, in millimeters.
const HEADING_HEIGHT: f64 = 10.0;
/// Vertical gap inserted before every section except the first one.
const SECTION_GAP: f64 = 10.0;
/// Width of the writable area of the page.
const FULL_WIDTH: f64 = 190.0;
/// Width of each of the two cells of a field line.
const HALF_WIDTH: f64 = 95.0;

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
        }
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "Could not write the report document: {}", e),
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SectionStyle {
    /// Large centered heading, used for the document title.
    Title,
    /// Left-aligned heading of a numbered part of the report.
    Subsection,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Line {
    Text(String),
    /// A label and its value, printed side by side in two cells.
    Field { label: String, value: String },
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Text(s) => write!(f, "{}", s),
            Line::Field { label, value } => write!(f, "{} {}", label, value),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub style: SectionStyle,
    pub lines: Vec<Line>,
}

/// The structure of a report, independent of its rendering.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReportDocument {
    pub sections: Vec<Section>,
}

impl ReportDocument {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// The title of the document: the heading of its first title section.
    pub fn title(&self) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.style == SectionStyle::Title)
            .map(|s| s.heading.as_str())
    }

    /// Renders the document as a PDF file.
    ///
    /// The rendering is deterministic: the same document always produces the
    /// same bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>, RenderError> {
        let mut pw = PageWriter::new();
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                pw.ln(SECTION_GAP);
            }
            match section.style {
                SectionStyle::Title => {
                    pw.set_font(Font::Bold, 16.0);
                    pw.cell(FULL_WIDTH, HEADING_HEIGHT, &section.heading, Align::Center, true);
                }
                SectionStyle::Subsection => {
                    pw.set_font(Font::Bold, 12.0);
                    pw.cell(FULL_WIDTH, HEADING_HEIGHT, &section.heading, Align::Left, true);
                }
            }
            pw.set_font(Font::Regular, 11.0);
            for line in section.lines.iter() {
                match line {
                    Line::Text(s) => pw.cell(FULL_WIDTH, LINE_HEIGHT, s, Align::Left, true),
                    Line::Field { label, value } => {
                        pw.cell(HALF_WIDTH, LINE_HEIGHT, label, Align::Left, false);
                        pw.cell(HALF_WIDTH, LINE_HEIGHT, value, Align::Left, true);
                    }
                }
            }
        }
        let mut buf: Vec<u8> = Vec::new();
        pw.finish(self.title().unwrap_or(""), &mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(num_lines: usize) -> ReportDocument {
        ReportDocument {
            sections: vec![
                Section {
                    heading: "A title".to_string(),
                    style: SectionStyle::Title,
                    lines: vec![],
                },
                Section {
                    heading: "Part (1)".to_string(),
                    style: SectionStyle::Subsection,
                    lines: (0..num_lines)
                        .map(|i| Line::Field {
                            label: format!("- item {}:", i),
                            value: "1.00".to_string(),
                        })
                        .collect(),
                },
            ],
        }
    }

    #[test]
    fn render_contains_text() {
        let bytes = doc(2).to_pdf().unwrap();
        let s = String::from_utf8_lossy(&bytes);
        assert!(s.contains("(A title) Tj"));
        assert!(s.contains("(- item 1:) Tj"));
        assert!(s.contains("/Count 1"));
    }

    #[test]
    fn long_documents_span_pages() {
        let bytes = doc(80).to_pdf().unwrap();
        let s = String::from_utf8_lossy(&bytes);
        assert!(s.contains("/Count 3"));
    }

    #[test]
    fn lookup() {
        let d = doc(1);
        assert_eq!(d.title(), Some("A title"));
        assert_eq!(d.section("Part (1)").map(|s| s.lines.len()), Some(1));
        assert!(d.section("Missing").is_none());
    }
}
