// Page layout on top of `pdf-writer`: one page size, the two built-in
// Helvetica faces, text cells laid out top to bottom with automatic page breaks.
//
// All measures given to the writer are in millimeters from the top-left
// corner of the page, and converted to PDF points when emitted.

use std::io::Write;

use log::debug;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

/// Points per millimeter.
const K: f64 = 72.0 / 25.4;

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 10.0;
/// Distance from the bottom edge that triggers a page break.
pub const BREAK_MARGIN_MM: f64 = 20.0;
/// Padding between the border of a cell and its text.
const CELL_PADDING_MM: f64 = 1.0;

// Object numbers: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then one
// (page, content) pair per page.
const CATALOG_ID: i32 = 1;
const PAGE_TREE_ID: i32 = 2;
const REGULAR_FONT_ID: i32 = 3;
const BOLD_FONT_ID: i32 = 4;
const INFO_ID: i32 = 5;
const FIRST_PAGE_ID: i32 = 6;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }

    // Advance widths of the printable ASCII range (32..=126), in 1/1000 em.
    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of the text in millimeters at the given size in points.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let w = self.widths();
        let units: u32 = text
            .bytes()
            .map(|b| match b {
                32..=126 => w[(b - 32) as usize] as u32,
                _ => w[('?' as u8 - 32) as usize] as u32,
            })
            .sum();
        units as f64 * size / 1000.0 / K
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Align {
    Left,
    Center,
}

/// Lays out text cells on successive pages.
pub struct PageWriter {
    pages: Vec<Content>,
    x: f64,
    y: f64,
    font: Font,
    size: f64,
}

impl Default for PageWriter {
    fn default() -> Self {
        PageWriter::new()
    }
}

impl PageWriter {
    pub fn new() -> PageWriter {
        PageWriter {
            pages: vec![Content::new()],
            x: MARGIN_MM,
            y: MARGIN_MM,
            font: Font::Regular,
            size: 12.0,
        }
    }

    pub fn set_font(&mut self, font: Font, size: f64) {
        self.font = font;
        self.size = size;
    }

    /// Moves to the start of the next line, `h` millimeters below.
    pub fn ln(&mut self, h: f64) {
        self.x = MARGIN_MM;
        self.y += h;
    }

    /// Writes a cell of width `w` and height `h` at the current position.
    /// With `new_line`, the position moves to the start of the next line,
    /// otherwise to the right of the cell.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, align: Align, new_line: bool) {
        if self.y + h > PAGE_HEIGHT_MM - BREAK_MARGIN_MM {
            debug!("cell: page break at y={:.2}", self.y);
            self.pages.push(Content::new());
            self.y = MARGIN_MM;
        }
        let text = sanitize(text);
        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_PADDING_MM,
                Align::Center => (w - self.font.text_width(&text, self.size)) / 2.0,
            };
            // Baseline placed so that the text is vertically centered in the cell.
            let baseline = self.y + 0.5 * h + 0.3 * self.size / K;
            if let Some(page) = self.pages.last_mut() {
                page.begin_text();
                page.set_font(self.font.resource(), self.size as f32);
                page.next_line(
                    ((self.x + dx) * K) as f32,
                    ((PAGE_HEIGHT_MM - baseline) * K) as f32,
                );
                page.show(Str(text.as_bytes()));
                page.end_text();
            }
        }
        if new_line {
            self.ln(h);
        } else {
            self.x += w;
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serializes all the pages as a complete PDF file.
    pub fn finish<W: Write>(self, title: &str, mut out: W) -> std::io::Result<()> {
        let page_tree_id = Ref::new(PAGE_TREE_ID);
        let page_ids: Vec<i32> = (0..self.pages.len() as i32)
            .map(|i| FIRST_PAGE_ID + 2 * i)
            .collect();
        let mut pdf = Pdf::new();
        pdf.catalog(Ref::new(CATALOG_ID)).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|id| Ref::new(*id)))
            .count(page_ids.len() as i32);
        for (font_id, base_font) in [
            (REGULAR_FONT_ID, Name(b"Helvetica")),
            (BOLD_FONT_ID, Name(b"Helvetica-Bold")),
        ] {
            pdf.type1_font(Ref::new(font_id))
                .base_font(base_font)
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        let title = sanitize(title);
        pdf.document_info(Ref::new(INFO_ID))
            .title(TextStr(&title))
            .producer(TextStr("survey_report"));

        for (page_id, content) in page_ids.iter().zip(self.pages.into_iter()) {
            let content_id = Ref::new(page_id + 1);
            let mut page = pdf.page(Ref::new(*page_id));
            page.parent(page_tree_id);
            page.media_box(Rect::new(
                0.0,
                0.0,
                (PAGE_WIDTH_MM * K) as f32,
                (PAGE_HEIGHT_MM * K) as f32,
            ));
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(Font::Regular.resource(), Ref::new(REGULAR_FONT_ID))
                .pair(Font::Bold.resource(), Ref::new(BOLD_FONT_ID));
            page.finish();
            pdf.stream(content_id, &content.finish());
        }
        debug!("finish: {} pages", page_ids.len());

        out.write_all(&pdf.finish())?;
        out.flush()
    }
}

// The built-in fonts only cover the printable ASCII range here.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(sanitize("Porção"), "Por??o");
        assert_eq!(sanitize("a(b)c"), "a(b)c");
    }

    #[test]
    fn text_width_scales_with_size() {
        let w10 = Font::Regular.text_width("Aroma", 10.0);
        let w20 = Font::Regular.text_width("Aroma", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
        assert!(Font::Bold.text_width("Aroma", 10.0) > w10);
    }

    #[test]
    fn breaks_pages_on_overflow() {
        let mut pw = PageWriter::new();
        pw.set_font(Font::Regular, 11.0);
        for i in 0..60 {
            pw.cell(190.0, 8.0, &format!("line {}", i), Align::Left, true);
        }
        // 267mm of usable height per page, 8mm per line.
        assert_eq!(pw.page_count(), 2);
    }

    #[test]
    fn complete_file() {
        let mut pw = PageWriter::new();
        pw.cell(190.0, 10.0, "Hello", Align::Center, true);
        let mut buf: Vec<u8> = Vec::new();
        pw.finish("t", &mut buf).unwrap();
        let s = String::from_utf8_lossy(&buf);
        assert!(s.starts_with("%PDF-"));
        assert!(s.trim_end().ends_with("%%EOF"));
        assert!(s.contains("/Helvetica-Bold"));
        assert!(s.contains("/WinAnsiEncoding"));
        assert!(s.contains("(Hello) Tj"));
    }
}
