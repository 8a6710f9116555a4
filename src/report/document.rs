//! # Paginated Document Encoder
//!
//! Renders a [`TabularModel`] as a self-contained PDF 1.4 file:
//!
//! ```text
//! Product Report                      <- title, 16pt
//! Generated on: 2024-03-01            <- subtitles, 11pt
//! Total Products: 2
//! +--------+----------+-------+        <- header row, filled, white bold text
//! | Name   | Category | Price |
//! +--------+----------+-------+        <- data rows, 8pt, grid borders
//! | Shirt  | Men      | $20   |
//! +--------+----------+-------+
//!                Page 1 of 1
//! ```
//!
//! Rows that do not fit on the current page move to the next one, and the header row is
//! repeated at the top of every continuation page. A row taller than a whole page is split
//! between text lines: it fills the current page and continues on the following ones, so no
//! cell text is dropped. Cells wrap on word boundaries inside their
//! column; column widths follow content length within bounds.
//!
//! The output depends only on the arguments: no creation date, no document ID and no
//! compression. The same input always yields the same bytes.
//!
//! Only the base-14 Helvetica fonts are used, so nothing is embedded. Text is written in
//! WinAnsi encoding; characters outside it are replaced with `?`.

use super::{ReportError, TabularModel};

const MM: f64 = 72.0 / 25.4;

/// Page geometry and typography, in PDF points measured from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    /// Left and right margin.
    pub margin: f64,
    pub title_baseline: f64,
    pub title_size: f64,
    pub subtitle_baseline: f64,
    pub subtitle_step: f64,
    pub subtitle_size: f64,
    /// Space between the last heading line and the top of the table.
    pub table_gap: f64,
    /// Table top on continuation pages.
    pub continuation_top: f64,
    pub bottom_margin: f64,
    pub cell_size: f64,
    pub cell_padding: f64,
    pub header_fill: [u8; 3],
    pub min_column_width: f64,
    /// Largest share of the table width a single column may take.
    pub max_column_share: f64,
}

impl Default for PageLayout {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 14.0 * MM,
            title_baseline: 20.0 * MM,
            title_size: 16.0,
            subtitle_baseline: 30.0 * MM,
            subtitle_step: 7.0 * MM,
            subtitle_size: 11.0,
            table_gap: 8.0 * MM,
            continuation_top: 14.0 * MM,
            bottom_margin: 20.0 * MM,
            cell_size: 8.0,
            cell_padding: 1.5 * MM,
            header_fill: [66, 139, 202],
            min_column_width: 15.0 * MM,
            max_column_share: 0.6,
        }
    }
}

impl PageLayout {
    fn line_height(&self) -> f64 {
        self.cell_size * 1.15
    }

    fn table_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    fn first_table_top(&self, subtitles: usize) -> f64 {
        let last_heading = match subtitles {
            0 => self.title_baseline,
            n => self.subtitle_baseline + self.subtitle_step * (n - 1) as f64,
        };
        last_heading + self.table_gap
    }

    fn table_bottom(&self) -> f64 {
        self.height - self.bottom_margin
    }
}

/// Encodes with the default A4 layout.
pub fn encode_paginated_document(
    title: &str,
    subtitles: &[String],
    model: &TabularModel,
) -> Result<Vec<u8>, ReportError> {
    encode_paginated_document_with(&PageLayout::default(), title, subtitles, model)
}

pub fn encode_paginated_document_with(
    layout: &PageLayout,
    title: &str,
    subtitles: &[String],
    model: &TabularModel,
) -> Result<Vec<u8>, ReportError> {
    model.check_shape()?;
    if !(layout.cell_size > 0.0 && layout.table_width() > 0.0) {
        return Err(ReportError::Encoding(format!(
            "layout leaves no room for a table: {layout:?}"
        )));
    }

    let table = TablePlan::new(layout, subtitles.len(), model);
    let page_count = table.pages.len();

    let mut streams = Vec::with_capacity(page_count);
    for (index, page) in table.pages.iter().enumerate() {
        let mut content = Content::default();
        if index == 0 {
            content.text(
                Font::Regular,
                layout.title_size,
                layout.margin,
                layout.title_baseline,
                title,
                layout,
            );
            for (n, line) in subtitles.iter().enumerate() {
                let baseline = layout.subtitle_baseline + layout.subtitle_step * n as f64;
                let size = layout.subtitle_size;
                content.text(Font::Regular, size, layout.margin, baseline, line, layout);
            }
        }
        table.draw_page(&mut content, page, layout);

        let footer = format!("Page {} of {}", index + 1, page_count);
        let footer_width = Font::Regular.text_width(&footer, layout.cell_size);
        content.fill_gray(0.0);
        content.text(
            Font::Regular,
            layout.cell_size,
            (layout.width - footer_width) / 2.0,
            layout.height - 10.0 * MM,
            &footer,
            layout,
        );
        streams.push(content.bytes);
    }

    Ok(write_pdf(layout, &streams))
}

// --- Layout ---

struct PagePlan {
    top: f64,
    rows: Vec<WrappedRow>,
}

struct TablePlan {
    widths: Vec<f64>,
    header: WrappedRow,
    pages: Vec<PagePlan>,
}

struct WrappedRow {
    cells: Vec<Vec<String>>,
    height: f64,
}

impl WrappedRow {
    fn new(cells: &[String], widths: &[f64], font: Font, layout: &PageLayout) -> Self {
        let cells: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(text, width)| {
                wrap(text, font, layout.cell_size, width - 2.0 * layout.cell_padding)
            })
            .collect();
        let mut row = Self { cells, height: 0.0 };
        row.measure(layout);
        row
    }

    fn measure(&mut self, layout: &PageLayout) {
        let lines = self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        self.height = lines as f64 * layout.line_height() + 2.0 * layout.cell_padding;
    }

    fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Keeps the first `lines` lines of every cell and returns the rest as a new row.
    fn split_off(&mut self, lines: usize, layout: &PageLayout) -> WrappedRow {
        let cells = self
            .cells
            .iter_mut()
            .map(|cell| cell.split_off(lines.min(cell.len())))
            .collect();
        let mut rest = WrappedRow { cells, height: 0.0 };
        self.measure(layout);
        rest.measure(layout);
        rest
    }
}

/// Whole text lines that fit in `space`, cell padding included.
fn lines_within(space: f64, layout: &PageLayout) -> usize {
    let room = space - 2.0 * layout.cell_padding;
    if room < layout.line_height() {
        return 0;
    }
    (room / layout.line_height()).floor() as usize
}

impl TablePlan {
    fn new(layout: &PageLayout, subtitles: usize, model: &TabularModel) -> Self {
        let first_top = layout.first_table_top(subtitles);
        if model.column_count() == 0 {
            return Self {
                widths: Vec::new(),
                header: WrappedRow {
                    cells: Vec::new(),
                    height: 0.0,
                },
                pages: vec![PagePlan {
                    top: first_top,
                    rows: Vec::new(),
                }],
            };
        }

        let widths = column_widths(layout, model);
        let header = WrappedRow::new(model.headers(), &widths, Font::Bold, layout);
        let page_room = layout.table_bottom() - layout.continuation_top - header.height;

        let mut pages = Vec::new();
        let mut current = PagePlan {
            top: first_top,
            rows: Vec::new(),
        };
        let mut y = first_top + header.height;
        for cells in model.rows() {
            let mut row = WrappedRow::new(cells, &widths, Font::Regular, layout);
            loop {
                let space = layout.table_bottom() - y;
                if row.height <= space {
                    y += row.height;
                    current.rows.push(row);
                    break;
                }

                // Rows that fit on a page move there whole; taller ones fill this page first
                let fresh = current.rows.is_empty();
                let fits = match lines_within(space, layout) {
                    0 if fresh => 1,
                    n => n,
                };
                if fits > 0 && (fresh || row.height > page_room) {
                    let rest = row.split_off(fits, layout);
                    current.rows.push(row);
                    if rest.is_empty() {
                        y = layout.table_bottom();
                        break;
                    }
                    row = rest;
                }

                pages.push(std::mem::replace(
                    &mut current,
                    PagePlan {
                        top: layout.continuation_top,
                        rows: Vec::new(),
                    },
                ));
                y = layout.continuation_top + header.height;
            }
        }
        pages.push(current);

        Self {
            widths,
            header,
            pages,
        }
    }

    fn draw_page(&self, content: &mut Content, page: &PagePlan, layout: &PageLayout) {
        if self.widths.is_empty() {
            return;
        }
        content.line_width(0.1 * MM);
        content.stroke_gray(200.0 / 255.0);

        let mut y = page.top;
        self.draw_row(content, &self.header, Font::Bold, y, layout);
        y += self.header.height;
        for row in &page.rows {
            self.draw_row(content, row, Font::Regular, y, layout);
            y += row.height;
        }
    }

    fn draw_row(
        &self,
        content: &mut Content,
        row: &WrappedRow,
        font: Font,
        top: f64,
        layout: &PageLayout,
    ) {
        let is_header = font == Font::Bold;
        let mut x = layout.margin;
        for (lines, width) in row.cells.iter().zip(&self.widths) {
            if is_header {
                let [r, g, b] = layout.header_fill;
                content.fill_rgb(r, g, b);
                content.rect(x, top, *width, row.height, "f", layout);
            }
            content.rect(x, top, *width, row.height, "S", layout);

            content.fill_gray(if is_header { 1.0 } else { 0.0 });
            for (n, line) in lines.iter().enumerate() {
                let baseline = top
                    + layout.cell_padding
                    + layout.line_height() * n as f64
                    + layout.cell_size * 0.8;
                let x = x + layout.cell_padding;
                content.text(font, layout.cell_size, x, baseline, line, layout);
            }
            x += width;
        }
    }
}

/// Natural width of each column, clamped and scaled to fill the table width.
fn column_widths(layout: &PageLayout, model: &TabularModel) -> Vec<f64> {
    let available = layout.table_width();
    let min = layout.min_column_width.min(available);
    let max = (available * layout.max_column_share).max(min);

    let weights: Vec<f64> = model
        .headers()
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let header_width = widest_line(header, Font::Bold, layout.cell_size);
            let body_width = model
                .rows()
                .iter()
                .map(|row| widest_line(&row[column], Font::Regular, layout.cell_size))
                .fold(0.0, f64::max);
            (header_width.max(body_width) + 2.0 * layout.cell_padding).clamp(min, max)
        })
        .collect();

    let total: f64 = weights.iter().sum();
    weights.iter().map(|w| available * w / total).collect()
}

fn widest_line(text: &str, font: Font, size: f64) -> f64 {
    text.lines()
        .map(|line| font.text_width(line, size))
        .fold(0.0, f64::max)
}

/// Greedy word wrap; words wider than the column are broken between characters.
fn wrap(text: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if font.text_width(&candidate, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                line.push(ch);
                if font.text_width(&line, size) > max_width && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        lines.push(line);
    }
    lines
}

// --- Fonts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

/// Glyph widths for codes 32..=126, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn glyph_width(self, code: u8) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        };
        match code {
            32..=126 => table[(code - 32) as usize],
            _ => 556,
        }
    }

    fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.glyph_width(win_ansi(ch))))
            .sum();
        f64::from(units) * size / 1000.0
    }
}

fn win_ansi(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        '\t' => b' ',
        _ => b'?',
    }
}

// --- Content streams ---

#[derive(Default)]
struct Content {
    bytes: Vec<u8>,
}

impl Content {
    fn op(&mut self, op: &str) {
        self.bytes.extend_from_slice(op.as_bytes());
        self.bytes.push(b'\n');
    }

    fn line_width(&mut self, width: f64) {
        self.op(&format!("{} w", num(width)));
    }

    fn stroke_gray(&mut self, level: f64) {
        self.op(&format!("{} G", num(level)));
    }

    fn fill_gray(&mut self, level: f64) {
        self.op(&format!("{} g", num(level)));
    }

    fn fill_rgb(&mut self, r: u8, g: u8, b: u8) {
        let c = |v: u8| num(f64::from(v) / 255.0);
        self.op(&format!("{} {} {} rg", c(r), c(g), c(b)));
    }

    /// `paint` is `f` (fill) or `S` (stroke).
    fn rect(
        &mut self,
        x: f64,
        top: f64,
        width: f64,
        height: f64,
        paint: &str,
        layout: &PageLayout,
    ) {
        let y = layout.height - top - height;
        self.op(&format!(
            "{} {} {} {} re {paint}",
            num(x),
            num(y),
            num(width),
            num(height)
        ));
    }

    fn text(
        &mut self,
        font: Font,
        size: f64,
        x: f64,
        baseline: f64,
        text: &str,
        layout: &PageLayout,
    ) {
        let y = layout.height - baseline;
        self.op(&format!(
            "BT /{} {} Tf {} {} Td",
            font.resource(),
            num(size),
            num(x),
            num(y)
        ));
        self.bytes.push(b'(');
        for ch in text.chars() {
            let code = win_ansi(ch);
            if matches!(code, b'(' | b')' | b'\\') {
                self.bytes.push(b'\\');
            }
            self.bytes.push(code);
        }
        self.op(") Tj ET");
    }
}

/// Fixed two-decimal rendering with trailing zeros removed.
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

// --- File structure ---

/// Objects: 1 catalog, 2 page tree, 3-4 fonts, then a page and its content per page.
fn write_pdf(layout: &PageLayout, streams: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::new();

    let mut object = |out: &mut Vec<u8>, body: &[u8]| {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    };

    let page_id = |index: usize| 5 + 2 * index;
    let kids: Vec<String> = (0..streams.len())
        .map(|index| format!("{} 0 R", page_id(index)))
        .collect();

    object(&mut out, b"<< /Type /Catalog /Pages 2 0 R >>");
    object(
        &mut out,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            streams.len()
        )
        .as_bytes(),
    );
    for base_font in ["Helvetica", "Helvetica-Bold"] {
        object(
            &mut out,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} \
                 /Encoding /WinAnsiEncoding >>"
            )
            .as_bytes(),
        );
    }
    for (index, stream) in streams.iter().enumerate() {
        object(
            &mut out,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                num(layout.width),
                num(layout.height),
                page_id(index) + 1
            )
            .as_bytes(),
        );
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"\nendstream");
        object(&mut out, &body);
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}
