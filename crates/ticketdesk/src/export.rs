//! Export the visible table as an image.
//!
//! The table is drawn as SVG: a header row followed by one row per record,
//! with fixed column widths and text clipped to its column.

use std::fmt::Write as _;

use crate::record::{DayZone, Record};

/// Default output file name.
pub const DEFAULT_EXPORT_FILE: &str = "table-data.svg";

const ROW_HEIGHT: u32 = 28;
const PADDING: u32 = 8;
const FONT_SIZE: u32 = 13;
const CHAR_WIDTH: u32 = 7;

/// Column title and width in pixels.
const COLUMNS: &[(&str, u32)] = &[
    ("Date", 100),
    ("Name", 140),
    ("Division", 120),
    ("Problem", 240),
    ("Solving", 240),
    ("Device", 120),
];

/// Format a date the way the table shows it: `d/m/YYYY`.
#[must_use]
pub fn display_date(record: &Record, zone: DayZone) -> String {
    record.local_date(zone).format("%-d/%-m/%Y").to_string()
}

/// Render `records` as an SVG table.
#[must_use]
pub fn render_svg(records: &[&Record], zone: DayZone) -> String {
    let width: u32 = COLUMNS.iter().map(|(_, w)| w).sum();
    let rows = u32::try_from(records.len()).unwrap_or(u32::MAX - 1) + 1;
    let height = rows.saturating_mul(ROW_HEIGHT);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="{FONT_SIZE}">"#
    );
    let _ = writeln!(
        svg,
        r##"<rect x="0" y="0" width="{width}" height="{ROW_HEIGHT}" fill="#f3f4f6"/>"##
    );

    let header: Vec<String> = COLUMNS.iter().map(|(title, _)| (*title).to_string()).collect();
    write_row(&mut svg, 0, &header, "bold");

    for (index, record) in (1u32..).zip(records) {
        let cells = vec![
            display_date(record, zone),
            record.name.clone(),
            record.division.clone(),
            record.problem.clone(),
            record.solving.clone(),
            record.device.clone(),
        ];
        let y = index.saturating_mul(ROW_HEIGHT);
        let _ = writeln!(
            svg,
            r##"<line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="#e5e7eb"/>"##
        );
        write_row(&mut svg, index, &cells, "normal");
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_row(svg: &mut String, row: u32, cells: &[String], weight: &str) {
    let baseline = row.saturating_mul(ROW_HEIGHT) + ROW_HEIGHT / 2 + FONT_SIZE / 2 - 1;
    let mut x = 0;
    for ((_, column_width), text) in COLUMNS.iter().zip(cells) {
        let max_chars = ((column_width - 2 * PADDING) / CHAR_WIDTH) as usize;
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{baseline}" font-weight="{weight}">{}</text>"#,
            x + PADDING,
            escape_xml(&clip(text, max_chars))
        );
        x += column_width;
    }
}

/// Shorten `text` to `max_chars`, marking the cut with an ellipsis.
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
