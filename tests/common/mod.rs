//! Common test utilities: in-memory XLSX workbook synthesis.
//!
//! Tests build their fixtures from scratch with `zip::ZipWriter` instead of
//! shipping binary files; cells are written as inline strings, raw numbers,
//! or booleans so every value path of the reader gets exercised.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// One cell of a synthesized sheet row.
#[derive(Clone, Copy)]
pub enum Cell<'a> {
    /// Inline string cell.
    T(&'a str),
    /// Numeric cell (raw lexical form, e.g. "2" or "2.5").
    N(&'a str),
    /// Boolean cell.
    B(bool),
    /// No cell emitted at this position.
    Empty,
}

/// Convert a 0-based column index to its letter form (A, B, ..., Z, AA, ...).
pub fn col_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        let c = char::from(b'A' + (n % 26) as u8);
        result.insert(0, c);
        n /= 26;
    }
    result
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn sheet_xml(header: &[&str], rows: &[Vec<Cell<'_>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    // Header row (row 1)
    xml.push_str("<row r=\"1\">");
    for (col, name) in header.iter().enumerate() {
        xml.push_str(&format!(
            "<c r=\"{}1\" t=\"inlineStr\"><is><t>{}</t></is></c>",
            col_letter(col),
            escape_xml(name)
        ));
    }
    xml.push_str("</row>");

    // Data rows (row 2+)
    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx + 2;
        xml.push_str(&format!("<row r=\"{row_num}\">"));
        for (col, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", col_letter(col), row_num);
            match cell {
                Cell::T(text) => {
                    if !text.is_empty() {
                        xml.push_str(&format!(
                            "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                            escape_xml(text)
                        ));
                    }
                }
                Cell::N(num) => {
                    xml.push_str(&format!("<c r=\"{cell_ref}\"><v>{num}</v></c>"));
                }
                Cell::B(b) => {
                    let v = if *b { "1" } else { "0" };
                    xml.push_str(&format!("<c r=\"{cell_ref}\" t=\"b\"><v>{v}</v></c>"));
                }
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Build a single-sheet XLSX with the given sheet name, header row, and data
/// rows.
pub fn workbook(sheet_name: &str, header: &[&str], rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(cursor);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let _ = zip.start_file("[Content_Types].xml", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#,
    );

    let _ = zip.start_file("_rels/.rels", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    );

    let _ = zip.start_file("xl/workbook.xml", options);
    let workbook_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
        escape_xml(sheet_name)
    );
    let _ = zip.write_all(workbook_xml.as_bytes());

    let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
    );

    let _ = zip.start_file("xl/worksheets/sheet1.xml", options);
    let _ = zip.write_all(sheet_xml(header, rows).as_bytes());

    zip.finish().expect("zip finish").into_inner()
}

/// Build a workbook whose data cells reference a shared string table
/// (`t="s"`), for the shared-string resolution path.
pub fn workbook_with_shared_strings(
    sheet_name: &str,
    shared: &[&str],
    header: &[&str],
    rows: &[Vec<Option<usize>>],
) -> Vec<u8> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(cursor);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let _ = zip.start_file("[Content_Types].xml", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>"#,
    );

    let _ = zip.start_file("_rels/.rels", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    );

    let _ = zip.start_file("xl/workbook.xml", options);
    let workbook_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
        escape_xml(sheet_name)
    );
    let _ = zip.write_all(workbook_xml.as_bytes());

    let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
    let _ = zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
    );

    let _ = zip.start_file("xl/sharedStrings.xml", options);
    let mut sst = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    for s in shared {
        sst.push_str(&format!("<si><t>{}</t></si>", escape_xml(s)));
    }
    sst.push_str("</sst>");
    let _ = zip.write_all(sst.as_bytes());

    let _ = zip.start_file("xl/worksheets/sheet1.xml", options);
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    xml.push_str("<row r=\"1\">");
    for (col, name) in header.iter().enumerate() {
        xml.push_str(&format!(
            "<c r=\"{}1\" t=\"inlineStr\"><is><t>{}</t></is></c>",
            col_letter(col),
            escape_xml(name)
        ));
    }
    xml.push_str("</row>");
    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx + 2;
        xml.push_str(&format!("<row r=\"{row_num}\">"));
        for (col, cell) in row.iter().enumerate() {
            if let Some(sst_index) = cell {
                xml.push_str(&format!(
                    "<c r=\"{}{}\" t=\"s\"><v>{}</v></c>",
                    col_letter(col),
                    row_num,
                    sst_index
                ));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    let _ = zip.write_all(xml.as_bytes());

    zip.finish().expect("zip finish").into_inner()
}

/// The standard links-sheet header, in the column order the page documents.
pub const LINKS_HEADER: &[&str] = &[
    "section",
    "card_title",
    "card_color",
    "card_order",
    "wide_col",
    "item_group",
    "item_kind",
    "text",
    "url",
    "bold",
    "underline",
];

/// A links-sheet row with every column defaulted to empty.
pub fn links_row<'a>() -> Vec<Cell<'a>> {
    vec![Cell::Empty; LINKS_HEADER.len()]
}

/// Build a links workbook from (column, cell) assignments per row.
pub fn links_workbook(rows: &[Vec<(&str, Cell<'_>)>]) -> Vec<u8> {
    let built: Vec<Vec<Cell<'_>>> = rows
        .iter()
        .map(|assignments| {
            let mut row = links_row();
            for (column, cell) in assignments {
                let idx = LINKS_HEADER
                    .iter()
                    .position(|h| h == column)
                    .expect("unknown links column");
                row[idx] = *cell;
            }
            row
        })
        .collect();
    workbook("Links", LINKS_HEADER, &built)
}
