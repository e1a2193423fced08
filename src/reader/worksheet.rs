//! Worksheet decoding - reads one sheet XML into a flat stream of cell texts.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Read every non-empty cell of one sheet as `(row, col, text)`, 0-indexed,
/// in document order.
///
/// Cell values stringify the way a sheet-to-JSON conversion would: shared
/// and inline strings resolve to their text, booleans become `"true"` /
/// `"false"`, numbers keep a canonical lexical form.
pub(super) fn read_sheet_cells<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<Vec<(u32, u32, String)>> {
    let file = archive.by_name(path)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut cells = Vec::new();
    let mut buf = Vec::new();

    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    // Position and type of the <c> element currently open.
    let mut open_cell: Option<(u32, u32, CellTypeTag)> = None;
    let mut pending_text = String::new();
    let mut in_v = false;
    let mut in_is = false;
    let mut in_is_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"r" {
                                if let Some(r) = parse_row_number(&attr.value) {
                                    current_row = r.saturating_sub(1);
                                }
                            }
                        }
                        next_col = 0;
                    }
                    b"c" => {
                        let mut pos = (current_row, next_col);
                        let mut tag = CellTypeTag::Default;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    if let Some((col, row)) = parse_cell_ref_bytes(&attr.value) {
                                        pos = (row, col);
                                    }
                                }
                                b"t" => {
                                    tag = parse_cell_type_tag(&attr.value);
                                }
                                _ => {}
                            }
                        }

                        next_col = pos.1 + 1;
                        if is_start {
                            pending_text.clear();
                            open_cell = Some((pos.0, pos.1, tag));
                        }
                        // An empty <c/> carries no value; nothing to emit.
                    }
                    b"v" if is_start && open_cell.is_some() => {
                        in_v = true;
                    }
                    b"is" if is_start && open_cell.is_some() => {
                        in_is = true;
                    }
                    b"t" if is_start && in_is => {
                        in_is_t = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_v || in_is_t => {
                if let Ok(text) = e.unescape() {
                    pending_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" => {
                    in_v = false;
                }
                b"t" if in_is => {
                    in_is_t = false;
                }
                b"is" => {
                    in_is = false;
                }
                b"c" => {
                    if let Some((row, col, tag)) = open_cell.take() {
                        let value = resolve_cell_text(tag, &pending_text, shared_strings);
                        if !value.is_empty() {
                            cells.push((row, col, value));
                        }
                    }
                    pending_text.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

fn parse_row_number(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    seen.then_some(num)
}

fn resolve_cell_text(tag: CellTypeTag, raw: &str, shared_strings: &[String]) -> String {
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .cloned()
            .unwrap_or_default(),
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error => raw.to_string(),
        CellTypeTag::Bool => {
            if raw.trim() == "1" {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        CellTypeTag::Default => canonicalize_number(raw),
    }
}

/// Numbers stringify the way a JS runtime would: `2`, `2.0`, and `2e0` all
/// read back as `"2"`. Non-numeric text keeps its raw form.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn canonicalize_number(raw: &str) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < MAX_EXACT => {
            format!("{}", v as i64)
        }
        Ok(v) if v.is_finite() => format!("{v}"),
        _ => raw.to_string(),
    }
}
