//! Workbook reading - turns XLSX bytes into header-keyed row records.
//!
//! This is the crate's stand-in for a full spreadsheet library: it decodes
//! exactly what the link page needs (one sheet, stringified cell values,
//! empty-string defaults for missing cells) and nothing else: no styles,
//! no formulas, no dates.

mod worksheet;

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::error::{LinkdeckError, Result};

use worksheet::read_sheet_cells;

/// Sheet metadata from workbook.xml
struct SheetInfo {
    name: String,
    path: String,
}

/// One spreadsheet row keyed by column header.
///
/// Missing columns read as the empty string, mirroring the `defval: ''`
/// behavior of a sheet-to-JSON conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    fields: HashMap<String, String>,
}

impl RowRecord {
    /// Cell value under `column`, or `""` when the row has no such cell.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// True when every cell in the row is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}

impl FromIterator<(String, String)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Read the rows of `sheet_name` (falling back to the first sheet) from an
/// XLSX byte buffer.
///
/// The first populated row is the header row; every following populated row
/// becomes one [`RowRecord`]. Fully empty rows are dropped.
///
/// # Errors
/// Returns an error if the buffer is not a readable XLSX archive or the
/// workbook contains no sheets. Malformed individual cells never error;
/// they read as empty strings.
pub fn read_rows(data: &[u8], sheet_name: &str) -> Result<Vec<RowRecord>> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    let relationships = parse_workbook_relationships(&mut archive);
    let sheets = get_sheet_info(&mut archive, &relationships)?;

    let sheet = sheets
        .iter()
        .find(|s| s.name == sheet_name)
        .or_else(|| sheets.first())
        .ok_or(LinkdeckError::MissingSheet)?;

    let shared_strings = parse_shared_strings(&mut archive);
    let cells = read_sheet_cells(&mut archive, &sheet.path, &shared_strings)?;

    // Regroup the flat cell stream by row, keeping source order.
    let mut by_row: BTreeMap<u32, Vec<(u32, String)>> = BTreeMap::new();
    for (row, col, value) in cells {
        by_row.entry(row).or_default().push((col, value));
    }

    let mut rows = by_row.into_values();
    let Some(header_cells) = rows.next() else {
        return Ok(Vec::new());
    };

    // Column index -> header name; duplicate headers resolve to the last
    // column carrying the name, unnamed columns are unreachable and skipped.
    let mut headers: BTreeMap<u32, String> = BTreeMap::new();
    for (col, name) in header_cells {
        if !name.is_empty() {
            headers.insert(col, name);
        }
    }

    let mut records = Vec::new();
    for row_cells in rows {
        let values: HashMap<u32, String> = row_cells.into_iter().collect();
        let record: RowRecord = headers
            .iter()
            .map(|(col, name)| {
                let value = values.get(col).cloned().unwrap_or_default();
                (name.clone(), value)
            })
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Parse workbook.xml.rels to map relationship ids to archive paths.
fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> HashMap<String, String> {
    let mut rels = HashMap::new();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional; default paths apply
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            b"Target" => {
                                target = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, resolve_target_path(&target));
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Relationship targets are relative to xl/; absolute targets keep their path.
fn resolve_target_path(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Parse workbook.xml for the sheet list (name + archive path).
fn get_sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let file = archive.by_name("xl/workbook.xml")?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    let mut name = String::new();
                    let mut r_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            // r:id attribute (namespace prefixed)
                            key if key.ends_with(b":id") || key == b"id" => {
                                r_id = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        // Try to get path from relationships, fallback to default
                        let path = relationships.get(&r_id).cloned().unwrap_or_else(|| {
                            let idx = sheets.len() + 1;
                            format!("xl/worksheets/sheet{idx}.xml")
                        });
                        sheets.push(SheetInfo { name, path });
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    if sheets.is_empty() {
        return Err(LinkdeckError::MissingSheet);
    }

    Ok(sheets)
}

/// Parse the shared string table. Rich-text runs concatenate their `<t>` parts.
fn parse_shared_strings<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    let Ok(file) = archive.by_name("xl/sharedStrings.xml") else {
        return Vec::new(); // SharedStrings is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"t" if in_si => {
                    in_t = true;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current_string.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(current_string.clone());
                    in_si = false;
                }
                b"t" => {
                    in_t = false;
                }
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}
