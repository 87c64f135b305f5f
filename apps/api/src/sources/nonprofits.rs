//! IRS Business Master File extract (single state) filtered by ZIP.
//!
//! The file is scanned in full on every call. There is no index and nothing
//! is kept between calls; the file is only ever opened read-only, so
//! concurrent scans are independent.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::models::area::AreaCode;
use crate::models::profile::NonprofitRecord;
use crate::sources::{Lookup, NonprofitSource, SourceError};

/// Candidate ZIP headers, in priority order.
const ZIP_COLUMNS: &[&str] = &["ZIP", "ZIP_CD", "ZIPCODE"];
const EIN_COLUMNS: &[&str] = &["EIN", "EIN_NUM"];

#[derive(Debug, Clone)]
pub struct NonprofitRegistry {
    path: PathBuf,
}

impl NonprofitRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NonprofitSource for NonprofitRegistry {
    async fn find_by_zip(&self, area: &AreaCode) -> Lookup<Vec<NonprofitRecord>> {
        let path = self.path.clone();
        let target = area.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || scan_file(&path, &target))
            .await
            .unwrap_or_else(|e| Err(SourceError::Dataset(format!("scan task failed: {e}"))));

        Lookup::from_result("irs_bmf", area, result)
    }
}

fn scan_file(path: &Path, target: &str) -> Result<Vec<NonprofitRecord>, SourceError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::MissingDataset(path.to_path_buf()),
        _ => SourceError::Io(e),
    })?;

    let matches = scan_reader(file, target)?;
    debug!(path = %path.display(), zip = target, count = matches.len(), "BMF scan complete");
    Ok(matches)
}

/// Header positions, resolved once per scan.
struct Columns {
    zip: Vec<usize>,
    ein: Vec<usize>,
    name: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
    subsection: Option<usize>,
    ntee: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let positions = |names: &[&str]| -> Vec<usize> {
            names.iter().filter_map(|n| position(n)).collect()
        };

        Self {
            zip: positions(ZIP_COLUMNS),
            ein: positions(EIN_COLUMNS),
            name: position("NAME"),
            city: position("CITY"),
            state: position("STATE"),
            subsection: position("SUBSECTION"),
            ntee: position("NTEE_CD"),
            status: position("STATUS"),
        }
    }
}

/// Collects matching rows in file order. Short or long rows are accepted and
/// missing cells read as empty; only I/O or parse errors fail the scan.
fn scan_reader<R: Read>(reader: R, target: &str) -> Result<Vec<NonprofitRecord>, SourceError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| SourceError::Dataset(e.to_string()))?
        .iter()
        .map(|h| latin1(h).trim().to_string())
        .collect();
    let columns = Columns::resolve(&headers);

    let mut matches = Vec::new();
    let mut record = ByteRecord::new();

    while csv_reader
        .read_byte_record(&mut record)
        .map_err(|e| SourceError::Dataset(e.to_string()))?
    {
        let raw_zip = first_non_empty(&record, &columns.zip);
        if strip_zip4(&raw_zip) != target {
            continue;
        }

        matches.push(NonprofitRecord {
            name: title_case(&cell(&record, columns.name)),
            city: title_case(&cell(&record, columns.city)),
            state: cell(&record, columns.state),
            ein: first_non_empty(&record, &columns.ein),
            subsection_code: cell(&record, columns.subsection),
            classification: cell(&record, columns.ntee),
            status: cell(&record, columns.status),
        });
    }

    Ok(matches)
}

/// Each byte is its own code point, so decoding never fails.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn cell(record: &ByteRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .map(latin1)
        .unwrap_or_default()
}

fn first_non_empty(record: &ByteRecord, indices: &[usize]) -> String {
    indices
        .iter()
        .filter_map(|&i| record.get(i))
        .find(|value| !value.is_empty())
        .map(latin1)
        .unwrap_or_default()
}

/// `92008-1234` → `92008`.
fn strip_zip4(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.split('-').next().unwrap_or(trimmed)
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}
