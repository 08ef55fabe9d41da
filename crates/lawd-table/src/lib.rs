//! Load and query the Korean legal-district (법정동) code table.
//!
//! The table is a tab-separated file with a header row naming at least the
//! 법정동코드 (10-digit code) and 법정동명 (district name) columns; column
//! order is not assumed. Rows are read once, canonicalized, and kept
//! immutable for the lifetime of the process.
//!
//! Lookups follow a three-tier priority: exact name, name suffix, then
//! substring, with ties inside a tier broken by descending name length.
//! [`DistrictTable::shared`] exposes a process-wide handle that loads on
//! first use and never re-reads afterwards.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::{info, warn};

/// Header name of the 10-digit administrative code column.
pub const CODE_COLUMN: &str = "법정동코드";
/// Header name of the legal-district name column.
pub const NAME_COLUMN: &str = "법정동명";

/// One entry of the legal-district table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRow {
    /// 10 ASCII digits, left-padded.
    pub code: String,
    /// Canonical (whitespace-normalized) district name.
    pub name: String,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read district table: {0}")]
    Io(#[from] std::io::Error),
    #[error("district table has no header row")]
    MissingHeader,
    #[error("district table header has no {0} column")]
    MissingColumn(&'static str),
    #[error("district table contains no usable rows")]
    Empty,
}

/// Immutable, in-memory legal-district table.
#[derive(Debug, Clone)]
pub struct DistrictTable {
    rows: Vec<DistrictRow>,
}

static SHARED: OnceLock<Arc<DistrictTable>> = OnceLock::new();

impl DistrictTable {
    /// Build a table directly from rows. Names are expected to be canonical
    /// already; use [`normalize`] when constructing rows from raw text.
    pub fn from_rows(rows: Vec<DistrictRow>) -> Arc<Self> {
        Arc::new(Self { rows })
    }

    /// Load the table from a tab-separated file with named header columns.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, TableError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    let line = line.trim_start_matches('\u{feff}');
                    if !line.trim().is_empty() {
                        break line.to_string();
                    }
                }
                None => return Err(TableError::MissingHeader),
            }
        };
        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
        let code_idx = columns
            .iter()
            .position(|c| *c == CODE_COLUMN)
            .ok_or(TableError::MissingColumn(CODE_COLUMN))?;
        let name_idx = columns
            .iter()
            .position(|c| *c == NAME_COLUMN)
            .ok_or(TableError::MissingColumn(NAME_COLUMN))?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let code = fields.get(code_idx).copied().unwrap_or("").trim();
            let name = fields.get(name_idx).copied().map_or_else(String::new, normalize);
            if code.is_empty() || name.is_empty() {
                skipped += 1;
                continue;
            }
            rows.push(DistrictRow {
                code: code.to_string(),
                name,
            });
        }

        if skipped > 0 {
            warn!("skipped {skipped} table rows without a code or name");
        }
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        info!("loaded {} district rows", rows.len());
        Ok(Arc::new(Self { rows }))
    }

    /// Process-wide table handle, loaded on first use.
    ///
    /// The first successful load is kept for the lifetime of the process and
    /// never re-read; a failed load is not cached, so a later call may retry.
    /// `path` only matters for the call that actually performs the load.
    pub fn shared<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, TableError> {
        if let Some(table) = SHARED.get() {
            return Ok(Arc::clone(table));
        }
        let table = Self::load_from_file(path)?;
        Ok(Arc::clone(SHARED.get_or_init(|| table)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DistrictRow] {
        &self.rows
    }

    /// First row whose name equals the normalized query, if any.
    pub fn find_exact(&self, query: &str) -> Option<&DistrictRow> {
        let q = normalize(query);
        self.rows.iter().find(|r| r.name == q)
    }

    /// Tiered search: exact, then suffix, then substring. The first tier with
    /// any hit wins; suffix and substring hits are ordered by descending name
    /// length (table order breaks ties, the sort being stable).
    pub fn search(&self, query: &str) -> Vec<&DistrictRow> {
        let q = normalize(query);
        if q.is_empty() {
            return Vec::new();
        }

        let exact: Vec<&DistrictRow> = self.rows.iter().filter(|r| r.name == q).collect();
        if !exact.is_empty() {
            return exact;
        }

        let mut suffix: Vec<&DistrictRow> =
            self.rows.iter().filter(|r| r.name.ends_with(&q)).collect();
        if !suffix.is_empty() {
            sort_by_name_length_desc(&mut suffix);
            return suffix;
        }

        let mut contains: Vec<&DistrictRow> =
            self.rows.iter().filter(|r| r.name.contains(&q)).collect();
        sort_by_name_length_desc(&mut contains);
        contains
    }
}

fn sort_by_name_length_desc(rows: &mut [&DistrictRow]) {
    rows.sort_by_key(|r| std::cmp::Reverse(r.name.chars().count()));
}

/// Collapse every run of Unicode whitespace (the full-width space U+3000
/// included) into a single ASCII space and trim the ends. Idempotent.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  서울\u{3000}강남구\t역삼동\n"), "서울 강남구 역삼동");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["", "  a\u{3000}\u{3000}b  ", "서울  강남구", "\t\n x \r\n"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
