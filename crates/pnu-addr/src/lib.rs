//! Turn a free-form Korean address fragment into a 19-digit PNU.
//!
//! The pipeline is deliberately simple and runs once per call:
//! 1. Guess the district-name token inside the text (the rightmost word
//!    ending in an administrative suffix syllable).
//! 2. Resolve the token against the legal-district table, exact match first,
//!    then the tiered search; fall back to matching the whole raw input when
//!    the token finds nothing.
//! 3. With exactly one surviving candidate, pull the mountain flag and lot
//!    numbers out of the raw text and encode `code + flag + main + sub`.
//! Zero or several candidates end in [`Resolution::Ambiguous`]; the caller
//! decides what to tell the user.
//!
//! "Rightmost wins" (both for the suffixed token and for the lot number
//! group) is policy, not accident: later suffixed tokens name the more
//! specific region, and building or road numbers commonly precede the lot.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use lawd_table::{DistrictRow, DistrictTable};

pub use lawd_table::normalize;

lazy_static! {
    /// Anything that is not a Hangul syllable or whitespace.
    static ref NON_HANGUL: Regex = Regex::new(r"[^가-힣\s]").unwrap();

    /// Shortest syllable run ending in an administrative suffix. A candidate
    /// never spans whitespace, so a city prefix does not glue onto the token.
    static ref DISTRICT_SUFFIXED: Regex = Regex::new("[가-힣]+?(?:동|리|가|읍|면)").unwrap();

    /// A lot number: digits, optionally a dash and more digits.
    static ref LOT_NUMBER: Regex = Regex::new(r"([0-9]+)(?:\s*-\s*([0-9]+))?").unwrap();
}

/// The 산 marker distinguishing mountain-forest lots from ordinary lots.
const MOUNTAIN_MARKER: char = '산';

/// One table row a query could refer to, deduplicated by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub code: String,
    pub name: String,
}

impl From<&DistrictRow> for Candidate {
    fn from(row: &DistrictRow) -> Self {
        Self {
            code: row.code.clone(),
            name: row.name.clone(),
        }
    }
}

/// Mountain flag and lot numbers, read from the raw input text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotInfo {
    pub mountain: bool,
    pub main_lot: Option<u32>,
    pub sub_lot: Option<u32>,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub input: String,
    pub token: Option<String>,
    pub code: String,
    pub name: String,
    pub lot: LotInfo,
    pub pnu: String,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Resolved),
    /// Zero candidates means no match at all; two or more need the caller to
    /// ask the user for a municipality.
    Ambiguous { candidates: Vec<Candidate> },
}

/// Guess the most specific district-name-like token inside free text.
///
/// Everything that is not a Hangul syllable is projected to a space first, so
/// building numbers, lot numbers, and Latin noise disappear. Returns the
/// rightmost suffixed word, the whole Hangul-only text when no word carries a
/// suffix, or `None` when nothing Hangul survives.
pub fn extract_district_token(text: &str) -> Option<String> {
    let hangul_only = NON_HANGUL.replace_all(text, " ");
    let simplified = normalize(&hangul_only);
    if let Some(m) = DISTRICT_SUFFIXED.find_iter(&simplified).last() {
        return Some(normalize(m.as_str()));
    }
    if simplified.is_empty() {
        None
    } else {
        Some(simplified)
    }
}

/// Extract the mountain flag and lot numbers from raw input text.
///
/// The 산 marker is removed before the numeric scan so that "산162-1" still
/// yields 162-1. Of all `digits(-digits)` groups, the last one is the lot;
/// a missing dash portion means sub lot 0. No digits at all leaves both lots
/// absent. A number too large for `u32` degrades to an absent field.
pub fn parse_lot(text: &str) -> LotInfo {
    let mountain = text.contains(MOUNTAIN_MARKER);
    let stripped: String = text.chars().filter(|c| *c != MOUNTAIN_MARKER).collect();
    match LOT_NUMBER.captures_iter(&stripped).last() {
        Some(caps) => {
            let main_lot = caps[1].parse().ok();
            let sub_lot = match caps.get(2) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            };
            LotInfo {
                mountain,
                main_lot,
                sub_lot,
            }
        }
        None => LotInfo {
            mountain,
            main_lot: None,
            sub_lot: None,
        },
    }
}

/// Format the 19-character PNU: 10-digit code, mountain digit, 4-digit main
/// lot, 4-digit sub lot. Absent lots encode as zero.
pub fn encode_pnu(code: &str, lot: &LotInfo) -> String {
    let flag = if lot.mountain { 1 } else { 0 };
    format!(
        "{:0>10}{}{:04}{:04}",
        code,
        flag,
        lot.main_lot.unwrap_or(0),
        lot.sub_lot.unwrap_or(0)
    )
}

/// Resolve one address fragment against the district table.
pub fn resolve(table: &DistrictTable, text: &str) -> Resolution {
    let token = extract_district_token(text);
    let mut candidates = match &token {
        Some(t) => candidates_for(table, t),
        None => Vec::new(),
    };
    if candidates.is_empty() {
        candidates = candidates_for(table, text);
    }

    if candidates.len() == 1 {
        let chosen = candidates.remove(0);
        let lot = parse_lot(text);
        let pnu = encode_pnu(&chosen.code, &lot);
        return Resolution::Resolved(Resolved {
            input: text.to_string(),
            token,
            code: chosen.code,
            name: chosen.name,
            lot,
            pnu,
        });
    }
    Resolution::Ambiguous { candidates }
}

/// An exact textual match is unambiguous and short-circuits the tiered
/// search; otherwise search and deduplicate by code.
fn candidates_for(table: &DistrictTable, query: &str) -> Vec<Candidate> {
    if let Some(row) = table.find_exact(query) {
        return vec![Candidate::from(row)];
    }
    dedup_by_code(table.search(query))
}

fn dedup_by_code(rows: Vec<&DistrictRow>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if seen.insert(row.code.as_str()) {
            out.push(Candidate::from(row));
        }
    }
    out
}
