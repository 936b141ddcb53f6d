use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number pattern");
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("valid digits pattern");
}

const MISSING: &[&str] = &["", "N/A", "n/a", "-", "Unknown"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y", "%m/%d/%Y"];

/// How the cells of a column compare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnKind {
    /// Lexicographic.
    #[default]
    Text,
    /// The first decimal number in the cell, e.g. a score of `7.5 (High)`.
    Numeric,
    /// Natural order, numbers embedded in the text compare by value.
    Identifier,
    Date,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Whether `previous` may come before `next`. Ties are always allowed.
    pub fn allows(&self, previous: &CellValue, next: &CellValue) -> bool {
        match self {
            Self::Ascending => previous.compare(next) != Ordering::Greater,
            Self::Descending => previous.compare(next) != Ordering::Less,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    /// Digits without leading zeros, so comparing by length then lexically compares by value.
    Number(usize, String),
    Text(String),
}

/// A cell converted for comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Number(f64),
    Identifier(Vec<Chunk>),
    Date(NaiveDate),
}

impl CellValue {
    /// Convert the displayed text of a cell. `None` if it doesn't fit the column kind.
    pub fn parse(kind: ColumnKind, text: &str) -> Option<Self> {
        let text = text.trim();
        if MISSING.contains(&text) {
            return Some(Self::Missing);
        }

        match kind {
            ColumnKind::Text => Some(Self::Text(text.to_string())),
            ColumnKind::Numeric => NUMBER
                .find(text)
                .and_then(|m| m.as_str().parse().ok())
                .map(Self::Number),
            ColumnKind::Identifier => Some(Self::Identifier(chunks(text))),
            ColumnKind::Date => parse_date(text).map(Self::Date),
        }
    }

    /// Missing values order before everything else. Values of different kinds never meet in
    /// one column.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Identifier(a), Self::Identifier(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn chunks(text: &str) -> Vec<Chunk> {
    let mut result = Vec::new();
    let mut offset = 0;
    for digits in DIGITS.find_iter(text) {
        if digits.start() > offset {
            result.push(Chunk::Text(text[offset..digits.start()].to_string()));
        }
        let value = digits.as_str().trim_start_matches('0');
        result.push(Chunk::Number(value.len(), value.to_string()));
        offset = digits.end();
    }
    if offset < text.len() {
        result.push(Chunk::Text(text[offset..].to_string()));
    }
    result
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
