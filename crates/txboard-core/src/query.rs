//! Listing query construction
//!
//! A listing request carries free-text `search`, an optional `month` and
//! pagination. [`TransactionFilter`] is the store-independent form of the
//! first two; [`Page`] is the third. Stores either evaluate the filter
//! directly ([`TransactionFilter::matches`]) or translate it into their
//! own query language.

use std::num::IntErrorKind;
use txboard_config::PaginationConfig;

use crate::error::{CoreError, CoreResult};
use crate::models::{TransactionPage, TransactionRecord};
use crate::month::Month;

/// Free-text search term
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    /// Lowercased term used for substring matching
    pub needle: String,
    /// Exact price to match, when the term reads as a number
    pub price: Option<f64>,
}

impl SearchFilter {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
            price: parse_numeric_search(term),
        }
    }

    /// Title, description or category contains the term, or price equals it
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.text_contains(&self.needle) || self.price.map_or(false, |p| record.price == p)
    }
}

/// Combined search and month filter (AND)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: Option<SearchFilter>,
    pub month: Option<Month>,
}

impl TransactionFilter {
    /// Build a filter from raw request values
    ///
    /// Empty strings mean "no constraint". An unrecognized month is an
    /// error rather than a filter that matches nothing.
    pub fn build(search: Option<&str>, month: Option<&str>) -> CoreResult<Self> {
        let search = search.filter(|s| !s.is_empty()).map(SearchFilter::new);

        let month = match month.filter(|m| !m.trim().is_empty()) {
            Some(raw) => Some(raw.parse::<Month>().map_err(|_| CoreError::InvalidMonth {
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(Self { search, month })
    }

    /// Evaluate the filter against one record
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some(month) = self.month {
            if record.sale_month() != Some(month) {
                return false;
            }
        }
        self.search.as_ref().map_or(true, |s| s.matches(record))
    }

    /// Filter, count and slice an in-order record set
    pub fn paginate<'a, I>(&self, records: I, page: Page) -> TransactionPage
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut total = 0;
        let mut transactions = Vec::new();
        let offset = page.offset();

        for record in records.into_iter().filter(|r| self.matches(r)) {
            if total >= offset && transactions.len() < page.per_page {
                transactions.push(record.clone());
            }
            total += 1;
        }

        TransactionPage { transactions, total }
    }
}

/// 1-based page of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub per_page: usize,
}

impl Page {
    /// Page number and size are both at least 1
    pub fn new(number: usize, per_page: usize) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parse request values, falling back to defaults for anything unusable
    ///
    /// A page number too large for `usize` still means "past the end", so
    /// it saturates instead of falling back to the first page.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>, config: &PaginationConfig) -> Self {
        let number = page.and_then(parse_positive).unwrap_or(1);
        let per_page = per_page
            .and_then(parse_positive)
            .unwrap_or(config.default_per_page)
            .min(config.max_per_page);

        Self::new(number, per_page)
    }

    /// Number of matching records before this page
    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Positive integer request value; overflow saturates to `usize::MAX`
fn parse_positive(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

/// Read a search term as a number the way JavaScript's `Number()` does
///
/// Surrounding whitespace is ignored and whitespace-only input is 0.
/// Accepts decimal literals (with optional sign, fraction and exponent),
/// `Infinity`, and unsigned `0x`/`0o`/`0b` integers. Returns `None` for
/// everything else.
pub fn parse_numeric_search(term: &str) -> Option<f64> {
    let s = term.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_prefixed(&s[2..], radix);
    }

    // f64::from_str also takes "inf" and "nan"; Number() does not
    if !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Digits of a `0x`/`0o`/`0b` literal; no sign, no separators
fn parse_prefixed(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    match u128::from_str_radix(digits, radix) {
        Ok(n) => Some(n as f64),
        // wider than u128
        Err(_) => Some(digits.chars().fold(0.0, |acc, c| {
            acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
        })),
    }
}
