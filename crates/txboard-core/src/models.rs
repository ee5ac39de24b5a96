//! Core data models for the record store

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::month::Month;

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One product transaction, as published by the upstream dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Upstream identifier (not guaranteed unique)
    pub id: i64,
    /// Product title
    #[serde(default)]
    pub title: String,
    /// Sale price
    pub price: f64,
    /// Product description
    #[serde(default)]
    pub description: String,
    /// Product category
    #[serde(default)]
    pub category: String,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Whether the product was sold
    #[serde(default)]
    pub sold: bool,
    /// Sale date as published (usually RFC 3339)
    #[serde(rename = "dateOfSale", default)]
    pub date_of_sale: String,
}

impl TransactionRecord {
    /// Parse the sale date as a UTC timestamp
    ///
    /// Offsets are normalized to UTC; date-only and naive values are
    /// taken as UTC. Date and time may be separated by `T` or a space,
    /// and seconds may be omitted.
    pub fn sale_datetime(&self) -> Option<DateTime<Utc>> {
        let raw = self.date_of_sale.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Calendar month of the sale, if the date parses
    pub fn sale_month(&self) -> Option<Month> {
        self.sale_datetime()
            .and_then(|dt| Month::from_number(dt.month()))
    }

    /// Case-insensitive substring match on title, description or category
    ///
    /// `needle` must already be lowercased.
    pub fn text_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// A page of listing results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPage {
    /// Records on this page, in store order
    pub transactions: Vec<TransactionRecord>,
    /// Number of matching records across all pages
    pub total: usize,
}

#[cfg(test)]
pub(crate) fn record(id: i64, title: &str, price: f64, date_of_sale: &str) -> TransactionRecord {
    TransactionRecord {
        id,
        title: title.to_string(),
        price,
        description: String::new(),
        category: String::new(),
        image: String::new(),
        sold: false,
        date_of_sale: date_of_sale.to_string(),
    }
}
