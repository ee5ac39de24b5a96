//! Calendar months for the listing filter

use serde::{Deserialize, Serialize};

/// Calendar month, numbered 1-12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month number, 1 for January
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Month from its 1-based number
    pub fn from_number(n: u32) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
    }

    /// Lowercase English name
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    /// Accepts full English names and three-letter abbreviations, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == lower || (lower.len() == 3 && m.name().starts_with(&lower)))
            .ok_or_else(|| format!("Invalid month: {}", s))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_names() {
        assert_eq!("march".parse::<Month>(), Ok(Month::March));
        assert_eq!("March".parse::<Month>(), Ok(Month::March));
        assert_eq!("DECEMBER".parse::<Month>(), Ok(Month::December));
        assert_eq!(" may ".parse::<Month>(), Ok(Month::May));
    }

    #[test]
    fn test_parse_abbreviations() {
        assert_eq!("mar".parse::<Month>(), Ok(Month::March));
        assert_eq!("Sep".parse::<Month>(), Ok(Month::September));
        assert_eq!("jan".parse::<Month>(), Ok(Month::January));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("Marchy".parse::<Month>().is_err());
        assert!("ma".parse::<Month>().is_err());
        assert!("3".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::December.number(), 12);
        assert_eq!(Month::from_number(3), Some(Month::March));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
        for m in Month::ALL {
            assert_eq!(Month::from_number(m.number()), Some(m));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Month::April.to_string(), "april");
    }
}
