//! Common types used across multiple endpoints
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sort order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl From<&str> for SortOrder {
    fn from(value: &str) -> Self {
        match value {
            "desc" => SortOrder::Desc,
            _ => SortOrder::Asc, // default to ascending
        }
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        SortOrder::from(value.as_str())
    }
}

/// Sort field for the listing endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Company name
    Name,
    /// Last closing price
    Close,
    /// Price change
    Change,
    /// Trading volume
    Volume,
    /// Market capitalization
    MarketCap,
}

impl FromStr for SortBy {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "close" => Ok(SortBy::Close),
            "change" => Ok(SortBy::Change),
            "volume" => Ok(SortBy::Volume),
            "market_cap" => Ok(SortBy::MarketCap),
            _ => Err(crate::error::Error::InvalidParams(format!("Invalid sort field: {s}"))),
        }
    }
}

/// Historical data range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum Range {
    /// 1 day
    #[serde(rename = "1d")]
    OneDay,
    /// 5 days
    #[serde(rename = "5d")]
    FiveDays,
    /// 1 month
    #[serde(rename = "1mo")]
    OneMonth,
    /// 3 months
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// 6 months
    #[serde(rename = "6mo")]
    SixMonths,
    /// 1 year
    #[serde(rename = "1y")]
    OneYear,
    /// 2 years
    #[serde(rename = "2y")]
    TwoYears,
    /// 5 years
    #[serde(rename = "5y")]
    FiveYears,
    /// 10 years
    #[serde(rename = "10y")]
    TenYears,
    /// Year to date
    #[serde(rename = "ytd")]
    Ytd,
    /// Maximum available history
    #[serde(rename = "max")]
    Max,
}

impl FromStr for Range {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Range::OneDay),
            "5d" => Ok(Range::FiveDays),
            "1mo" => Ok(Range::OneMonth),
            "3mo" => Ok(Range::ThreeMonths),
            "6mo" => Ok(Range::SixMonths),
            "1y" => Ok(Range::OneYear),
            "2y" => Ok(Range::TwoYears),
            "5y" => Ok(Range::FiveYears),
            "10y" => Ok(Range::TenYears),
            "ytd" => Ok(Range::Ytd),
            "max" => Ok(Range::Max),
            _ => Err(crate::error::Error::InvalidParams(format!("Invalid range: {s}"))),
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Range::OneDay => "1d",
            Range::FiveDays => "5d",
            Range::OneMonth => "1mo",
            Range::ThreeMonths => "3mo",
            Range::SixMonths => "6mo",
            Range::OneYear => "1y",
            Range::TwoYears => "2y",
            Range::FiveYears => "5y",
            Range::TenYears => "10y",
            Range::Ytd => "ytd",
            Range::Max => "max",
        };
        write!(f, "{s}")
    }
}

/// Historical data interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum Interval {
    /// 1 minute
    #[serde(rename = "1m")]
    OneMin,
    /// 2 minutes
    #[serde(rename = "2m")]
    TwoMin,
    /// 5 minutes
    #[serde(rename = "5m")]
    FiveMin,
    /// 15 minutes
    #[serde(rename = "15m")]
    FifteenMin,
    /// 30 minutes
    #[serde(rename = "30m")]
    ThirtyMin,
    /// 60 minutes
    #[serde(rename = "60m")]
    SixtyMin,
    /// 90 minutes
    #[serde(rename = "90m")]
    NinetyMin,
    /// 1 hour
    #[serde(rename = "1h")]
    OneHour,
    /// 1 day
    #[serde(rename = "1d")]
    OneDay,
    /// 5 days
    #[serde(rename = "5d")]
    FiveDays,
    /// 1 week
    #[serde(rename = "1wk")]
    OneWeek,
    /// 1 month
    #[serde(rename = "1mo")]
    OneMonth,
    /// 3 months
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl Interval {
    /// Whether this interval is finer than one day. Historical timestamps
    /// are epoch seconds either way; intraday granularity only matters to
    /// callers formatting the index.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::OneMin
                | Interval::TwoMin
                | Interval::FiveMin
                | Interval::FifteenMin
                | Interval::ThirtyMin
                | Interval::SixtyMin
                | Interval::NinetyMin
                | Interval::OneHour
        )
    }
}

impl FromStr for Interval {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(Interval::OneMin),
            "2m" => Ok(Interval::TwoMin),
            "5m" => Ok(Interval::FiveMin),
            "15m" => Ok(Interval::FifteenMin),
            "30m" => Ok(Interval::ThirtyMin),
            "60m" => Ok(Interval::SixtyMin),
            "90m" => Ok(Interval::NinetyMin),
            "1h" => Ok(Interval::OneHour),
            "1d" => Ok(Interval::OneDay),
            "5d" => Ok(Interval::FiveDays),
            "1wk" => Ok(Interval::OneWeek),
            "1mo" => Ok(Interval::OneMonth),
            "3mo" => Ok(Interval::ThreeMonths),
            _ => Err(crate::error::Error::InvalidParams(format!("Invalid interval: {s}"))),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Interval::OneMin => "1m",
            Interval::TwoMin => "2m",
            Interval::FiveMin => "5m",
            Interval::FifteenMin => "15m",
            Interval::ThirtyMin => "30m",
            Interval::SixtyMin => "60m",
            Interval::NinetyMin => "90m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::FiveDays => "5d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
            Interval::ThreeMonths => "3mo",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_round_trips_through_strings() {
        for s in ["1d", "3mo", "ytd", "max"] {
            assert_eq!(Range::from_str(s).unwrap().to_string(), s);
        }
        assert!(Range::from_str("2w").is_err());
    }

    #[test]
    fn interval_classifies_intraday() {
        assert!(Interval::FiveMin.is_intraday());
        assert!(Interval::OneHour.is_intraday());
        assert!(!Interval::OneDay.is_intraday());
        assert!(!Interval::OneMonth.is_intraday());
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        assert!(matches!(SortOrder::from("desc"), SortOrder::Desc));
        assert!(matches!(SortOrder::from("unknown"), SortOrder::Asc));
    }
}
