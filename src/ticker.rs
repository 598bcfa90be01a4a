//! Ticker canonicalization and the single-or-many ticker input type

use serde_json::Value;

use crate::error::{Error, Result};

/// Market-suffix policy applied to every ticker before it reaches the wire.
///
/// Brapi serves B3 instruments, whose exchange spelling carries a `.SA`
/// suffix. Canonicalization strips any existing occurrence of the suffix and
/// appends it exactly once, so it is idempotent and callers may pass either
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSuffix(String);

impl MarketSuffix {
    /// Create a policy for an arbitrary suffix (leading dot included, e.g. `".SA"`).
    pub fn new(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    /// The suffix string itself.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip any occurrence of the suffix, then append it once.
    pub fn canonicalize(&self, ticker: &str) -> String {
        let mut canonical = self.strip(ticker);
        canonical.push_str(&self.0);
        canonical
    }

    /// Remove every occurrence of the suffix from the ticker.
    pub fn strip(&self, ticker: &str) -> String {
        ticker.replace(&self.0, "")
    }
}

impl Default for MarketSuffix {
    fn default() -> Self {
        Self(".SA".to_string())
    }
}

/// One ticker or a collection of tickers, preserving which shape the caller
/// used so result shapes can mirror it (single in, single out).
///
/// Collection entries are kept as raw JSON values: a non-string entry is not
/// an input error, it is skipped with a warning during fan-out. A request
/// whose whole `tickers` argument has the wrong shape (number, object, null)
/// is rejected up front.
#[derive(Debug, Clone)]
pub struct Tickers {
    items: Vec<Value>,
    single: bool,
}

impl Tickers {
    /// A single ticker.
    pub fn one(ticker: impl Into<String>) -> Self {
        Self {
            items: vec![Value::String(ticker.into())],
            single: true,
        }
    }

    /// A collection of tickers.
    pub fn many<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: tickers.into_iter().map(|t| Value::String(t.into())).collect(),
            single: false,
        }
    }

    /// Decode the `tickers` argument of a tool call: a JSON string is a
    /// single ticker, a JSON array is a collection, anything else is an
    /// input-validation error.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::one(s.clone())),
            Value::Array(items) => Ok(Self {
                items: items.clone(),
                single: false,
            }),
            other => Err(Error::InvalidParams(format!(
                "expected a ticker string or an array of tickers, got {}",
                type_name(other)
            ))),
        }
    }

    /// Whether the caller passed a single ticker rather than a collection.
    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Canonical tickers in input order, duplicates collapsed to the first
    /// occurrence. Non-string entries are skipped with a warning.
    pub fn canonical(&self, suffix: &MarketSuffix) -> Vec<String> {
        let mut seen = Vec::new();
        for item in &self.items {
            match item.as_str() {
                Some(ticker) => {
                    let canonical = suffix.canonicalize(ticker);
                    if !seen.contains(&canonical) {
                        seen.push(canonical);
                    }
                }
                None => tracing::warn!(entry = %item, "skipping invalid ticker"),
            }
        }
        seen
    }
}

impl From<&str> for Tickers {
    fn from(ticker: &str) -> Self {
        Tickers::one(ticker)
    }
}

impl From<String> for Tickers {
    fn from(ticker: String) -> Self {
        Tickers::one(ticker)
    }
}

impl From<Vec<String>> for Tickers {
    fn from(tickers: Vec<String>) -> Self {
        Tickers::many(tickers)
    }
}

impl From<&[&str]> for Tickers {
    fn from(tickers: &[&str]) -> Self {
        Tickers::many(tickers.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Tickers {
    fn from(tickers: [&str; N]) -> Self {
        Tickers::many(tickers)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonicalize_appends_suffix() {
        let suffix = MarketSuffix::default();
        assert_eq!(suffix.canonicalize("PETR4"), "PETR4.SA");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let suffix = MarketSuffix::default();
        let once = suffix.canonicalize("VALE3");
        assert_eq!(suffix.canonicalize(&once), once);
    }

    #[test]
    fn custom_suffix_policy() {
        let suffix = MarketSuffix::new(".TO");
        assert_eq!(suffix.canonicalize("SHOP.TO"), "SHOP.TO");
        assert_eq!(suffix.canonicalize("SHOP"), "SHOP.TO");
    }

    #[test]
    fn from_value_accepts_string_and_array() {
        let single = Tickers::from_value(&json!("PETR4")).unwrap();
        assert!(single.is_single());

        let many = Tickers::from_value(&json!(["PETR4", "VALE3"])).unwrap();
        assert!(!many.is_single());
        assert_eq!(
            many.canonical(&MarketSuffix::default()),
            vec!["PETR4.SA", "VALE3.SA"]
        );
    }

    #[test]
    fn from_value_rejects_other_shapes() {
        for bad in [json!(42), json!({"ticker": "PETR4"}), Value::Null] {
            assert!(matches!(
                Tickers::from_value(&bad),
                Err(Error::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn canonical_skips_non_string_entries() {
        let tickers = Tickers::from_value(&json!(["PETR4", 7, "ITUB4.SA"])).unwrap();
        assert_eq!(
            tickers.canonical(&MarketSuffix::default()),
            vec!["PETR4.SA", "ITUB4.SA"]
        );
    }

    #[test]
    fn canonical_collapses_duplicate_spellings() {
        let tickers = Tickers::from_value(&json!(["PETR4", "PETR4.SA"])).unwrap();
        assert_eq!(tickers.canonical(&MarketSuffix::default()), vec!["PETR4.SA"]);
    }
}
