//! Envelope routing for provider responses
//!
//! Brapi wraps the substantive payload of each endpoint under a different
//! top-level key (`results` for quotes, `stocks` for the listing endpoint,
//! `coins` for crypto, ...). Rather than probing keys ad hoc at every call
//! site, the known envelope shapes are decoded into one tagged union with an
//! explicit priority table; payloads that match none of the known shapes
//! pass through unchanged as [`Envelope::Other`].

use serde_json::Value;

/// Decode table: candidate top-level keys in priority order. When a payload
/// carries more than one known key, the earlier entry wins.
const DECODE_TABLE: [(&str, fn(Value) -> Envelope); 6] = [
    ("results", Envelope::Results),
    ("stocks", Envelope::Stocks),
    ("currency", Envelope::Currency),
    ("inflation", Envelope::Inflation),
    ("prime-rate", Envelope::PrimeRate),
    ("coins", Envelope::Coins),
];

/// A provider response with its wrapping classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Quote endpoint payload (`results`)
    Results(Value),
    /// Listing endpoint payload (`stocks`)
    Stocks(Value),
    /// Currency endpoint payload (`currency`)
    Currency(Value),
    /// Inflation endpoint payload (`inflation`)
    Inflation(Value),
    /// Prime rate endpoint payload (`prime-rate`)
    PrimeRate(Value),
    /// Crypto endpoint payload (`coins`)
    Coins(Value),
    /// No known envelope key present; carries the payload unchanged.
    Other(Value),
}

impl Envelope {
    /// Classify a raw payload. Non-object payloads and objects without any
    /// known key are passed through as [`Envelope::Other`].
    pub fn decode(payload: Value) -> Self {
        let Value::Object(mut map) = payload else {
            return Envelope::Other(payload);
        };
        for (key, wrap) in DECODE_TABLE {
            if let Some(inner) = map.remove(key) {
                return wrap(inner);
            }
        }
        Envelope::Other(Value::Object(map))
    }

    /// The envelope key this variant was routed from, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Envelope::Results(_) => Some("results"),
            Envelope::Stocks(_) => Some("stocks"),
            Envelope::Currency(_) => Some("currency"),
            Envelope::Inflation(_) => Some("inflation"),
            Envelope::PrimeRate(_) => Some("prime-rate"),
            Envelope::Coins(_) => Some("coins"),
            Envelope::Other(_) => None,
        }
    }

    /// Unwrap to the meaningful sub-value.
    pub fn into_inner(self) -> Value {
        match self {
            Envelope::Results(v)
            | Envelope::Stocks(v)
            | Envelope::Currency(v)
            | Envelope::Inflation(v)
            | Envelope::PrimeRate(v)
            | Envelope::Coins(v)
            | Envelope::Other(v) => v,
        }
    }

    /// Borrow the meaningful sub-value.
    pub fn inner(&self) -> &Value {
        match self {
            Envelope::Results(v)
            | Envelope::Stocks(v)
            | Envelope::Currency(v)
            | Envelope::Inflation(v)
            | Envelope::PrimeRate(v)
            | Envelope::Coins(v)
            | Envelope::Other(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routes_results_to_inner_list() {
        let decoded = Envelope::decode(json!({"results": [{"symbol": "PETR4.SA"}]}));
        assert_eq!(decoded.key(), Some("results"));
        assert_eq!(decoded.into_inner(), json!([{"symbol": "PETR4.SA"}]));
    }

    #[test]
    fn routes_coins_list() {
        let decoded = Envelope::decode(json!({"coins": ["BTC", "ETH"]}));
        assert_eq!(decoded, Envelope::Coins(json!(["BTC", "ETH"])));
    }

    #[test]
    fn unmatched_object_passes_through() {
        let payload = json!({"unrelated": 1});
        assert_eq!(Envelope::decode(payload.clone()), Envelope::Other(payload));
    }

    #[test]
    fn non_object_passes_through() {
        assert_eq!(Envelope::decode(json!([1, 2])), Envelope::Other(json!([1, 2])));
        assert_eq!(Envelope::decode(Value::Null), Envelope::Other(Value::Null));
    }

    #[test]
    fn priority_order_resolves_ties() {
        let decoded = Envelope::decode(json!({
            "coins": ["BTC"],
            "results": [{"symbol": "PETR4.SA"}],
        }));
        assert_eq!(decoded.key(), Some("results"));
    }

    #[test]
    fn prime_rate_key_uses_hyphen() {
        let decoded = Envelope::decode(json!({"prime-rate": [{"value": "13.75"}]}));
        assert_eq!(decoded.key(), Some("prime-rate"));
    }
}
