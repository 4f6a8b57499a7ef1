//! Exchange-rate table
//!
//! A [`RateTable`] maps currency codes to "1 unit of this currency = X units
//! of the base (reference) currency". Codes are matched case-insensitively.
//! Besides the live rates a table may carry last-known rates, which are only
//! used when the caller allows an approximate conversion.

use crate::constants::FALLBACK_RATES_EUR;
use crate::types::*;
use std::collections::BTreeMap;

/// Where a rate used for a conversion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RateSource {
    /// Present in the current rate table
    Live,
    /// Taken from the last-known fallback rates
    LastKnown,
}

/// An amount converted to the reference currency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub rate: f64,
    pub source: RateSource,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RateTable {
    /// The reference currency every rate is expressed in
    #[cfg_attr(feature = "serde", serde(alias = "base_currency"))]
    pub base_currency: String,
    pub rates: BTreeMap<String, f64>,
    /// Rates to fall back on for currencies missing from `rates`
    #[cfg_attr(feature = "serde", serde(default, alias = "last_known"))]
    pub last_known: BTreeMap<String, f64>,
    /// Set when the whole table is a static fallback (FX feed unavailable)
    #[cfg_attr(feature = "serde", serde(default))]
    pub fallback: bool,
}

impl RateTable {
    /// Empty table with only the base currency
    pub fn new(base_currency: &str) -> Self {
        let base = currency_code(base_currency);
        let mut rates = BTreeMap::new();
        rates.insert(base.clone(), 1.0);
        Self {
            base_currency: base,
            rates,
            last_known: BTreeMap::new(),
            fallback: false,
        }
    }

    pub fn with_rate(mut self, currency: &str, rate: f64) -> Self {
        self.rates.insert(currency_code(currency), rate);
        self
    }

    pub fn with_last_known(mut self, currency: &str, rate: f64) -> Self {
        self.last_known.insert(currency_code(currency), rate);
        self
    }

    /// The static EUR-based table used when live rates cannot be fetched.
    ///
    /// Its rates double as last-known rates and the table is flagged as a
    /// fallback, so every result computed with it is marked approximate.
    pub fn static_fallback() -> Self {
        let mut table = Self::new("EUR");
        for (code, rate) in FALLBACK_RATES_EUR {
            table = table.with_rate(code, rate).with_last_known(code, rate);
        }
        table.fallback = true;
        table
    }

    /// Build a table based on `base` from prices quoted in a third currency.
    ///
    /// `quote_currency` is the currency the quotes are in and `quotes` maps
    /// each currency to the price of one unit in `quote_currency`
    /// (e.g. `USD -> 32.1 TRY`, `EUR -> 35.0 TRY`). The quote currency itself
    /// ends up in the table too.
    pub fn from_cross_rates(
        base: &str,
        quote_currency: &str,
        quotes: &BTreeMap<String, f64>,
    ) -> Result<Self> {
        let find = |code: &str| {
            quotes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(code))
                .map(|(_, v)| *v)
        };

        let base_in_quote = find(base).filter(|r| r.is_finite() && *r > 0.0).ok_or_else(|| {
            CostError::Config(format!(
                "Cross rates must contain a positive quote for base currency {}",
                base
            ))
        })?;

        let mut table = Self::new(base).with_rate(quote_currency, 1.0 / base_in_quote);
        for (code, in_quote) in quotes {
            if !(in_quote.is_finite() && *in_quote > 0.0) {
                return Err(CostError::Config(format!(
                    "Invalid cross rate for {}: {}",
                    code, in_quote
                )));
            }
            table = table.with_rate(code, in_quote / base_in_quote);
        }
        Ok(table)
    }

    /// Live rate for `currency`, with the base currency implied at 1.0
    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base_currency) {
            return Some(1.0);
        }
        lookup(&self.rates, currency)
    }

    /// Resolve the rate for `currency`, consulting last-known rates when
    /// `allow_fallback` is set.
    pub fn resolve(&self, currency: &str, allow_fallback: bool) -> Option<(f64, RateSource)> {
        if let Some(rate) = self.rate(currency) {
            return Some((rate, RateSource::Live));
        }
        if allow_fallback {
            return lookup(&self.last_known, currency).map(|rate| (rate, RateSource::LastKnown));
        }
        None
    }

    /// Convert `amount` of `currency` to the base currency
    pub fn convert(&self, amount: f64, currency: &str, allow_fallback: bool) -> Result<Conversion> {
        let (rate, source) =
            self.resolve(currency, allow_fallback)
                .ok_or_else(|| CostError::UnsupportedCurrency {
                    currency: currency_code(currency),
                    context: format!("converting to {}", self.base_currency),
                })?;
        Ok(Conversion {
            amount: amount * rate,
            rate,
            source,
        })
    }

    /// Strict conversion to the base currency (live rates only)
    pub fn to_reference(&self, amount: f64, currency: &str) -> Result<f64> {
        Ok(self.convert(amount, currency, false)?.amount)
    }

    /// Inverse of [`RateTable::to_reference`]
    pub fn from_reference(&self, amount: f64, currency: &str) -> Result<f64> {
        let rate = self
            .rate(currency)
            .ok_or_else(|| CostError::UnsupportedCurrency {
                currency: currency_code(currency),
                context: format!("converting from {}", self.base_currency),
            })?;
        Ok(amount / rate)
    }

    /// Re-express every rate against `reference`.
    ///
    /// If the new reference is only known through a last-known rate the
    /// rebased table is flagged as a fallback.
    pub fn rebase(&self, reference: &str, allow_fallback: bool) -> Result<Self> {
        if reference.eq_ignore_ascii_case(&self.base_currency) {
            return Ok(self.clone());
        }

        let (pivot, source) =
            self.resolve(reference, allow_fallback)
                .ok_or_else(|| CostError::UnsupportedCurrency {
                    currency: currency_code(reference),
                    context: "rebasing exchange rates".to_string(),
                })?;

        let rebase_map = |map: &BTreeMap<String, f64>| {
            map.iter()
                .map(|(code, rate)| (code.clone(), rate / pivot))
                .collect::<BTreeMap<_, _>>()
        };

        let mut rates = rebase_map(&self.rates);
        rates.insert(currency_code(&self.base_currency), 1.0 / pivot);
        rates.insert(currency_code(reference), 1.0);

        Ok(Self {
            base_currency: currency_code(reference),
            rates,
            last_known: rebase_map(&self.last_known),
            fallback: self.fallback || source == RateSource::LastKnown,
        })
    }

    /// Check that every rate is a positive, finite number
    pub fn validate(&self) -> Result<()> {
        if self.base_currency.trim().is_empty() {
            return Err(CostError::Config("Rate table has no base currency".to_string()));
        }
        for (code, rate) in self.rates.iter().chain(self.last_known.iter()) {
            if !(rate.is_finite() && *rate > 0.0) {
                return Err(CostError::Config(format!(
                    "Exchange rate for {} must be positive, got {}",
                    code, rate
                )));
            }
        }
        Ok(())
    }

    /// Load a rate table from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let table: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CostError::Config(format!("Failed to parse exchange rates: {}", e)))?;
        table.validate()?;
        Ok(table)
    }
}

/// Canonical (trimmed, upper-case) form of a currency code
pub fn currency_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn lookup(map: &BTreeMap<String, f64>, currency: &str) -> Option<f64> {
    let code = currency.trim();
    map.get(code).copied().or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(code))
            .map(|(_, v)| *v)
    })
}
