use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::Deserialize;
use transfer::{Combine, Transfer};

/// Rates published for one base currency on one day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyRates {
    pub base: String,
    pub date: NaiveDate,
    pub rates: BTreeMap<String, f64>,
}

impl CurrencyRates {
    pub fn rate(&self, currency: &str) -> Transfer<f64> {
        match self.rates.get(currency) {
            Some(rate) => Transfer::success(*rate),
            None => Transfer::not_found(format!("no {currency} rate for {}", self.base)),
        }
    }
}

/// Both directions of one currency pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub base: String,
    pub compare: String,
    pub date: NaiveDate,
    pub rate: f64,
    pub inverse: f64,
}

impl Quote {
    /// `forward` is quoted in the base currency, `backward` in the compared
    /// one.
    pub fn from_rates(forward: &CurrencyRates, backward: &CurrencyRates) -> Transfer<Self> {
        (forward.rate(&backward.base), backward.rate(&forward.base)).combine_with(
            |(rate, inverse)| Self {
                base: forward.base.clone(),
                compare: backward.base.clone(),
                date: forward.date.max(backward.date),
                rate,
                inverse,
            },
        )
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1 {} = {:.4} {} (1 {} = {:.4} {}) on {}",
            self.base, self.rate, self.compare, self.compare, self.inverse, self.base, self.date
        )
    }
}

#[cfg(test)]
mod tests {
    use transfer::TransferStatus;

    use super::*;

    fn rates(raw: &str) -> CurrencyRates {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn deserializes_service_payload() {
        let eur = rates(r#"{"amount":1.0,"base":"EUR","date":"2024-05-02","rates":{"USD":1.0713}}"#);
        assert_eq!(eur.base, "EUR");
        assert_eq!(eur.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(eur.rate("USD"), Transfer::success(1.0713));
    }

    #[test]
    fn quote_pairs_both_directions() {
        let eur = rates(r#"{"base":"EUR","date":"2024-05-02","rates":{"USD":1.0713}}"#);
        let usd = rates(r#"{"base":"USD","date":"2024-05-02","rates":{"EUR":0.9334}}"#);

        let quote = Quote::from_rates(&eur, &usd).into_data().unwrap();

        assert_eq!(quote.base, "EUR");
        assert_eq!(quote.compare, "USD");
        assert_eq!(
            quote.to_string(),
            "1 EUR = 1.0713 USD (1 USD = 0.9334 EUR) on 2024-05-02"
        );
    }

    #[test]
    fn missing_rate_is_not_found() {
        let eur = rates(r#"{"base":"EUR","date":"2024-05-02","rates":{"GBP":0.85}}"#);
        let usd = rates(r#"{"base":"USD","date":"2024-05-02","rates":{"EUR":0.9334}}"#);

        let quote = Quote::from_rates(&eur, &usd);

        assert_eq!(quote.status(), TransferStatus::NotFound);
        assert_eq!(quote.error().unwrap().message(), "no USD rate for EUR");
    }
}
