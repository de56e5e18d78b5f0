use std::time::Duration;

use reqwest::Url;
use transfer::{BufferedResponse, ParCombine, Transfer};

use crate::{
    error::{AppError, Result},
    model::{CurrencyRates, Quote},
    settings::RatesSettings,
};

#[derive(Debug, Clone)]
pub struct RatesClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl RatesClient {
    pub fn new(settings: &RatesSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| AppError::Endpoint(format!("invalid base_url: {err}")))?;
        let endpoint = base_url
            .join(&settings.path)
            .map_err(|err| AppError::Endpoint(format!("invalid path: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;
        Ok(Self { endpoint, http })
    }

    /// Latest rates quoted in `base`.
    pub async fn latest(&self, base: &str) -> Transfer<CurrencyRates> {
        tracing::debug!(endpoint = %self.endpoint, base, "requesting rates");
        Transfer::from_async_response(async {
            let response = self
                .http
                .get(self.endpoint.clone())
                .query(&[("base", base)])
                .send()
                .await?;
            BufferedResponse::read(response).await
        })
        .await
    }

    /// Both directions of `base`/`compare`, fetched concurrently.
    pub async fn quote(&self, base: &str, compare: &str) -> Transfer<Quote> {
        (self.latest(base), self.latest(compare))
            .par_combine()
            .await
            .flat_transform(|(forward, backward)| Quote::from_rates(&forward, &backward))
    }
}
