use std::time::Duration;

use async_trait::async_trait;
use heatmap_core::{CandleWindow, HeatmapError, MarketData, Quote};
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Thin wrapper over the Finnhub REST API. Auth is a static token header;
/// there is no retry or backoff layer, callers see transient failures.
#[derive(Clone)]
pub struct FinnhubClient {
    api_key: String,
    client: Client,
}

impl FinnhubClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, HeatmapError> {
        let url = format!("{}{}", BASE_URL, path);

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| HeatmapError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HeatmapError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| HeatmapError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl MarketData for FinnhubClient {
    async fn index_constituents(&self, index: &str) -> Result<Vec<String>, HeatmapError> {
        let body: ConstituentsResponse = self
            .get_json("/index/constituents", &[("symbol", index)])
            .await?;

        if body.constituents.is_empty() {
            return Err(HeatmapError::DataUnavailable(format!(
                "index {} returned no constituents",
                index
            )));
        }

        tracing::debug!(
            "Resolved {} constituents for {}",
            body.constituents.len(),
            index
        );
        Ok(body.constituents)
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, HeatmapError> {
        let body: QuoteResponse = self.get_json("/quote", &[("symbol", symbol)]).await?;

        Ok(Quote {
            current: body.c,
            percent_change: body.dp,
        })
    }

    async fn daily_candles(
        &self,
        symbol: &str,
        from: i64,
        to: i64,
    ) -> Result<CandleWindow, HeatmapError> {
        let body: CandleResponse = self
            .get_json(
                "/stock/candle",
                &[
                    ("symbol", symbol),
                    ("resolution", "D"),
                    ("from", &from.to_string()),
                    ("to", &to.to_string()),
                ],
            )
            .await?;

        Ok(CandleWindow {
            status: body.s,
            closes: body.c,
        })
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct ConstituentsResponse {
    #[serde(default)]
    constituents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    c: f64, // latest price
    #[serde(default)]
    dp: Option<f64>, // percent change, absent outside sessions
}

#[derive(Debug, Deserialize)]
struct CandleResponse {
    s: String, // "ok" or "no_data"
    #[serde(default)]
    c: Vec<f64>, // closes
}
