//! Best-effort scrape of the published usury rate.
//!
//! The value is only a suggestion for the rate input. Nothing in the
//! amortization engine depends on it, and [`lookup_usury_rate`] never fails:
//! every problem is logged and turned into `None`.

pub mod strategies;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::Percent;
use strategies::{default_strategies, ExtractionStrategy};

/// Page the rate is read from unless another URL is given.
pub const DEFAULT_USURY_RATE_URL: &str =
    "https://www.larepublica.co/indicadores-economicos/bancos/tasa-de-usura";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("no usury rate found in page")]
    NotFound,
}

/// A scraped rate and how it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuryRate {
    /// Annual rate in percent.
    pub rate_percent: Percent,
    pub source_url: String,
    pub strategy: String,
}

/// Fetch `url` and extract the usury rate, or `None` on any failure.
pub fn lookup_usury_rate(url: &str) -> Option<UsuryRate> {
    match fetch_usury_rate(url) {
        Ok(rate) => {
            info!(rate = %rate.rate_percent, strategy = %rate.strategy, "usury rate found");
            Some(rate)
        }
        Err(e) => {
            warn!(url, error = %e, "usury rate lookup failed");
            None
        }
    }
}

/// One blocking GET with a browser user agent, then the extraction chain.
pub fn fetch_usury_rate(url: &str) -> Result<UsuryRate, LookupError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .build()?;

    debug!(url, "requesting usury rate page");
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    let body = response.text()?;
    let (rate_percent, strategy) =
        extract_with(&default_strategies(), &body).ok_or(LookupError::NotFound)?;

    Ok(UsuryRate {
        rate_percent,
        source_url: url.to_string(),
        strategy: strategy.to_string(),
    })
}

/// Run the default strategies over an already-downloaded page.
pub fn extract_usury_rate(html: &str) -> Option<Percent> {
    extract_with(&default_strategies(), html).map(|(rate, _)| rate)
}

/// First strategy to produce a value wins.
pub fn extract_with(
    strategies: &[Box<dyn ExtractionStrategy>],
    html: &str,
) -> Option<(Percent, &'static str)> {
    strategies.iter().find_map(|s| {
        let found = s.extract(html);
        debug!(strategy = s.name(), found = found.is_some(), "extraction attempt");
        found.map(|rate| (rate, s.name()))
    })
}
