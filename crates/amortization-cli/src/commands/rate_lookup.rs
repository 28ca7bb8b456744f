use clap::Args;
use serde_json::{json, Value};

use amortization_core::rate_lookup::{lookup_usury_rate, UsuryRate, DEFAULT_USURY_RATE_URL};

/// Arguments for the usury rate lookup
#[derive(Args)]
pub struct UsuryRateArgs {
    /// Page to read the published usury rate from
    #[arg(long, env = "AMORT_USURY_RATE_URL", default_value = DEFAULT_USURY_RATE_URL)]
    pub url: String,
}

/// Never fails: an unavailable rate is reported in the output instead.
pub fn run_usury_rate(args: UsuryRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(usury_rate_value(&args.url, lookup_usury_rate(&args.url)))
}

pub fn usury_rate_value(url: &str, found: Option<UsuryRate>) -> Value {
    match found {
        Some(rate) => json!({
            "result": {
                "rate_percent": rate.rate_percent.to_string(),
                "source_url": rate.source_url,
                "strategy": rate.strategy,
                "available": true,
            },
            "warnings": [],
        }),
        None => json!({
            "result": {
                "rate_percent": null,
                "source_url": url,
                "available": false,
            },
            "warnings": ["Usury rate not available; enter the annual rate manually"],
        }),
    }
}
