use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scraper::{Html, Selector};

use crate::types::Percent;

/// A number followed by a percent sign, with either decimal separator.
const PERCENT_PATTERN: &str = r"(\d{1,3}(?:[.,]\d{1,4})?)\s*%";

/// The keyword, then a percentage within the next 120 characters.
const KEYWORD_PERCENT_PATTERN: &str = r"(?i)usura[^%]{0,120}?(\d{1,3}(?:[.,]\d{1,4})?)\s*%";

const KEYWORD: &str = "usura";

/// One way of pulling the rate out of a page.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn extract(&self, html: &str) -> Option<Percent>;
}

/// Structured lookup: CSS selectors for elements about the usury rate.
///
/// Each entry pairs a selector with an optional keyword the element text must
/// contain; the first percentage inside the first qualifying element wins.
pub struct StructuredLookup {
    selectors: Vec<(&'static str, Option<&'static str>)>,
}

impl Default for StructuredLookup {
    fn default() -> Self {
        StructuredLookup {
            selectors: vec![
                ("[class*='usura']", None),
                ("[id*='usura']", None),
                ("table tr", Some(KEYWORD)),
                ("dl, li", Some(KEYWORD)),
            ],
        }
    }
}

impl ExtractionStrategy for StructuredLookup {
    fn name(&self) -> &'static str {
        "structured_lookup"
    }

    fn extract(&self, html: &str) -> Option<Percent> {
        let document = Html::parse_document(html);
        let percent = Regex::new(PERCENT_PATTERN).ok()?;

        for (css, keyword) in &self.selectors {
            let Ok(selector) = Selector::parse(css) else {
                continue;
            };
            for element in document.select(&selector) {
                let text = element.text().collect::<Vec<_>>().join(" ");
                if let Some(k) = keyword {
                    if !text.to_lowercase().contains(k) {
                        continue;
                    }
                }
                let found = percent
                    .captures_iter(&text)
                    .find_map(|c| parse_percent(c.get(1)?.as_str()));
                if found.is_some() {
                    return found;
                }
            }
        }
        None
    }
}

/// Free-text fallback: regex over the visible text of the whole page.
#[derive(Default)]
pub struct TextSearch;

impl ExtractionStrategy for TextSearch {
    fn name(&self) -> &'static str {
        "text_search"
    }

    fn extract(&self, html: &str) -> Option<Percent> {
        let document = Html::parse_document(html);
        let text = document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        let pattern = Regex::new(KEYWORD_PERCENT_PATTERN).ok()?;
        let found = pattern
            .captures_iter(&text)
            .find_map(|c| parse_percent(c.get(1)?.as_str()));
        found
    }
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![Box::new(StructuredLookup::default()), Box::new(TextSearch)]
}

/// Parse `27,44` or `27.44` into a percentage in (0, 100].
pub fn parse_percent(raw: &str) -> Option<Percent> {
    let value = Decimal::from_str(&raw.trim().replace(',', ".")).ok()?;
    if value > Decimal::ZERO && value <= dec!(100) {
        Some(value)
    } else {
        None
    }
}
