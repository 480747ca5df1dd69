//! HTML extraction of title, price and stock text from a competitor page.

use crate::core::price::normalize_price;
use crate::domain::model::{Extraction, SelectorOverrides};
use crate::utils::error::ParseError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_SELECTOR: &str = "h1";
pub const DEFAULT_PRICE_SELECTOR: &str = ".price_color";
pub const DEFAULT_AVAILABILITY_SELECTOR: &str = ".instock";

/// CSS selectors used to locate data on a product page.
///
/// The defaults target the books.toscrape.com catalogue layout. Real shops
/// differ, so every field can be overridden per competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSelectors {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_price")]
    pub price: String,
    #[serde(default = "default_availability")]
    pub availability: Option<String>,
}

fn default_title() -> String {
    DEFAULT_TITLE_SELECTOR.to_string()
}

fn default_price() -> String {
    DEFAULT_PRICE_SELECTOR.to_string()
}

fn default_availability() -> Option<String> {
    Some(DEFAULT_AVAILABILITY_SELECTOR.to_string())
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            title: default_title(),
            price: default_price(),
            availability: default_availability(),
        }
    }
}

impl SiteSelectors {
    pub fn with_overrides(&self, overrides: Option<&SelectorOverrides>) -> SiteSelectors {
        let Some(overrides) = overrides else {
            return self.clone();
        };

        SiteSelectors {
            title: overrides.title.clone().unwrap_or_else(|| self.title.clone()),
            price: overrides.price.clone().unwrap_or_else(|| self.price.clone()),
            availability: overrides
                .availability
                .clone()
                .or_else(|| self.availability.clone()),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Collapses the text content of an element; `None` when it is blank.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Compiled selectors for one competitor.
#[derive(Debug)]
pub struct PageExtractor {
    title: Selector,
    price: Selector,
    price_source: String,
    availability: Option<Selector>,
}

impl PageExtractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self, ParseError> {
        Ok(Self {
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
            price_source: selectors.price.clone(),
            availability: selectors.availability.as_deref().map(compile).transpose()?,
        })
    }

    /// Title and availability are best effort; only the price is required.
    pub fn extract(&self, body: &str) -> Result<Extraction, ParseError> {
        let document = Html::parse_document(body);

        let raw_price = document
            .select(&self.price)
            .find_map(element_text)
            .ok_or_else(|| ParseError::MissingPrice {
                selector: self.price_source.clone(),
            })?;
        let price = normalize_price(&raw_price)?;

        let title = document.select(&self.title).find_map(element_text);

        let availability = self
            .availability
            .as_ref()
            .and_then(|selector| document.select(selector).find_map(element_text));

        tracing::debug!(
            "Extracted price {} from '{}' (title: {:?})",
            price,
            raw_price,
            title
        );

        Ok(Extraction {
            title,
            price,
            availability,
        })
    }
}
