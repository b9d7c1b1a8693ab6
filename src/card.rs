//! Card extraction: from one rendered page to raw listing records
//!
//! A "card" is one DOM container believed to represent a single listing.
//! The extractor locates candidate containers through a priority list of
//! selectors, applies the per-field cascades to each container
//! independently, and yields raw field maps in document order. One bad card
//! never aborts the rest of the page.

use scraper::Selector;
use tracing::{debug, warn};

use crate::cascade::{truncate, Capture, SelectorCascade};
use crate::document::{Document, Element};
use crate::error::ExtractionError;

/// Selector configuration for one source's cards, as data
///
/// Every field is an ordered fallback list; empty lists are legal and mean
/// the field always takes its per-source fallback value.
#[derive(Debug, Clone, Default)]
pub struct CardConfig {
    /// Container selectors in priority order; at least one must compile
    pub containers: Vec<String>,
    pub title: Vec<String>,
    pub company: Vec<String>,
    pub location: Vec<String>,
    pub salary: Vec<String>,
    pub description: Vec<String>,
    /// Link rules capture `href` rather than text
    pub link: Vec<String>,
    pub contract: Vec<String>,
}

/// Raw extraction output for one card, before per-source normalization
///
/// `title` is guaranteed non-empty: containers without an extractable title
/// are dropped inside the extractor and never surface. `url` is already
/// absolute (or empty when no link was found).
#[derive(Debug, Clone)]
pub struct RawCard {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: String,
    pub url: String,
    pub contract: Option<String>,
}

/// Applies a [`CardConfig`] to rendered documents
#[derive(Debug, Clone)]
pub struct CardExtractor {
    containers: Vec<Selector>,
    base_origin: String,
    description_budget: usize,
    title: SelectorCascade,
    company: SelectorCascade,
    location: SelectorCascade,
    salary: SelectorCascade,
    description: SelectorCascade,
    link: SelectorCascade,
    contract: SelectorCascade,
}

impl CardExtractor {
    /// Compile a card configuration
    ///
    /// # Arguments
    /// * `base_origin` - Origin prefixed onto relative links, e.g. `https://example.com`
    /// * `description_budget` - Character budget for descriptions
    pub fn compile(
        base_origin: &str,
        description_budget: usize,
        config: &CardConfig,
    ) -> Result<Self, ExtractionError> {
        let mut containers = Vec::with_capacity(config.containers.len());
        for rule in &config.containers {
            match Selector::parse(rule) {
                Ok(selector) => containers.push(selector),
                Err(e) => {
                    warn!(rule = %rule, error = %e, "skipping container selector that failed to compile");
                }
            }
        }
        if containers.is_empty() {
            return Err(ExtractionError::EmptyCascade {
                field: "containers".to_string(),
                count: config.containers.len(),
            });
        }

        let text = |field: &str, rules: &[String]| {
            let rules: Vec<&str> = rules.iter().map(String::as_str).collect();
            SelectorCascade::compile(field, &rules, Capture::Text)
        };
        let link_rules: Vec<&str> = config.link.iter().map(String::as_str).collect();

        Ok(Self {
            containers,
            base_origin: base_origin.trim_end_matches('/').to_string(),
            description_budget,
            title: text("title", &config.title)?,
            company: text("company", &config.company)?,
            location: text("location", &config.location)?,
            salary: text("salary", &config.salary)?,
            description: text("description", &config.description)?,
            link: SelectorCascade::compile("link", &link_rules, Capture::Attr("href".into()))?,
            contract: text("contract", &config.contract)?,
        })
    }

    /// Extract all cards from a document, in document order
    ///
    /// Containers are located with the first container selector that
    /// matches anything. A container that yields no title is skipped
    /// silently: absence of a title means the container was not actually a
    /// listing, not that extraction failed.
    pub fn extract_cards(&self, document: &Document) -> Vec<RawCard> {
        let containers = document.select_cards(&self.containers);
        debug!(count = containers.len(), "located card containers");

        let mut cards = Vec::with_capacity(containers.len());
        for (index, container) in containers.iter().enumerate() {
            match self.extract_card(container) {
                Some(card) => cards.push(card),
                None => {
                    debug!(index, "skipping container without an extractable title");
                }
            }
        }
        cards
    }

    /// Extract a single card; `None` when the container has no title
    fn extract_card(&self, container: &Element<'_>) -> Option<RawCard> {
        let title = self.title.extract(container)?;

        // Cards that are themselves anchors carry the link on the container.
        let link = self
            .link
            .extract(container)
            .or_else(|| container.attr("href").map(|href| href.trim().to_string()))
            .unwrap_or_default();

        let description = self
            .description
            .extract(container)
            .map(|text| truncate(&text, self.description_budget))
            .unwrap_or_default();

        Some(RawCard {
            title,
            company: self.company.extract(container),
            location: self.location.extract(container),
            salary: self.salary.extract(container),
            description,
            url: self.normalize_link(&link),
            contract: self.contract.extract(container),
        })
    }

    /// Rewrite a relative link against the source's base origin
    ///
    /// Empty stays empty; a link that already carries an HTTP scheme is
    /// left unchanged; anything else gets the origin prefixed with exactly
    /// one slash at the join.
    fn normalize_link(&self, link: &str) -> String {
        if link.is_empty() {
            return String::new();
        }
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!("{}/{}", self.base_origin, link.trim_start_matches('/'))
    }
}
