//! Source adapters: one external job board as pure configuration
//!
//! Every source is the same machinery (URL templating, pagination scheme,
//! card configuration, fallback strings) instantiated with different data.
//! Adding a board means writing a configuration, not a new scraping
//! routine.

use std::fmt;
use std::str::FromStr;

use crate::card::{CardConfig, CardExtractor, RawCard};
use crate::document::Document;
use crate::error::{ConfigError, ExtractionError};
use crate::listing::JobListing;
use crate::render::{RenderOptions, WaitStrategy};

/// Default character budget for descriptions
pub const DEFAULT_DESCRIPTION_BUDGET: usize = 200;

/// Source of recency scores for listings whose post date is unavailable
///
/// Injectable so tests can pin the value; see [`synthesize_recency`] for
/// why this exists at all.
pub trait RecencySampler: Send + Sync {
    /// A "days ago" value in 0..=7
    fn days_ago(&self) -> u32;
}

/// Production sampler: uniform over 0..=7
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRecency;

impl RecencySampler for RandomRecency {
    fn days_ago(&self) -> u32 {
        fastrand::u32(0..8)
    }
}

/// Fixed sampler for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedRecency(pub u32);

impl RecencySampler for FixedRecency {
    fn days_ago(&self) -> u32 {
        self.0
    }
}

/// How a source addresses result pages
///
/// Fixed per adapter at construction; an adapter never mixes schemes.
#[derive(Debug, Clone)]
pub enum Pagination {
    /// `param = page_index * page_size`, appended on every page
    Offset { param: String, page_size: u32 },
    /// `param = page_index + 1`; omitted on the first page when
    /// `skip_first` (some boards 404 on an explicit page 1)
    PageNumber { param: String, skip_first: bool },
}

impl Pagination {
    fn query_param(&self, page_index: u32) -> Option<(&str, u32)> {
        match self {
            Self::Offset { param, page_size } => Some((param.as_str(), page_index * page_size)),
            Self::PageNumber { param, skip_first } => {
                if *skip_first && page_index == 0 {
                    None
                } else {
                    Some((param.as_str(), page_index + 1))
                }
            }
        }
    }
}

/// Configuration for one source, consumed by [`SourceAdapter::from_config`]
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: String,
    /// Origin prefixed onto relative links
    pub base_origin: String,
    /// Search URL with `{query}` and `{location}` placeholders; must already
    /// carry a query string so pagination can append `&param=value`
    pub search_url: String,
    pub pagination: Pagination,
    pub cards: CardConfig,
    pub render_options: RenderOptions,
    pub company_fallback: String,
    pub location_fallback: String,
    pub contract_fallback: String,
    pub description_budget: usize,
}

/// One external source, bound to its extraction configuration
///
/// Owns its selector rules and URL-building logic exclusively; the
/// aggregator never inspects them.
#[derive(Debug, Clone)]
pub struct SourceAdapter {
    name: String,
    search_url: String,
    pagination: Pagination,
    extractor: CardExtractor,
    render_options: RenderOptions,
    company_fallback: String,
    location_fallback: String,
    contract_fallback: String,
}

impl SourceAdapter {
    /// Build an adapter from configuration, compiling its selectors
    pub fn from_config(config: SourceConfig) -> Result<Self, ExtractionError> {
        let extractor =
            CardExtractor::compile(&config.base_origin, config.description_budget, &config.cards)?;
        Ok(Self {
            name: config.name,
            search_url: config.search_url,
            pagination: config.pagination,
            extractor,
            render_options: config.render_options,
            company_fallback: config.company_fallback,
            location_fallback: config.location_fallback,
            contract_fallback: config.contract_fallback,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Build the URL for one result page
    ///
    /// Query and location are percent-encoded into the search template,
    /// then the pagination parameter is appended per the adapter's scheme.
    pub fn build_page_request(&self, query: &str, location: &str, page_index: u32) -> String {
        let mut url = self
            .search_url
            .replace("{query}", &encode(query))
            .replace("{location}", &encode(location));
        if let Some((param, value)) = self.pagination.query_param(page_index) {
            url.push('&');
            url.push_str(param);
            url.push('=');
            url.push_str(&value.to_string());
        }
        url
    }

    /// Extract one rendered page into normalized listings
    pub fn parse_page(&self, document: &Document, sampler: &dyn RecencySampler) -> Vec<JobListing> {
        self.extractor
            .extract_cards(document)
            .into_iter()
            .map(|card| self.to_listing(card, sampler))
            .collect()
    }

    /// Normalize one raw card into the output record shape
    fn to_listing(&self, card: RawCard, sampler: &dyn RecencySampler) -> JobListing {
        let (posted_days_ago, posted) = synthesize_recency(sampler);
        JobListing {
            title: card.title,
            company: card.company.unwrap_or_else(|| self.company_fallback.clone()),
            location: card
                .location
                .unwrap_or_else(|| self.location_fallback.clone()),
            salary: card.salary,
            description: card.description,
            url: card.url,
            posted,
            posted_days_ago,
            contract: card
                .contract
                .unwrap_or_else(|| self.contract_fallback.clone()),
            source: self.name.clone(),
        }
    }
}

/// Synthesize a recency score and its display string
///
/// The boards surface only fuzzy relative dates that cannot be parsed
/// reliably, so the score is drawn from the sampler and used purely as a
/// sort key. This is a documented approximation, kept in this one function
/// so it can be replaced with real date parsing once sources expose
/// reliable dates. Swapping in a sampler-less path that returns `None`
/// yields an honest "unknown" that ranks last instead.
fn synthesize_recency(sampler: &dyn RecencySampler) -> (Option<u32>, String) {
    let days = sampler.days_ago();
    let posted = match days {
        0 => "Aujourd'hui".to_string(),
        1 => "Il y a 1 jour".to_string(),
        n => format!("Il y a {n} jours"),
    };
    (Some(days), posted)
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// The configured sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Indeed,
    HelloWork,
    WelcomeToTheJungle,
}

impl Source {
    /// Every configured source, in fan-out order
    pub fn all() -> &'static [Source] {
        &[Source::Indeed, Source::HelloWork, Source::WelcomeToTheJungle]
    }

    /// Build the adapter for this source
    pub fn adapter(self) -> SourceAdapter {
        let config = match self {
            Source::Indeed => indeed_config(),
            Source::HelloWork => hellowork_config(),
            Source::WelcomeToTheJungle => wttj_config(),
        };
        SourceAdapter::from_config(config).expect("built-in source configuration is valid")
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Indeed => write!(f, "Indeed"),
            Source::HelloWork => write!(f, "HelloWork"),
            Source::WelcomeToTheJungle => write!(f, "Welcome to the Jungle"),
        }
    }
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indeed" => Ok(Source::Indeed),
            "hellowork" => Ok(Source::HelloWork),
            "wttj" | "welcometothejungle" => Ok(Source::WelcomeToTheJungle),
            other => Err(ConfigError::UnknownSource(other.to_string())),
        }
    }
}

fn indeed_config() -> SourceConfig {
    SourceConfig {
        name: "Indeed".to_string(),
        base_origin: "https://fr.indeed.com".to_string(),
        search_url: "https://fr.indeed.com/jobs?q={query}&l={location}".to_string(),
        pagination: Pagination::Offset {
            param: "start".to_string(),
            page_size: 10,
        },
        cards: CardConfig {
            containers: list(&[".job_seen_beacon"]),
            title: list(&["h2.jobTitle span[title]", "h2.jobTitle a span"]),
            company: list(&["[data-testid='company-name']", ".companyName"]),
            location: list(&["[data-testid='text-location']", ".companyLocation"]),
            salary: list(&[".salary-snippet", ".metadata.salary-snippet-container"]),
            description: list(&[".job-snippet", ".jobCardShelfContainer"]),
            link: list(&["a.jcs-JobTitle", "h2.jobTitle a"]),
            contract: Vec::new(),
        },
        render_options: RenderOptions {
            wait: WaitStrategy::NetworkIdle,
            wait_for_selector: Some(".job_seen_beacon, .jobsearch-ResultsList".to_string()),
            ..RenderOptions::default()
        },
        company_fallback: "Non spécifié".to_string(),
        location_fallback: "Non spécifié".to_string(),
        contract_fallback: "CDI".to_string(),
        description_budget: DEFAULT_DESCRIPTION_BUDGET,
    }
}

fn hellowork_config() -> SourceConfig {
    SourceConfig {
        name: "HelloWork".to_string(),
        base_origin: "https://www.hellowork.com".to_string(),
        search_url:
            "https://www.hellowork.com/fr-fr/emploi/recherche.html?k={query}&k_autocomplete=&l={location}&l_autocomplete="
                .to_string(),
        pagination: Pagination::PageNumber {
            param: "p".to_string(),
            skip_first: true,
        },
        cards: CardConfig {
            containers: list(&[
                "article.job",
                "li[data-id]",
                "div[class*='JobCard']",
                "[data-cy='job-card']",
                "article[itemprop='itemListElement']",
            ]),
            title: list(&[
                "h2 a",
                "h3 a",
                "h2",
                "h3",
                "a[itemprop='title']",
                "[class*='title'] a",
                "a[class*='Title']",
            ]),
            company: list(&[
                "[itemprop='hiringOrganization']",
                "[class*='company']",
                "[class*='Company']",
                "span[class*='entreprise']",
                "div[class*='entreprise']",
            ]),
            location: list(&[
                "[itemprop='jobLocation']",
                "[class*='location']",
                "[class*='Location']",
                "span[class*='lieu']",
                "[class*='city']",
            ]),
            salary: list(&[
                "[class*='salary']",
                "[class*='salaire']",
                "[itemprop='baseSalary']",
            ]),
            description: list(&["[class*='description']", "[class*='snippet']", "p"]),
            link: list(&[
                "a[href*='/emploi-']",
                "a[itemprop='url']",
                "h2 a",
                "h3 a",
                "a",
            ]),
            contract: list(&["[class*='contract']", "[class*='contrat']"]),
        },
        render_options: RenderOptions {
            wait: WaitStrategy::DomContentLoaded,
            settle: Some(std::time::Duration::from_secs(3)),
            ..RenderOptions::default()
        },
        company_fallback: "Entreprise non spécifiée".to_string(),
        location_fallback: "France".to_string(),
        contract_fallback: "CDI".to_string(),
        description_budget: DEFAULT_DESCRIPTION_BUDGET,
    }
}

fn wttj_config() -> SourceConfig {
    SourceConfig {
        name: "Welcome to the Jungle".to_string(),
        base_origin: "https://www.welcometothejungle.com".to_string(),
        search_url:
            "https://www.welcometothejungle.com/fr/jobs?query={query}&aroundQuery={location}"
                .to_string(),
        pagination: Pagination::PageNumber {
            param: "page".to_string(),
            skip_first: false,
        },
        cards: CardConfig {
            containers: list(&[
                "li[data-testid='job-list-item']",
                "li[class*='JobCard']",
                "a[href*='/jobs/']",
            ]),
            title: list(&["h3", "h2", "[class*='JobCard'] h3", "[class*='title']"]),
            company: list(&["[class*='organization-name']", "[class*='company']", "h4"]),
            location: list(&["[class*='location']", "span[class*='Location']"]),
            salary: list(&["[class*='salary']", "span[class*='Salary']"]),
            description: Vec::new(),
            link: list(&["a[href*='/jobs/']"]),
            contract: list(&["[class*='contract']", "span[class*='Contract']"]),
        },
        render_options: RenderOptions {
            wait: WaitStrategy::DomContentLoaded,
            settle: Some(std::time::Duration::from_secs(3)),
            ..RenderOptions::default()
        },
        company_fallback: "Entreprise non spécifiée".to_string(),
        location_fallback: "France".to_string(),
        contract_fallback: "CDI".to_string(),
        description_budget: DEFAULT_DESCRIPTION_BUDGET,
    }
}
