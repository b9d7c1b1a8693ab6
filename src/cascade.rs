//! Selector cascades: ordered fallback lists for one field
//!
//! Rather than a single brittle query per field, each field carries an
//! ordered list of selectors evaluated lazily until one yields text. A
//! source changing its class names degrades to the next rule instead of
//! failing the whole record. This is the main line of defense against
//! markup drift.

use scraper::Selector;
use tracing::warn;

use crate::document::Element;
use crate::error::ExtractionError;

/// What a cascade reads from the element a rule matched
#[derive(Debug, Clone)]
pub enum Capture {
    /// The element's collapsed text content
    Text,
    /// A named attribute, e.g. `href` for links
    Attr(String),
}

/// Ordered fallback list of extraction rules for one field
///
/// Compiled once per source adapter and never mutated during extraction.
/// Rules that fail to compile are skipped with a warning; a non-empty rule
/// list where *every* entry is malformed is rejected as a configuration
/// error.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    rules: Vec<Selector>,
    capture: Capture,
}

impl SelectorCascade {
    /// Compile a rule list for a field
    ///
    /// # Arguments
    /// * `field` - Field name, used in warnings and errors
    /// * `rules` - Selector strings in priority order; may be empty
    /// * `capture` - Whether matches yield text or an attribute value
    pub fn compile(
        field: &str,
        rules: &[&str],
        capture: Capture,
    ) -> Result<Self, ExtractionError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            match Selector::parse(rule) {
                Ok(selector) => compiled.push(selector),
                Err(e) => {
                    warn!(field, rule = %rule, error = %e, "skipping selector that failed to compile");
                }
            }
        }

        if compiled.is_empty() && !rules.is_empty() {
            return Err(ExtractionError::EmptyCascade {
                field: field.to_string(),
                count: rules.len(),
            });
        }

        Ok(Self {
            rules: compiled,
            capture,
        })
    }

    /// Apply the cascade to one card element
    ///
    /// Tries each rule in order; the first rule whose match produces
    /// non-empty trimmed text wins. Returns `None` when every rule fails,
    /// which callers treat as "field absent", not as an error.
    pub fn extract(&self, element: &Element<'_>) -> Option<String> {
        for rule in &self.rules {
            let Some(found) = element.query_first(std::slice::from_ref(rule)) else {
                continue;
            };
            let value = match &self.capture {
                Capture::Text => found.text(),
                Capture::Attr(name) => found.attr(name).unwrap_or("").trim().to_string(),
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
        None
    }

    /// Whether the cascade has any usable rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Truncate a description to a character budget
///
/// Appends an ellipsis marker only when truncation actually occurred; a
/// description already within budget is returned unmodified. The cut is
/// made on a character boundary so multi-byte text stays valid.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(budget).collect();
    truncated.push('…');
    truncated
}
