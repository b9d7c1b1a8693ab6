//! Parsed document model over rendered HTML
//!
//! Wraps one rendered page and exposes the two queries the extraction layer
//! needs: locating candidate card containers through a priority list of
//! selectors, and looking up descendant elements within one card. Purely
//! read-only traversal; no networking.

use scraper::{Html, Selector};

/// A parsed rendered page
///
/// Produced by a render session, consumed by the card extractor. The
/// underlying DOM is not `Send`, so orchestration code parses, extracts and
/// drops a `Document` between suspension points rather than holding it
/// across them.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a rendered HTML string into a document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Locate card containers via a priority list of selectors
    ///
    /// Tries each selector in order and returns the matches of the *first*
    /// selector that yields at least one element. Matches are never
    /// concatenated across selectors: a page where both `article.job` and
    /// `li[data-id]` match would otherwise produce every card twice.
    pub fn select_cards(&self, selectors: &[Selector]) -> Vec<Element<'_>> {
        for selector in selectors {
            let matches: Vec<Element<'_>> = self
                .html
                .select(selector)
                .map(|element| Element { element })
                .collect();
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Handle to one element inside a [`Document`]
#[derive(Clone, Copy)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// First descendant matching any selector in the list, in list order
    pub fn query_first(&self, selectors: &[Selector]) -> Option<Element<'a>> {
        for selector in selectors {
            if let Some(element) = self.element.select(selector).next() {
                return Some(Element { element });
            }
        }
        None
    }

    /// Text content of this element with whitespace collapsed
    ///
    /// Rendered pages interleave text with indentation and newlines; callers
    /// compare and display these values, so runs of whitespace collapse to a
    /// single space and the ends are trimmed.
    pub fn text(&self) -> String {
        let raw: String = self.element.text().collect::<Vec<_>>().join(" ");
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Value of an HTML attribute, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }
}
