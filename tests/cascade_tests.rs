use jobscout::{truncate, Capture, Document, ExtractionError, SelectorCascade};
use scraper::Selector;

fn only_card(document: &Document) -> jobscout::Element<'_> {
    let container = Selector::parse(".card").unwrap();
    let cards = document.select_cards(std::slice::from_ref(&container));
    assert_eq!(cards.len(), 1);
    cards[0]
}

#[test]
fn first_success_wins() {
    let document = Document::parse(
        r#"
        <div class="card">
            <span class="company">Acme Corp</span>
            <span class="other">Someone Else</span>
        </div>
    "#,
    );
    let card = only_card(&document);

    let cascade =
        SelectorCascade::compile("company", &[".missing", ".company", ".other"], Capture::Text)
            .unwrap();

    assert_eq!(cascade.extract(&card), Some("Acme Corp".to_string()));
}

#[test]
fn absent_when_no_rule_matches() {
    let document = Document::parse(r#"<div class="card"><span class="a">x</span></div>"#);
    let card = only_card(&document);

    let cascade = SelectorCascade::compile("salary", &[".missing", ".gone"], Capture::Text).unwrap();

    assert_eq!(cascade.extract(&card), None);
}

#[test]
fn empty_match_falls_through_to_next_rule() {
    let document = Document::parse(
        r#"
        <div class="card">
            <span class="empty">   </span>
            <span class="filled">value</span>
        </div>
    "#,
    );
    let card = only_card(&document);

    let cascade =
        SelectorCascade::compile("field", &[".empty", ".filled"], Capture::Text).unwrap();

    assert_eq!(cascade.extract(&card), Some("value".to_string()));
}

#[test]
fn text_is_trimmed_and_collapsed() {
    let document = Document::parse(
        "<div class=\"card\"><span class=\"title\">\n   Senior\n   Engineer  </span></div>",
    );
    let card = only_card(&document);

    let cascade = SelectorCascade::compile("title", &[".title"], Capture::Text).unwrap();

    assert_eq!(cascade.extract(&card), Some("Senior Engineer".to_string()));
}

#[test]
fn attribute_capture() {
    let document =
        Document::parse(r#"<div class="card"><a class="link" href="/emploi-42">go</a></div>"#);
    let card = only_card(&document);

    let cascade =
        SelectorCascade::compile("link", &["a.link"], Capture::Attr("href".to_string())).unwrap();

    assert_eq!(cascade.extract(&card), Some("/emploi-42".to_string()));
}

#[test]
fn malformed_rules_are_skipped() {
    let document = Document::parse(r#"<div class="card"><span class="ok">yes</span></div>"#);
    let card = only_card(&document);

    let cascade = SelectorCascade::compile("field", &["][broken", ".ok"], Capture::Text).unwrap();

    assert_eq!(cascade.extract(&card), Some("yes".to_string()));
}

#[test]
fn all_rules_malformed_is_a_config_error() {
    let result = SelectorCascade::compile("field", &["][a", "][b"], Capture::Text);

    assert!(matches!(
        result,
        Err(ExtractionError::EmptyCascade { count: 2, .. })
    ));
}

#[test]
fn empty_rule_list_always_falls_back() {
    let document = Document::parse(r#"<div class="card"><span>anything</span></div>"#);
    let card = only_card(&document);

    let cascade = SelectorCascade::compile("contract", &[], Capture::Text).unwrap();

    assert!(cascade.is_empty());
    assert_eq!(cascade.extract(&card), None);
}

#[test]
fn truncate_within_budget_is_unchanged() {
    let short = "a".repeat(50);
    assert_eq!(truncate(&short, 200), short);
}

#[test]
fn truncate_over_budget_appends_marker() {
    let long = "a".repeat(500);
    let truncated = truncate(&long, 200);

    assert_eq!(truncated.chars().count(), 201);
    assert!(truncated.ends_with('…'));
    assert!(truncated.starts_with("aaa"));
}

#[test]
fn truncate_cuts_on_character_boundaries() {
    let accented = "é".repeat(300);
    let truncated = truncate(&accented, 200);

    assert_eq!(truncated.chars().count(), 201);
    assert!(truncated.ends_with('…'));
}
