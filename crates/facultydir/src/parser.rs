use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::types::{CardFields, ProfileFields, Teaching};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Card #{card} is missing required field: {field}")]
    MissingField { card: usize, field: &'static str },
}

/// Text fragments trimmed and joined by a single space, with non-breaking
/// spaces folded into ordinary ones.
fn elem_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

fn non_empty_text(element: ElementRef) -> Option<String> {
    Some(elem_text(element)).filter(|s| !s.is_empty())
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope.select(selector).next().and_then(non_empty_text)
}

fn collect_texts<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements.filter_map(non_empty_text).collect()
}

fn resolve_href(base_url: &str, href: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

fn parse_card(card: ElementRef, index: usize, base_url: &str) -> Result<CardFields, ParseError> {
    let anchor_sel = Selector::parse("h3 a").unwrap();
    let education_sel = Selector::parse(".facultyEducation").unwrap();
    let phone_sel = Selector::parse(".facultyNumber").unwrap();
    let address_sel = Selector::parse(".facultyAddress").unwrap();
    let email_sel = Selector::parse(".facultyemail").unwrap();
    let specialization_sel = Selector::parse(".areaSpecialization p").unwrap();

    let anchor = card
        .select(&anchor_sel)
        .next()
        .ok_or(ParseError::MissingField {
            card: index,
            field: "name",
        })?;

    let name = non_empty_text(anchor).ok_or(ParseError::MissingField {
        card: index,
        field: "name",
    })?;

    let href = anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField {
            card: index,
            field: "profile",
        })?;

    Ok(CardFields {
        name,
        profile_url: resolve_href(base_url, href),
        education: first_text(card, &education_sel),
        phone: first_text(card, &phone_sel),
        address: first_text(card, &address_sel),
        email: first_text(card, &email_sel),
        specialization: first_text(card, &specialization_sel),
    })
}

/// Parses every faculty card on a listing page, keeping the per-card outcome
/// so callers can account for skipped cards. Relative profile links are
/// resolved against `base_url`.
pub fn parse_cards(html: &str, base_url: &str) -> Vec<Result<CardFields, ParseError>> {
    let document = Html::parse_document(html);
    let card_sel = Selector::parse("div.facultyDetails").unwrap();

    document
        .select(&card_sel)
        .enumerate()
        .map(|(index, card)| parse_card(card, index, base_url))
        .collect()
}

/// Parses a listing page into its well-formed cards. Cards lacking a name or
/// profile link are logged and left out.
pub fn parse_directory(html: &str, base_url: &str) -> Vec<CardFields> {
    parse_cards(html, base_url)
        .into_iter()
        .filter_map(|card| {
            card.inspect_err(|e| log::error!("Skipping card on {}: {}", base_url, e))
                .ok()
        })
        .collect()
}

/// One attempt at extracting a list field from a profile page. `None` means
/// the strategy does not apply because the markup it reads is absent; the
/// next strategy is tried. `Some` ends the chain, even when every node was
/// blank.
type Strategy = fn(&Html) -> Option<Vec<String>>;

const TEACHING_STRATEGIES: &[Strategy] = &[teaching_list_items, teaching_plain_paragraphs];
const RESEARCH_STRATEGIES: &[Strategy] = &[research_list_items, research_paragraphs];

fn first_applicable(document: &Html, strategies: &[Strategy]) -> Vec<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy(document))
        .unwrap_or_default()
}

fn texts_if_present(document: &Html, css: &str) -> Option<Vec<String>> {
    let sel = Selector::parse(css).unwrap();
    let mut nodes = document.select(&sel).peekable();
    nodes.peek()?;
    Some(collect_texts(nodes))
}

fn teaching_list_items(document: &Html) -> Option<Vec<String>> {
    texts_if_present(document, "div.work-exp ul li")
}

// Paragraphs carrying a link are call-to-action text, not courses.
fn teaching_plain_paragraphs(document: &Html) -> Option<Vec<String>> {
    let paragraph_sel = Selector::parse("div.work-exp p").unwrap();
    let anchor_sel = Selector::parse("a").unwrap();

    Some(collect_texts(
        document
            .select(&paragraph_sel)
            .filter(|p| p.select(&anchor_sel).next().is_none()),
    ))
}

fn research_list_items(document: &Html) -> Option<Vec<String>> {
    texts_if_present(document, "div.work-exp1 li")
}

fn research_paragraphs(document: &Html) -> Option<Vec<String>> {
    texts_if_present(document, "div.work-exp1 p")
}

fn following_list(heading: ElementRef) -> Option<ElementRef> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "ul")
}

fn parse_publications(document: &Html) -> (Option<Vec<String>>, Option<Vec<String>>) {
    let block_sel = Selector::parse("div.education.overflowContent").unwrap();
    let heading_sel = Selector::parse("h4").unwrap();
    let item_sel = Selector::parse("li").unwrap();

    let Some(block) = document.select(&block_sel).next() else {
        return (None, None);
    };

    let mut journals = Vec::new();
    let mut conferences = Vec::new();

    for heading in block.select(&heading_sel) {
        let Some(list) = following_list(heading) else {
            continue;
        };
        let title = elem_text(heading).to_lowercase();
        let is_journal = title.contains("journal");
        let is_conference = title.contains("conference");
        if !is_journal && !is_conference {
            log::debug!("Ignoring publication heading: {}", title);
            continue;
        }

        let papers = collect_texts(list.select(&item_sel));
        if is_journal {
            journals = papers.clone();
        }
        if is_conference {
            conferences = papers;
        }
    }

    (
        Some(journals).filter(|v| !v.is_empty()),
        Some(conferences).filter(|v| !v.is_empty()),
    )
}

pub fn parse_profile(html: &str) -> ProfileFields {
    let document = Html::parse_document(html);

    let bio_sel = Selector::parse("div.about p").unwrap();
    let bio = document
        .select(&bio_sel)
        .next()
        .and_then(non_empty_text);

    let teaching = Teaching::from_entries(first_applicable(&document, TEACHING_STRATEGIES));

    let research_areas =
        Some(first_applicable(&document, RESEARCH_STRATEGIES)).filter(|v| !v.is_empty());

    let sites_sel = Selector::parse("div.field--name-field-sites a").unwrap();
    let personal_link = document
        .select(&sites_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let (journal_articles, conference_papers) = parse_publications(&document);

    ProfileFields {
        bio,
        teaching: Some(teaching),
        research_areas,
        personal_link,
        journal_articles,
        conference_papers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LISTING_URL: &str = "https://www.example.edu/faculty";

    fn fixture(name: &str) -> String {
        fs::read_to_string(format!("fixtures/{name}")).expect("Failed to read fixture")
    }

    #[test]
    fn test_parse_directory_from_fixture() {
        let cards = parse_directory(&fixture("listing.html"), LISTING_URL);

        assert_eq!(cards.len(), 3, "Card without a name anchor should be dropped");

        let first = &cards[0];
        assert_eq!(first.name, "Asha Mehta");
        assert_eq!(first.profile_url, "https://www.example.edu/faculty/asha-mehta");
        assert_eq!(first.education.as_deref(), Some("PhD, Computer Science"));
        assert_eq!(first.phone.as_deref(), Some("079-1234 5678"));
        assert_eq!(first.address.as_deref(), Some("Room 2104, Faculty Block 2"));
        assert_eq!(first.email.as_deref(), Some("asha_mehta[at]example[dot]edu"));
        assert_eq!(
            first.specialization.as_deref(),
            Some("Machine Learning, Information Retrieval")
        );

        let minimal = &cards[1];
        assert_eq!(minimal.name, "Rahul Verma");
        assert_eq!(minimal.education, None);
        assert_eq!(minimal.phone, None);
        assert_eq!(minimal.address, None);
        assert_eq!(minimal.email, None);
        assert_eq!(minimal.specialization, None);
    }

    #[test]
    fn test_parse_directory_resolves_relative_links() {
        let cards = parse_directory(&fixture("listing.html"), LISTING_URL);
        assert_eq!(cards[1].profile_url, "https://www.example.edu/rahul-verma");
        assert_eq!(cards[2].profile_url, "https://people.example.org/~nair");
    }

    #[test]
    fn test_parse_cards_reports_missing_anchor() {
        let outcomes = parse_cards(&fixture("listing.html"), LISTING_URL);
        assert_eq!(outcomes.len(), 4);
        let err = outcomes[2].as_ref().expect_err("Third card has no anchor");
        assert!(matches!(
            err,
            ParseError::MissingField {
                card: 2,
                field: "name"
            }
        ));
    }

    #[test]
    fn test_parse_directory_card_without_href() {
        let html = r#"
            <div class="facultyDetails"><h3><a>No Link</a></h3></div>
            <div class="facultyDetails"><h3><a href="/ok">Has Link</a></h3></div>
        "#;
        let outcomes = parse_cards(html, LISTING_URL);
        assert!(matches!(
            outcomes[0],
            Err(ParseError::MissingField {
                field: "profile",
                ..
            })
        ));
        let cards = parse_directory(html, LISTING_URL);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Has Link");
    }

    #[test]
    fn test_parse_directory_empty_page() {
        assert!(parse_directory("", LISTING_URL).is_empty());
        assert!(parse_directory("<html><body><p>Nothing here</p></body></html>", LISTING_URL).is_empty());
    }

    #[test]
    fn test_parse_profile_from_fixture() {
        let profile = parse_profile(&fixture("profile_full.html"));

        assert_eq!(
            profile.bio.as_deref(),
            Some("Asha Mehta is a Professor working on retrieval systems.")
        );
        assert_eq!(
            profile.teaching,
            Some(Teaching::Entries(vec![
                "IT 314 Software Engineering".to_string(),
                "CS 501 Information Retrieval".to_string(),
            ]))
        );
        assert_eq!(
            profile.research_areas,
            Some(vec![
                "Neural ranking".to_string(),
                "Query understanding".to_string()
            ])
        );
        assert_eq!(
            profile.personal_link.as_deref(),
            Some("https://asha.example.org")
        );

        let journals = profile.journal_articles.expect("Should have journals");
        assert_eq!(journals.len(), 3);
        assert_eq!(journals[0], "A. Mehta, Dense retrieval at scale, JIR 2021");
        assert_eq!(journals[2], "A. Mehta, Sparse features revisited, TOIS 2023");

        let conferences = profile.conference_papers.expect("Should have conferences");
        assert_eq!(
            conferences,
            vec![
                "A. Mehta, Learned sparse retrieval, SIGIR 2022".to_string(),
                "A. Mehta, Query rewriting, ECIR 2023".to_string(),
            ]
        );
    }

    #[test]
    fn test_teaching_falls_back_to_plain_paragraphs() {
        let profile = parse_profile(&fixture("profile_paragraphs.html"));
        assert_eq!(
            profile.teaching,
            Some(Teaching::Entries(vec![
                "Discrete Mathematics".to_string(),
                "Theory of Computation".to_string(),
            ]))
        );
        assert_eq!(
            profile.research_areas,
            Some(vec!["Graph algorithms and combinatorics".to_string()])
        );
        assert_eq!(profile.journal_articles, None);
        assert_eq!(profile.conference_papers, None);
    }

    #[test]
    fn test_teaching_sentinel_when_nothing_found() {
        let profile = parse_profile(&fixture("profile_empty.html"));
        assert_eq!(profile.teaching, Some(Teaching::NotProvided));
        assert_eq!(profile.bio, None);
        assert_eq!(profile.research_areas, None);
        assert_eq!(profile.personal_link, None);
        assert_eq!(profile.journal_articles, None);
        assert_eq!(profile.conference_papers, None);
    }

    #[test]
    fn test_teaching_only_link_paragraphs_is_sentinel() {
        let html = r#"<div class="work-exp">
            <p>Read more on the <a href="/courses">courses page</a></p>
            <p>&nbsp;</p>
        </div>"#;
        assert_eq!(parse_profile(html).teaching, Some(Teaching::NotProvided));
    }

    #[test]
    fn test_teaching_list_items_win_over_paragraphs() {
        let html = r#"<div class="work-exp">
            <p>Courses taught</p>
            <ul><li>Operating&nbsp;Systems</li><li>  </li><li>Compilers</li></ul>
        </div>"#;
        assert_eq!(
            parse_profile(html).teaching,
            Some(Teaching::Entries(vec![
                "Operating Systems".to_string(),
                "Compilers".to_string()
            ]))
        );
    }

    #[test]
    fn test_blank_teaching_list_does_not_fall_back_to_paragraphs() {
        let html = r#"<div class="work-exp">
            <ul><li>&nbsp;</li><li> </li></ul>
            <p>Course X</p>
        </div>"#;
        assert_eq!(parse_profile(html).teaching, Some(Teaching::NotProvided));
    }

    #[test]
    fn test_blank_research_list_does_not_fall_back_to_paragraphs() {
        let html = r#"<div class="work-exp1">
            <ul><li>&nbsp;</li></ul>
            <p>Distributed systems</p>
        </div>"#;
        assert_eq!(parse_profile(html).research_areas, None);

        let html = r#"<div class="work-exp1"><p>&nbsp;</p></div>"#;
        assert_eq!(parse_profile(html).research_areas, None);
    }

    #[test]
    fn test_research_does_not_read_teaching_block() {
        let html = r#"
            <div class="work-exp"><ul><li>Networks</li></ul></div>
            <div class="work-exp1"></div>
        "#;
        let profile = parse_profile(html);
        assert_eq!(profile.research_areas, None);
        assert_eq!(
            profile.teaching,
            Some(Teaching::Entries(vec!["Networks".to_string()]))
        );
    }

    #[test]
    fn test_publications_heading_without_list_is_skipped() {
        let html = r#"<div class="education overflowContent">
            <h4>Journal Articles</h4>
            <p>Coming soon</p>
            <h4>Conference Papers</h4>
            <ul><li>Paper one</li></ul>
        </div>"#;
        let profile = parse_profile(html);
        // The journal heading's first following list is the conference one.
        assert_eq!(profile.journal_articles, Some(vec!["Paper one".to_string()]));
        assert_eq!(profile.conference_papers, Some(vec!["Paper one".to_string()]));

        let html = r#"<div class="education overflowContent">
            <ul><li>Orphan</li></ul>
            <h4>Journal Articles</h4>
        </div>"#;
        let profile = parse_profile(html);
        assert_eq!(profile.journal_articles, None);
    }

    #[test]
    fn test_publications_unrecognised_headings() {
        let html = r#"<div class="education overflowContent">
            <h4>Books</h4><ul><li>A book</li></ul>
            <h4>Patents</h4><ul><li>A patent</li></ul>
        </div>"#;
        let profile = parse_profile(html);
        assert_eq!(profile.journal_articles, None);
        assert_eq!(profile.conference_papers, None);
    }

    #[test]
    fn test_publications_last_matching_heading_wins() {
        let html = r#"<div class="education overflowContent">
            <h4>Journal Articles (2010-2015)</h4><ul><li>Old</li></ul>
            <h4>JOURNAL ARTICLES (2016-)</h4><ul><li>New 1</li><li>New 2</li></ul>
        </div>"#;
        let profile = parse_profile(html);
        assert_eq!(
            profile.journal_articles,
            Some(vec!["New 1".to_string(), "New 2".to_string()])
        );
    }

    #[test]
    fn test_publications_heading_matching_both_buckets() {
        let html = r#"<div class="education overflowContent">
            <h4>Journal Articles</h4><ul><li>J1</li></ul>
            <h4>Conference and Journal Proceedings</h4><ul><li>Both</li></ul>
        </div>"#;
        let profile = parse_profile(html);
        assert_eq!(profile.journal_articles, Some(vec!["Both".to_string()]));
        assert_eq!(profile.conference_papers, Some(vec!["Both".to_string()]));
    }

    #[test]
    fn test_elem_text_normalizes_whitespace() {
        let document = Html::parse_fragment("<li>  Data\u{a0}Mining <b>and</b>\n Warehousing </li>");
        let li_sel = Selector::parse("li").unwrap();
        let li = document.select(&li_sel).next().unwrap();
        assert_eq!(elem_text(li), "Data Mining and Warehousing");
    }
}
