//! Extraction of the winners list from the Best Picture index page.

use regex::Regex;
use serde::Serialize;

use crate::error::SurveyError;
use crate::markup::Document;

/// One entry of the winners list.
///
/// `year` stays text: ceremonies before 1934 span two years (`"1927/28"`),
/// and the value doubles as the exchange-rate lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStub {
    pub identifier: String,
    pub title: String,
    pub year: String,
}

const INDEX_PAGE: &str = "index page";

/// Returns the winners in document order.
///
/// The list lives in the second-to-last table of the page; trailing
/// navigation tables get appended far more often than anything lands
/// right after the list. Only list items ending in a parenthesised year
/// count as entries, which drops headers and spacers.
pub fn extract_items(doc: &Document) -> Result<Vec<ItemStub>, SurveyError> {
    let entry_re = Regex::new(r"^.+\(.+\)")?;
    let year_re = Regex::new(r"</i>\s+\((.+)\)</li>")?;

    let tables = doc
        .tables()
        .map_err(|e| SurveyError::markup(INDEX_PAGE, e))?;
    if tables.len() < 2 {
        return Err(SurveyError::structure(
            INDEX_PAGE,
            format!("expected at least 2 tables, found {}", tables.len()),
        ));
    }
    let container = tables[tables.len() - 2];
    let candidates = container
        .list_items()
        .map_err(|e| SurveyError::markup(INDEX_PAGE, e))?;

    let mut items = Vec::new();
    for li in candidates {
        if !entry_re.is_match(&li.text()) {
            continue;
        }
        let markup = li.serialized();

        let link = li
            .first_link()
            .map_err(|e| SurveyError::markup(INDEX_PAGE, e))?
            .ok_or_else(|| {
                SurveyError::structure(INDEX_PAGE, format!("no link in list item {}", markup))
            })?;
        let identifier = link
            .attr("href")
            .ok_or_else(|| {
                SurveyError::structure(INDEX_PAGE, format!("link without href in {}", markup))
            })?
            .to_string();
        let title = link.text().trim().to_string();
        let year = year_re
            .captures(&markup)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                SurveyError::structure(INDEX_PAGE, format!("no year after {}", identifier))
            })?;

        items.push(ItemStub {
            identifier,
            title,
            year,
        });
    }

    tracing::debug!("extracted {} items from the index page", items.len());
    Ok(items)
}

/// Fails when the caller knows how many items to expect and the listing disagrees.
pub fn check_expected_count(items: &[ItemStub], expected: Option<usize>) -> Result<(), SurveyError> {
    match expected {
        Some(expected) if expected != items.len() => Err(SurveyError::PopulationMismatch {
            expected,
            found: items.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(list: &str) -> Document {
        let html = format!(
            r#"<html><body>
            <table class="wikitable"><tr><td>Ceremony data</td></tr></table>
            <table class="navbox"><tr><td><ul>{}</ul></td></tr></table>
            <table class="navbox"><tr><td>Authority control</td></tr></table>
            </body></html>"#,
            list
        );
        Document::parse(&html).unwrap()
    }

    #[test]
    fn extracts_entries_in_order() {
        let doc = page(
            r#"<li><i><a href="/wiki/Wings_(1927_film)" title="Wings (1927 film)">Wings</a></i> (1927/28)</li>
               <li><i><a href="/wiki/Hamlet_(1948_film)" title="Hamlet (1948 film)">Hamlet</a></i> (1948)</li>"#,
        );
        let items = extract_items(&doc).unwrap();
        assert_eq!(
            items,
            vec![
                ItemStub {
                    identifier: "/wiki/Wings_(1927_film)".into(),
                    title: "Wings".into(),
                    year: "1927/28".into(),
                },
                ItemStub {
                    identifier: "/wiki/Hamlet_(1948_film)".into(),
                    title: "Hamlet".into(),
                    year: "1948".into(),
                },
            ]
        );
    }

    #[test]
    fn skips_items_without_parenthetical() {
        let doc = page(
            r#"<li><a href="/wiki/1920s">1920s</a></li>
               <li><i><a href="/wiki/Rocky">Rocky</a></i> (1976)</li>"#,
        );
        let items = extract_items(&doc).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Rocky");
    }

    #[test]
    fn parenthesised_href_alone_does_not_make_an_entry() {
        let doc = page(
            r#"<li><a href="/wiki/Wings_(1927_film)">see also</a></li>
               <li><i><a href="/wiki/Rocky">Rocky</a></i> (1976)</li>"#,
        );
        let items = extract_items(&doc).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier, "/wiki/Rocky");
    }

    #[test]
    fn ignores_lists_outside_the_container() {
        let html = r#"<html><body>
            <table><tr><td><ul><li><i><a href="/wiki/Decoy">Decoy</a></i> (1999)</li></ul></td></tr></table>
            <table><tr><td><ul><li><i><a href="/wiki/Real">Real</a></i> (2000)</li></ul></td></tr></table>
            <table><tr><td>footer</td></tr></table>
            </body></html>"#;
        let doc = Document::parse(html).unwrap();
        let items = extract_items(&doc).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier, "/wiki/Real");
    }

    #[test]
    fn single_table_is_structure_error() {
        let doc = Document::parse("<html><body><table><tr><td>x</td></tr></table></body></html>")
            .unwrap();
        assert!(matches!(
            extract_items(&doc),
            Err(SurveyError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn entry_without_link_is_structure_error() {
        let doc = page("<li><i>Untitled</i> (1950)</li>");
        assert!(matches!(
            extract_items(&doc),
            Err(SurveyError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn entry_without_italic_year_is_structure_error() {
        let doc = page(r#"<li><a href="/wiki/Odd">Odd (film)</a></li>"#);
        assert!(matches!(
            extract_items(&doc),
            Err(SurveyError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn extraction_is_repeatable() {
        let doc = page(r#"<li><i><a href="/wiki/Gandhi_(film)">Gandhi</a></i> (1982)</li>"#);
        let first = extract_items(&doc).unwrap();
        let second = extract_items(&doc).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn expected_count_check() {
        let items = vec![ItemStub {
            identifier: "/wiki/Rocky".into(),
            title: "Rocky".into(),
            year: "1976".into(),
        }];
        assert!(check_expected_count(&items, None).is_ok());
        assert!(check_expected_count(&items, Some(1)).is_ok());
        assert!(matches!(
            check_expected_count(&items, Some(86)),
            Err(SurveyError::PopulationMismatch {
                expected: 86,
                found: 1
            })
        ));
    }
}
