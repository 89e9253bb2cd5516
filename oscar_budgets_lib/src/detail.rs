//! Extraction of the budget row from a film page's infobox.

use regex::Regex;

use crate::error::SurveyError;
use crate::markup::{Document, Node};
use crate::money::RawMoney;

const BUDGET_LABEL: &str = ">Budget<";
const SIDEBAR_CLASS: &str = "infobox";

/// Returns the budget text of the film at `identifier`.
///
/// Zero budget rows is a legitimate "not available"; more than one is an
/// error, never resolved by picking the first.
pub fn extract_budget_text(doc: &Document, identifier: &str) -> Result<RawMoney, SurveyError> {
    let sidebar = find_sidebar(doc, identifier)?;
    let rows = sidebar
        .rows()
        .map_err(|e| SurveyError::markup(identifier, e))?;

    // The label must sit right against a tag so captions mentioning
    // "budget" in running text do not qualify.
    let matches: Vec<Node<'_>> = rows
        .into_iter()
        .filter(|row| row.serialized().contains(BUDGET_LABEL))
        .collect();

    match matches.as_slice() {
        [] => {
            tracing::debug!("no budget row on {}", identifier);
            Ok(RawMoney::NotAvailable)
        }
        [row] => {
            let cell = row
                .first_cell()
                .map_err(|e| SurveyError::markup(identifier, e))?
                .ok_or_else(|| SurveyError::structure(identifier, "budget row has no value cell"))?;
            let text = clean_budget_text(&cell.text())?;
            tracing::debug!("budget text for {}: {}", identifier, text);
            Ok(RawMoney::Text(text))
        }
        rows => Err(SurveyError::AmbiguousField {
            item: identifier.to_string(),
            field: "Budget".to_string(),
            count: rows.len(),
        }),
    }
}

/// Prefers the table tagged as an infobox, falling back to the first table.
fn find_sidebar<'a>(doc: &'a Document, identifier: &str) -> Result<Node<'a>, SurveyError> {
    let tables = doc
        .tables()
        .map_err(|e| SurveyError::markup(identifier, e))?;
    tables
        .iter()
        .find(|t| t.has_class(SIDEBAR_CLASS))
        .or_else(|| tables.first())
        .copied()
        .ok_or_else(|| SurveyError::structure(identifier, "no table on the page"))
}

/// Drops `[n]` footnote markers and collapses every whitespace run,
/// non-breaking spaces included, into a single ASCII space.
pub fn clean_budget_text(text: &str) -> Result<String, SurveyError> {
    let footnote_re = Regex::new(r"\[\d+\]")?;
    let without_notes = footnote_re.replace_all(text, "");
    Ok(without_notes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film_page(infobox_rows: &str) -> Document {
        let html = format!(
            r#"<html><body>
            <table class="infobox vevent"><tbody>
              <tr><th colspan="2" class="infobox-above summary">Wings</th></tr>
              {}
            </tbody></table>
            <table class="wikitable"><tr><th>Budget</th><td>$99 million</td></tr></table>
            </body></html>"#,
            infobox_rows
        );
        Document::parse(&html).unwrap()
    }

    #[test]
    fn single_row_with_footnote() {
        let doc = film_page(
            r##"<tr><th scope="row" class="infobox-label">Budget</th>
               <td class="infobox-data">$2 million<sup class="reference"><a href="#cite_note-1">[1]</a></sup></td></tr>"##,
        );
        let raw = extract_budget_text(&doc, "/wiki/Wings_(1927_film)").unwrap();
        assert_eq!(raw, RawMoney::Text("$2 million".into()));
    }

    #[test]
    fn multiple_footnotes_and_nbsp() {
        let doc = film_page(
            "<tr><th>Budget</th><td>£6\u{2013}7&nbsp;million[2][3]</td></tr>",
        );
        let raw = extract_budget_text(&doc, "/wiki/Hamlet_(1948_film)").unwrap();
        assert_eq!(raw, RawMoney::Text("£6\u{2013}7 million".into()));
    }

    #[test]
    fn no_row_is_not_available() {
        let doc = film_page("<tr><th>Running time</th><td>144 minutes</td></tr>");
        let raw = extract_budget_text(&doc, "/wiki/Wings_(1927_film)").unwrap();
        assert_eq!(raw, RawMoney::NotAvailable);
    }

    #[test]
    fn label_inside_running_text_does_not_count() {
        let doc = film_page("<tr><td>Budget overruns plagued the shoot.</td></tr>");
        let raw = extract_budget_text(&doc, "/wiki/Cleopatra").unwrap();
        assert_eq!(raw, RawMoney::NotAvailable);
    }

    #[test]
    fn two_rows_are_ambiguous() {
        let doc = film_page(
            r#"<tr><th>Budget</th><td>$1 million</td></tr>
               <tr><th>Budget</th><td>$2 million</td></tr>"#,
        );
        match extract_budget_text(&doc, "/wiki/Twice") {
            Err(SurveyError::AmbiguousField { item, count, .. }) => {
                assert_eq!(item, "/wiki/Twice");
                assert_eq!(count, 2);
            }
            other => panic!("expected AmbiguousField, got {:?}", other),
        }
    }

    #[test]
    fn falls_back_to_first_table_without_infobox_class() {
        let html = r#"<html><body>
            <table><tr><th>Budget</th><td>$3,000,000</td></tr></table>
            <table><tr><th>Budget</th><td>$9 million</td></tr></table>
            </body></html>"#;
        let doc = Document::parse(html).unwrap();
        let raw = extract_budget_text(&doc, "/wiki/Plain").unwrap();
        assert_eq!(raw, RawMoney::Text("$3,000,000".into()));
    }

    #[test]
    fn page_without_tables_is_structure_error() {
        let doc = Document::parse("<html><body><p>Stub article.</p></body></html>").unwrap();
        assert!(matches!(
            extract_budget_text(&doc, "/wiki/Stub"),
            Err(SurveyError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn row_without_value_cell_is_structure_error() {
        let doc = film_page("<tr><th>Budget</th></tr>");
        assert!(matches!(
            extract_budget_text(&doc, "/wiki/Empty"),
            Err(SurveyError::StructureNotFound { .. })
        ));
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        let cleaned = clean_budget_text("  $1.25\u{a0}\u{2009}million\n[4] ").unwrap();
        assert_eq!(cleaned, "$1.25 million");
    }
}
