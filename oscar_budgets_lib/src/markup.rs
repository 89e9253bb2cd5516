//! Thin adapter over `scraper` exposing only the queries the extractors need.

use scraper::{ElementRef, Html, Selector};

/// Errors raised while turning page text into a navigable document.
#[derive(thiserror::Error, Debug)]
pub enum MarkupError {
    #[error("malformed markup: {0}")]
    Malformed(String),
    #[error("invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

/// A parsed page.
pub struct Document {
    html: Html,
}

/// An element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

fn selector(css: &str) -> Result<Selector, MarkupError> {
    Selector::parse(css).map_err(|e| MarkupError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

impl Document {
    /// Parses raw page text. Empty text, or text without a single tag,
    /// is rejected rather than turned into an empty tree.
    pub fn parse(raw: &str) -> Result<Self, MarkupError> {
        if raw.trim().is_empty() {
            return Err(MarkupError::Malformed("empty document".into()));
        }
        if !raw.contains('<') {
            return Err(MarkupError::Malformed("no tags found".into()));
        }
        Ok(Self {
            html: Html::parse_document(raw),
        })
    }

    /// All tables in document order, nested tables included.
    pub fn tables(&self) -> Result<Vec<Node<'_>>, MarkupError> {
        let sel = selector("table")?;
        Ok(self
            .html
            .select(&sel)
            .map(|element| Node { element })
            .collect())
    }
}

impl<'a> Node<'a> {
    fn select_all(&self, css: &str) -> Result<Vec<Node<'a>>, MarkupError> {
        let sel = selector(css)?;
        Ok(self
            .element
            .select(&sel)
            .map(|element| Node { element })
            .collect())
    }

    fn select_first(&self, css: &str) -> Result<Option<Node<'a>>, MarkupError> {
        let sel = selector(css)?;
        Ok(self.element.select(&sel).next().map(|element| Node { element }))
    }

    /// List items anywhere below this node.
    pub fn list_items(&self) -> Result<Vec<Node<'a>>, MarkupError> {
        self.select_all("li")
    }

    /// Table rows anywhere below this node.
    pub fn rows(&self) -> Result<Vec<Node<'a>>, MarkupError> {
        self.select_all("tr")
    }

    /// The first data cell below this node.
    pub fn first_cell(&self) -> Result<Option<Node<'a>>, MarkupError> {
        self.select_first("td")
    }

    /// The first link below this node.
    pub fn first_link(&self) -> Result<Option<Node<'a>>, MarkupError> {
        self.select_first("a")
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Outer markup of the node, tags included.
    pub fn serialized(&self) -> String {
        self.element.html()
    }

    /// Rendered text of the node and its descendants.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}
