//! Cursor pagination types

use std::{fmt, str::FromStr};

use serde::Deserialize;

use super::error::ClientError;

/// Which cursor to follow on a list call
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Page {
    Next,
    Previous,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Next => f.write_str("next"),
            Page::Previous => f.write_str("previous"),
        }
    }
}

impl FromStr for Page {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Page::Next),
            "previous" | "prev" => Ok(Page::Previous),
            other => Err(ClientError::InvalidPage(other.into())),
        }
    }
}

/// Next/previous page URLs handed out by the server on the last list call
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PageCursor {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageCursor {
    pub fn get(&self, page: Page) -> Option<&str> {
        match page {
            Page::Next => self.next.as_deref(),
            Page::Previous => self.previous.as_deref(),
        }
    }

    pub fn clear(&mut self) {
        self.next = None;
        self.previous = None;
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.previous.is_none()
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            next: self.next.clone(),
            previous: self.previous.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn page_selectors() {
        assert_eq!("next".parse::<Page>().unwrap(), Page::Next);
        assert_eq!("previous".parse::<Page>().unwrap(), Page::Previous);
        assert_eq!("prev".parse::<Page>().unwrap(), Page::Previous);
        assert!(matches!(
            "last".parse::<Page>(),
            Err(ClientError::InvalidPage(s)) if s == "last"
        ));
    }

    #[test]
    fn envelope_with_null_previous() {
        let page: Paginated<Value> = serde_json::from_value(json!({
            "count": 3,
            "previous": null,
            "next": "U2",
            "results": [{"id": 1}]
        }))
        .unwrap();

        assert_eq!(page.results, vec![json!({"id": 1})]);
        assert_eq!(
            page.cursor(),
            PageCursor { next: Some("U2".into()), previous: None }
        );
    }

    #[test]
    fn cursor_lookup_and_clear() {
        let mut cursor = PageCursor {
            next: Some("https://h/a/?page=3".into()),
            previous: Some("https://h/a/?page=1".into()),
        };
        assert_eq!(cursor.get(Page::Next), Some("https://h/a/?page=3"));
        assert_eq!(cursor.get(Page::Previous), Some("https://h/a/?page=1"));

        cursor.clear();
        assert!(cursor.is_empty());
        assert_eq!(cursor.get(Page::Next), None);
    }
}
