use serde::{Deserialize, Serialize};

/// Parameters of a paginated list read. Doubles as the list cache key, so
/// a blank search is normalized to `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, size: u32, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { page, size, search }
    }

    pub fn first(size: u32) -> Self {
        Self::new(0, size, None)
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Changing the page size or the search always goes back to page 0.
    pub fn with_size(&self, size: u32) -> Self {
        Self {
            page: 0,
            size,
            search: self.search.clone(),
        }
    }

    pub fn with_search(&self, search: &str) -> Self {
        Self::new(0, self.size, Some(search))
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_shares_key_with_no_search() {
        assert_eq!(ListQuery::new(0, 5, Some("   ")), ListQuery::new(0, 5, None));
        assert_eq!(ListQuery::new(0, 5, Some(" ac ")).search.as_deref(), Some("ac"));
    }

    #[test]
    fn size_and_search_changes_reset_page() {
        let query = ListQuery::new(3, 5, Some("acme"));
        assert_eq!(query.with_size(10), ListQuery::new(0, 10, Some("acme")));
        assert_eq!(query.with_search("foo"), ListQuery::new(0, 5, Some("foo")));
        assert_eq!(query.with_page(4).page, 4);
    }

    #[test]
    fn pairs_omit_absent_search() {
        let pairs = ListQuery::new(2, 10, None).to_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
    }
}
