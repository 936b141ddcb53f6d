use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PAGINATION_TEXT: Regex =
        Regex::new(r"(?:(\d[\d,]*)\s*-\s*(\d[\d,]*)\s+)?of\s+(\d[\d,]*)").expect("valid pagination pattern");
}

/// The item range shown on the current page, 1-based and inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemRange {
    pub first: usize,
    pub last: usize,
}

impl ItemRange {
    pub fn len(&self) -> usize {
        (self.last + 1).saturating_sub(self.first)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a pagination control displays, e.g. `1 - 10 of 23`.
///
/// Derived from the control on every read, never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    pub range: Option<ItemRange>,
    pub total_items: usize,
}

impl PaginationState {
    /// Parse the control text. `None` when it contains no `of <total>`.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = PAGINATION_TEXT.captures(text)?;
        let number = |index: usize| captures.get(index).and_then(|m| m.as_str().replace(',', "").parse().ok());

        let total_items = number(3)?;
        let range = match (number(1), number(2)) {
            (Some(first), Some(last)) => Some(ItemRange { first, last }),
            _ => None,
        };

        Some(Self { range, total_items })
    }

    pub fn current_page_items(&self) -> Option<usize> {
        self.range.map(|range| range.len())
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        match page_size {
            0 => 0,
            size => (self.total_items + size - 1) / size,
        }
    }

    /// 1-based index of the page currently shown, if the range is known.
    pub fn page_index(&self, page_size: usize) -> Option<usize> {
        match (self.range, page_size) {
            (_, 0) | (None, _) => None,
            (Some(range), size) => Some((range.first.saturating_sub(1)) / size + 1),
        }
    }

    /// Number of rows expected on `page` (1-based).
    pub fn expected_rows(&self, page: usize, page_size: usize) -> usize {
        let before = (page - 1) * page_size;
        self.total_items.saturating_sub(before).min(page_size)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range_and_total() {
        let state = PaginationState::parse("1 - 10 of 23").unwrap();
        assert_eq!(state.range, Some(ItemRange { first: 1, last: 10 }));
        assert_eq!(state.total_items, 23);
        assert_eq!(state.current_page_items(), Some(10));
        assert_eq!(state.page_count(10), 3);
        assert_eq!(state.page_index(10), Some(1));
    }

    #[test]
    fn rendered_markup_text() {
        // the toggle renders `<b>11 - 20</b> of <b>23</b>`, which reads with line breaks at times
        let state = PaginationState::parse("11 - 20\nof\n23").unwrap();
        assert_eq!(state.range, Some(ItemRange { first: 11, last: 20 }));
        assert_eq!(state.page_index(10), Some(2));
    }

    #[test]
    fn total_only() {
        let state = PaginationState::parse("of 5").unwrap();
        assert_eq!(state.range, None);
        assert_eq!(state.total_items, 5);
        assert_eq!(state.current_page_items(), None);
    }

    #[test]
    fn thousands_separators() {
        let state = PaginationState::parse("1,001 - 1,010 of 12,345").unwrap();
        assert_eq!(state.range, Some(ItemRange { first: 1001, last: 1010 }));
        assert_eq!(state.total_items, 12_345);
    }

    #[test]
    fn unparsable() {
        assert_eq!(PaginationState::parse(""), None);
        assert_eq!(PaginationState::parse("Loading"), None);
        assert_eq!(PaginationState::parse("1 - 10 of many"), None);
    }

    #[test]
    fn zero_total_still_parses() {
        assert_eq!(PaginationState::parse("0 - 0 of 0").unwrap().total_items, 0);
    }

    #[test]
    fn remainder_on_last_page() {
        let state = PaginationState::parse("1 - 10 of 23").unwrap();
        assert_eq!(state.expected_rows(1, 10), 10);
        assert_eq!(state.expected_rows(2, 10), 10);
        assert_eq!(state.expected_rows(3, 10), 3);

        let even = PaginationState::parse("1 - 10 of 20").unwrap();
        assert_eq!(even.page_count(10), 2);
        assert_eq!(even.expected_rows(2, 10), 10);
    }
}
