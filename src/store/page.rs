/// One page of an in-memory sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Zero-based index of this page.
    pub index: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }
}

/// Slices `items` into pages of `page_size`; a page past the end clamps to the last one.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let index = page.min(total_pages.saturating_sub(1));
    let start = index * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        index,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_items_in_pages_of_five() {
        let items: Vec<usize> = (0..12).collect();

        let first = paginate(&items, 5, 0);
        assert_eq!(first.items, &[0, 1, 2, 3, 4]);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, 5, 2);
        assert_eq!(last.items, &[10, 11]);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn test_page_past_end_clamps() {
        let items: Vec<usize> = (0..7).collect();
        let page = paginate(&items, 5, 9);
        assert_eq!(page.index, 1);
        assert_eq!(page.items, &[5, 6]);
    }

    #[test]
    fn test_empty_sequence_has_no_pages() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, 5, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
