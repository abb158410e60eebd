/// 1 ページあたりの件数
pub const PAGE_SIZE: usize = 20;

/// 1 始まりのページを切り出す
///
/// 全体が 1 ページに満たないならページ番号に関わらず全件を返す。0 は 1 ページ目として扱う。
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    if items.len() < PAGE_SIZE {
        return items;
    }

    let page = page.max(1);
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// 総ページ数（`ceil(len / PAGE_SIZE)`）
pub fn max_page(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_records_split_into_three_pages() {
        let items: Vec<usize> = (0..45).collect();

        assert_eq!(page_slice(&items, 1).len(), 20);
        assert_eq!(page_slice(&items, 2).len(), 20);
        assert_eq!(page_slice(&items, 3), &items[40..45]);
        assert!(page_slice(&items, 4).is_empty());
        assert_eq!(max_page(items.len()), 3);
    }

    #[test]
    fn small_collections_ignore_page_number() {
        let items: Vec<usize> = (0..5).collect();
        assert_eq!(page_slice(&items, 7).len(), 5);
        assert_eq!(max_page(5), 1);
        assert_eq!(max_page(0), 0);
    }

    #[test]
    fn exactly_one_full_page_is_not_repeated() {
        let items: Vec<usize> = (0..PAGE_SIZE).collect();
        assert_eq!(page_slice(&items, 1).len(), PAGE_SIZE);
        assert!(page_slice(&items, 2).is_empty());
        assert_eq!(max_page(items.len()), 1);
    }

    #[test]
    fn page_zero_is_first_page() {
        let items: Vec<usize> = (0..30).collect();
        assert_eq!(page_slice(&items, 0), page_slice(&items, 1));
    }
}
