pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the `page`-th (1-based) slice of `QUESTIONS_PER_PAGE` items.
/// Pages past the end, and pages below 1, are empty.
pub fn paginate<T>(page: i64, items: Vec<T>) -> Vec<T> {
    paginate_by(page, QUESTIONS_PER_PAGE, items)
}

pub fn paginate_by<T>(page: i64, page_size: usize, items: Vec<T>) -> Vec<T> {
    let Ok(index) = usize::try_from(page.saturating_sub(1)) else {
        return Vec::new();
    };
    let start = index.saturating_mul(page_size);
    items.into_iter().skip(start).take(page_size).collect()
}
