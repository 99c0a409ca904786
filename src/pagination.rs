//! Pagination
//!
//! Slices listings into fixed-size pages and builds the compact page-number
//! strip shown under a listing.

use serde::{Serialize, Serializer};

/// Items shown per page
pub const PAGE_SIZE: usize = 6;

/// Longest page count for which every page number is shown
const MAX_FULL_LABELS: usize = 6;

/// One entry of the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Number(usize),
    Ellipsis,
}

impl Serialize for PageLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageLabel::Number(n) => serializer.serialize_u64(*n as u64),
            PageLabel::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Pagination metadata for one page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_num: Option<usize>,
    pub next_num: Option<usize>,
    pub page_numbers: Vec<PageLabel>,
}

/// A page worth of items plus its metadata
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: Page,
}

/// Cuts page `page` (1-based) out of `items`.
///
/// `page` is not clamped to the last page; asking past the end yields an
/// empty slice. A `page` of 0 is treated as 1.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Paginated<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let page_items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    let has_prev = page > 1;
    let has_next = page < total_pages;

    Paginated {
        items: page_items,
        page: Page {
            page,
            per_page,
            total,
            total_pages,
            has_prev,
            has_next,
            prev_num: has_prev.then(|| page - 1),
            next_num: has_next.then(|| page + 1),
            page_numbers: page_labels(page, total_pages),
        },
    }
}

/// Page-number strip: every page when there are few, otherwise first, last
/// and a window around `current` separated by ellipses.
pub fn page_labels(current: usize, total_pages: usize) -> Vec<PageLabel> {
    use PageLabel::{Ellipsis, Number};

    if total_pages <= MAX_FULL_LABELS {
        return (1..=total_pages).map(Number).collect();
    }

    let mut labels = Vec::with_capacity(7);

    if current <= 3 {
        labels.extend((1..=4).map(Number));
        labels.push(Ellipsis);
        labels.push(Number(total_pages));
    } else if current >= total_pages - 2 {
        labels.push(Number(1));
        labels.push(Ellipsis);
        labels.extend((total_pages - 3..=total_pages).map(Number));
    } else {
        labels.push(Number(1));
        labels.push(Ellipsis);
        labels.extend((current - 1..=current + 1).map(Number));
        labels.push(Ellipsis);
        labels.push(Number(total_pages));
    }

    labels
}
