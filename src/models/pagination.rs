use serde::Serialize;

/// Upper bound on any client-requested page size
pub const MAX_PAGE_SIZE: u32 = 200;

/// One page of a listing, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Reads `page` and `page_size` query values leniently.
    ///
    /// Missing, unparsable or zero values fall back to page 1 and
    /// `default_size`; sizes above [`MAX_PAGE_SIZE`] are clamped.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>, default_size: u32) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v >= 1)
        };

        Self {
            number: parse(page).unwrap_or(1),
            size: parse(page_size)
                .map(|size| size.min(MAX_PAGE_SIZE))
                .unwrap_or(default_size),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}

/// One page of a listing plus the total number of matching rows
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(count: i64, page: Page, results: Vec<T>) -> Self {
        Self {
            count,
            page: page.number,
            page_size: page.size,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        assert_eq!(
            Page::from_query(None, None, 30),
            Page { number: 1, size: 30 }
        );
    }

    #[test]
    fn test_size_is_clamped() {
        let page = Page::from_query(Some("3"), Some("5000"), 20);
        assert_eq!(page.size, MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 400);
    }

    #[test]
    fn test_zero_and_garbage_fall_back() {
        assert_eq!(
            Page::from_query(Some("0"), Some("lots"), 20),
            Page { number: 1, size: 20 }
        );
    }
}
