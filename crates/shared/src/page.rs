use serde::Serialize;

pub const PER_PAGE: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub count: u64,
    pub per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    /// An empty result still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        if self.count == 0 {
            return 1;
        }

        self.count.div_ceil(self.per_page)
    }

    /// Resolves a raw `?page=` value the lenient way: anything that is not an
    /// integer lands on the first page, anything out of range on the last.
    pub fn page_number(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return 1;
        };

        let Ok(number) = raw.parse::<i64>() else {
            return 1;
        };

        if number < 1 || number as u64 > self.num_pages() {
            return self.num_pages();
        }

        number as u64
    }

    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1) * self.per_page
    }

    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            count: self.count,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn next_page_number(&self) -> u64 {
        self.number + 1
    }

    pub fn previous_page_number(&self) -> u64 {
        self.number.saturating_sub(1)
    }

    /// 1-based index of the first item on this page, 0 when there is nothing.
    pub fn start_index(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }

        (self.number - 1) * self.per_page + 1
    }

    pub fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            return self.count;
        }

        self.number * self.per_page
    }

    pub fn page_range(&self) -> Vec<u64> {
        (1..=self.num_pages).collect()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}
