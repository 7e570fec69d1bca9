use std::ops::Range;

use crate::util;

/// Number of pages needed for `total` videos, zero for an empty collection.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Index range shown on the one-based `page`.
///
/// Pages past the end yield an empty range instead of failing.
pub fn page_range(page: usize, page_size: usize, total: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Current page of the wall. Always at least 1, never clamped from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl PageState {
    pub fn new(current: usize) -> Self {
        Self {
            current: current.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Steps back one page. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Steps forward one page while there is one. Returns whether the page changed.
    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current < total_pages {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

/// The camera selector: a free-form value plus the sizes it offers.
///
/// The raw value is kept as entered so that garbage survives until render,
/// where it is resolved to a usable page size.
#[derive(Debug, Clone)]
pub struct PageSizeControl {
    value: String,
    options: Vec<usize>,
}

impl PageSizeControl {
    pub fn new(default: usize, options: impl IntoIterator<Item = usize>) -> Self {
        let mut options: Vec<usize> = options.into_iter().filter(|size| *size > 0).collect();
        options.sort_unstable();
        options.dedup();

        Self {
            value: default.to_string(),
            options,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// The control value as an integer, if it parses as one.
    pub fn raw(&self) -> Option<i64> {
        util::parse_int(&self.value)
    }

    /// Effective page size; zero, negative and unparsable values count as 1.
    pub fn page_size(&self) -> usize {
        self.raw()
            .and_then(|raw| usize::try_from(raw).ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Selects the next larger option. Returns whether the value changed.
    pub fn select_next(&mut self) -> bool {
        let current = self.raw();
        let next = self
            .options
            .iter()
            .copied()
            .find(|option| current.map_or(true, |current| (*option as i64) > current));

        self.select(next)
    }

    /// Selects the next smaller option. Returns whether the value changed.
    pub fn select_previous(&mut self) -> bool {
        let current = self.raw();
        let previous = self
            .options
            .iter()
            .rev()
            .copied()
            .find(|option| current.map_or(true, |current| (*option as i64) < current));

        self.select(previous)
    }

    fn select(&mut self, option: Option<usize>) -> bool {
        match option {
            Some(option) => {
                self.value = option.to_string();
                true
            }
            None => false,
        }
    }
}
