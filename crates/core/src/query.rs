//! Section query engine.
//!
//! A [`SectionFilter`] is the single description of "which sections, in what
//! order, which page". Every dimension is optional and absent dimensions
//! impose no restriction; supplied dimensions are combined with AND.
//!
//! The in-memory evaluation lives here ([`SectionFilter::apply`]). The
//! `PostgreSQL` store renders the same filter to SQL and must agree with it.
//!
//! # Price buckets
//!
//! | Label        | Matches                                   |
//! |--------------|-------------------------------------------|
//! | `Free Only`  | `is_free`                                 |
//! | `Under $5`   | `!is_free && price <= 4.99`               |
//! | `$5 - $15`   | `!is_free && 5.00 <= price <= 15.00`      |
//! | `$15 - $25`  | `!is_free && 15.01 <= price <= 25.00`     |
//! | `Over $25`   | `!is_free && price >= 25.01`              |
//! | `All Prices` | everything                                |
//!
//! Unrecognized labels fail open: they select every price.

use rust_decimal::Decimal;

use crate::types::{CategoryFilter, Section};

/// Page size used when the request does not give a usable one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A named, mutually exclusive price range offered by the catalog UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceBucket {
    /// No price restriction.
    #[default]
    All,
    FreeOnly,
    Under5,
    From5To15,
    From15To25,
    Over25,
}

impl PriceBucket {
    /// Every bucket, in display order.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::FreeOnly,
        Self::Under5,
        Self::From5To15,
        Self::From15To25,
        Self::Over25,
    ];

    /// Parse a UI label, returning `None` if it is not recognized.
    ///
    /// Surrounding whitespace is ignored and en-dash ranges (`$5–$15`) are
    /// accepted alongside the spaced hyphen form (`$5 - $15`).
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" | "All Prices" | "all" => Some(Self::All),
            "Free Only" => Some(Self::FreeOnly),
            "Under $5" => Some(Self::Under5),
            "$5 - $15" | "$5–$15" | "$5 – $15" => Some(Self::From5To15),
            "$15 - $25" | "$15–$25" | "$15 – $25" => Some(Self::From15To25),
            "Over $25" => Some(Self::Over25),
            _ => None,
        }
    }

    /// Parse a UI label, failing open to [`PriceBucket::All`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::parse_label(label).unwrap_or(Self::All)
    }

    /// The canonical UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Prices",
            Self::FreeOnly => "Free Only",
            Self::Under5 => "Under $5",
            Self::From5To15 => "$5 - $15",
            Self::From15To25 => "$15 - $25",
            Self::Over25 => "Over $25",
        }
    }

    /// The `is_free` value a section must have, if the bucket constrains it.
    #[must_use]
    pub const fn required_is_free(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::FreeOnly => Some(true),
            Self::Under5 | Self::From5To15 | Self::From15To25 | Self::Over25 => Some(false),
        }
    }

    /// Inclusive `(min, max)` price bounds. Free sections never reach these.
    #[must_use]
    pub const fn price_bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            Self::All | Self::FreeOnly => (None, None),
            Self::Under5 => (None, Some(Decimal::from_parts(499, 0, 0, false, 2))),
            Self::From5To15 => (
                Some(Decimal::from_parts(500, 0, 0, false, 2)),
                Some(Decimal::from_parts(1500, 0, 0, false, 2)),
            ),
            Self::From15To25 => (
                Some(Decimal::from_parts(1501, 0, 0, false, 2)),
                Some(Decimal::from_parts(2500, 0, 0, false, 2)),
            ),
            Self::Over25 => (Some(Decimal::from_parts(2501, 0, 0, false, 2)), None),
        }
    }

    /// Whether a section falls into this bucket.
    #[must_use]
    pub fn contains(self, section: &Section) -> bool {
        if let Some(is_free) = self.required_is_free()
            && section.is_free != is_free
        {
            return false;
        }
        if section.is_free {
            return true;
        }
        let price = section.price.amount();
        let (min, max) = self.price_bounds();
        min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
    }
}

/// Price restriction applied by the query engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceFilter {
    /// Every price qualifies.
    #[default]
    Any,
    /// A UI bucket: free flag plus inclusive bounds.
    Bucket(PriceBucket),
    /// A direct free/paid flag. Price bounds are never consulted.
    IsFree(bool),
}

impl PriceFilter {
    /// Whether a section passes this filter.
    #[must_use]
    pub fn matches(self, section: &Section) -> bool {
        match self {
            Self::Any => true,
            Self::Bucket(bucket) => bucket.contains(section),
            Self::IsFree(is_free) => section.is_free == is_free,
        }
    }
}

/// A 1-based page request translated into offset/limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page request from raw query-string values.
    ///
    /// Unparseable values fall back to the defaults: page 1, and
    /// [`DEFAULT_PAGE_SIZE`] for a missing, unparseable, or zero limit.
    /// Limits above [`MAX_PAGE_SIZE`] are clamped.
    #[must_use]
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|&l| l >= 1)
            .map_or(DEFAULT_PAGE_SIZE, |l| l.min(MAX_PAGE_SIZE));
        Self { page, limit }
    }

    /// Number of matching sections skipped before this page.
    #[must_use]
    pub fn offset(self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

/// Which sections to return, and which slice of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionFilter {
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    pub category: CategoryFilter,
    pub price: PriceFilter,
    /// Maximum number of results; `None` returns every match.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SectionFilter {
    /// Restrict to sections whose name or description contains `term`.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restrict by category parameter (the sentinel means "any").
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = CategoryFilter::from_param(Some(category));
        self
    }

    /// Restrict by price.
    #[must_use]
    pub fn with_price(mut self, price: PriceFilter) -> Self {
        self.price = price;
        self
    }

    /// Apply a page request.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.limit = Some(page.limit as usize);
        self.offset = page.offset();
        self
    }

    /// Set raw offset/limit.
    #[must_use]
    pub fn with_window(mut self, offset: usize, limit: Option<usize>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// The search text, if one applies.
    ///
    /// Blank input is treated as absent. The text itself is used as given.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Whether a section satisfies every predicate (pagination aside).
    #[must_use]
    pub fn matches(&self, section: &Section) -> bool {
        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            if !section.name.to_lowercase().contains(&needle)
                && !section.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        self.category.matches(&section.category) && self.price.matches(section)
    }

    /// Evaluate the filter over sections given in insertion order.
    ///
    /// Results are ordered by `created_at` ascending; the sort is stable so
    /// ties keep insertion order. Then `[offset, offset + limit)` is taken.
    pub fn apply<'a, I>(&self, sections: I) -> Vec<Section>
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let mut matched: Vec<&Section> = sections.into_iter().filter(|s| self.matches(s)).collect();
        matched.sort_by_key(|s| s.created_at);

        matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
