//! Section categories.
//!
//! Categories are free text in storage. The catalog UI offers a fixed list
//! plus the [`ALL_CATEGORIES`] sentinel, which means "no restriction".

/// Sentinel category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Categories offered by the catalog UI, in display order.
pub const KNOWN_CATEGORIES: [&str; 9] = [
    "Hero Banners",
    "Product Features",
    "Testimonials",
    "FAQ Sections",
    "Image Galleries",
    "Newsletter Signup",
    "Countdown Timers",
    "Contact Forms",
    "Social Proof",
];

/// Category restriction applied by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category qualifies.
    #[default]
    Any,
    /// Only sections whose category equals this value (case-sensitive).
    Exact(String),
}

impl CategoryFilter {
    /// Build a filter from a request parameter.
    ///
    /// A missing or empty value, or the [`ALL_CATEGORIES`] sentinel, yields
    /// [`CategoryFilter::Any`]. Anything else is matched exactly as given.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None | Some("" | ALL_CATEGORIES) => Self::Any,
            Some(category) => Self::Exact(category.to_owned()),
        }
    }

    /// Whether a stored category passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(wanted) => wanted == category,
        }
    }
}

/// Whether `category` is one of the categories the UI offers.
#[must_use]
pub fn is_known_category(category: &str) -> bool {
    KNOWN_CATEGORIES.contains(&category)
}
