// Listing query engine: turns untrusted query-string parameters into a
// typed filter + sort + pagination plan that the store can execute.

use serde::Deserialize;
use std::cmp::Ordering;

use crate::models::Listing;

pub const DEFAULT_PAGE_SIZE: u32 = 9;
// Upper bound on a single page; the public endpoint would otherwise accept
// arbitrarily large pages.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query parameters exactly as they arrive on GET /api/cars.
///
/// Every field is an optional string: malformed values must be silently
/// defaulted, never rejected, so no parsing happens at extraction time.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawListingQuery {
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub body_type: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Sort orders the storefront exposes. Unrecognized or absent values fall
/// back to `Newest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Oldest,
    PriceLowHigh,
    PriceHighLow,
}

impl SortKey {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("oldest") => SortKey::Oldest,
            Some("priceLowHigh") => SortKey::PriceLowHigh,
            Some("priceHighLow") => SortKey::PriceHighLow,
            _ => SortKey::Newest,
        }
    }

    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::PriceLowHigh => a.price.cmp(&b.price),
            SortKey::PriceHighLow => b.price.cmp(&a.price),
        }
    }
}

/// Conjunction of optional clauses; an empty filter matches every listing.
#[derive(Debug, Default, Clone)]
pub struct ListingFilter {
    /// Lowercased whole brand names; a listing matches when its brand equals
    /// any of these case-insensitively.
    pub brands: Vec<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Lowercased needle matched as a substring of name OR brand.
    pub search: Option<String>,
    /// Exact, case-sensitive body-type value as stored. An unknown value
    /// simply matches nothing.
    pub body_type: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.brands.is_empty() {
            let brand = listing.brand.to_lowercase();
            if !self.brands.iter().any(|b| *b == brand) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if listing.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let in_name = listing.name.to_lowercase().contains(needle.as_str());
            let in_brand = listing.brand.to_lowercase().contains(needle.as_str());
            if !in_name && !in_brand {
                return false;
            }
        }
        if let Some(body_type) = &self.body_type {
            match &listing.body_type {
                Some(stored) if stored.as_str() == body_type => {}
                _ => return false,
            }
        }
        true
    }
}

/// One request's worth of validated query state.
#[derive(Debug)]
pub struct QueryPlan {
    pub filter: ListingFilter,
    pub sort: SortKey,
    /// 1-based page number, always >= 1.
    pub page: u32,
    /// Page size, always in 1..=MAX_PAGE_SIZE.
    pub limit: u32,
}

impl QueryPlan {
    /// Normalize raw parameters into a plan. Malformed numeric strings and
    /// out-of-range values fall back to defaults rather than erroring.
    pub fn from_raw(raw: RawListingQuery) -> Self {
        let page = parse_u32(raw.page.as_deref())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let limit = parse_u32(raw.limit.as_deref())
            .filter(|l| *l >= 1)
            .map(|l| l.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let brands = raw
            .brand
            .as_deref()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default();

        let search = raw
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let filter = ListingFilter {
            brands,
            min_price: parse_u64(raw.min_price.as_deref()),
            max_price: parse_u64(raw.max_price.as_deref()),
            search,
            body_type: raw.body_type.filter(|b| !b.is_empty()),
        };

        QueryPlan {
            filter,
            sort: SortKey::from_param(raw.sort.as_deref()),
            page,
            limit,
        }
    }

    /// Number of matching listings skipped before the returned page.
    pub fn skip(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// `ceil(total / limit)`; zero when nothing matches.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }
}

fn parse_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_u64(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}
