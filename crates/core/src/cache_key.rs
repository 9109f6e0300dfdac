//! Cache key namespaces and their invalidation dependencies.
//!
//! Every cached read belongs to one namespace. Namespaces form a small,
//! statically declared graph: when entries in a namespace become stale, so do
//! entries in every namespace reachable through [`CacheNamespace::dependents`].
//!
//! ```text
//! reviews ──▶ product_details ──▶ products_list ──▶ product_categories
//! ```

use std::fmt;

const PRODUCTS_LIST: &str = "products_list";
const PRODUCT_DETAILS: &str = "product_details_";
const PRODUCT_CATEGORIES: &str = "product_categories";
const REVIEWS: &str = "reviews_";

/// Logical group of cache entries invalidated together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Approved reviews of one product.
    Reviews,
    /// Detail view of one product, embedding its aggregate rating.
    ProductDetails,
    /// Product listings, unfiltered and per category.
    ProductList,
    /// Distinct category names, derived from the product listing.
    ProductCategories,
}

impl CacheNamespace {
    /// Namespaces that embed data from this one and must be invalidated after it.
    pub fn dependents(&self) -> &'static [CacheNamespace] {
        match self {
            Self::Reviews => &[Self::ProductDetails],
            Self::ProductDetails => &[Self::ProductList],
            Self::ProductList => &[Self::ProductCategories],
            Self::ProductCategories => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reviews => "reviews",
            Self::ProductDetails => "product_details",
            Self::ProductList => "products_list",
            Self::ProductCategories => "product_categories",
        }
    }

    /// Walk the dependency graph from `self`, returning each reachable
    /// namespace once, parents before children.
    pub fn cascade(&self) -> Vec<CacheNamespace> {
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::from([*self]);
        while let Some(ns) = queue.pop_front() {
            if order.contains(&ns) {
                continue;
            }
            order.push(ns);
            queue.extend(ns.dependents().iter().copied());
        }
        order
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: CacheNamespace,
    key: String,
}

impl CacheKey {
    /// Unfiltered product listing.
    pub fn products_list() -> Self {
        Self {
            namespace: CacheNamespace::ProductList,
            key: PRODUCTS_LIST.to_string(),
        }
    }

    /// Product listing filtered by category.
    pub fn products_list_for_category(category: &str) -> Self {
        Self {
            namespace: CacheNamespace::ProductList,
            key: format!("{PRODUCTS_LIST}_{category}"),
        }
    }

    pub fn product_details(product_id: i64) -> Self {
        Self {
            namespace: CacheNamespace::ProductDetails,
            key: format!("{PRODUCT_DETAILS}{product_id}"),
        }
    }

    pub fn product_categories() -> Self {
        Self {
            namespace: CacheNamespace::ProductCategories,
            key: PRODUCT_CATEGORIES.to_string(),
        }
    }

    pub fn reviews(product_id: i64) -> Self {
        Self {
            namespace: CacheNamespace::Reviews,
            key: format!("{REVIEWS}{product_id}"),
        }
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Key selection for one namespace during invalidation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyMatch {
    /// Exactly one key.
    Exact(String),
    /// Every live key starting with this prefix.
    Prefix(&'static str),
}

impl KeyMatch {
    /// Select the keys of `namespace` affected by a change to `product_id`.
    ///
    /// Listing namespaces are invalidated wholesale regardless of product.
    pub fn for_namespace(namespace: CacheNamespace, product_id: Option<i64>) -> Option<Self> {
        match (namespace, product_id) {
            (CacheNamespace::Reviews, Some(id)) => Some(Self::Exact(CacheKey::reviews(id).key)),
            (CacheNamespace::ProductDetails, Some(id)) => {
                Some(Self::Exact(CacheKey::product_details(id).key))
            }
            (CacheNamespace::Reviews | CacheNamespace::ProductDetails, None) => None,
            (CacheNamespace::ProductList, _) => Some(Self::Prefix(PRODUCTS_LIST)),
            (CacheNamespace::ProductCategories, _) => {
                Some(Self::Exact(PRODUCT_CATEGORIES.to_string()))
            }
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(k) => k == key,
            Self::Prefix(p) => key.starts_with(p),
        }
    }
}
