use serde::{Deserialize, Serialize};

/// The shop tenant a staff member is working in, selected by URL slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopSelection {
    pub shop_name: String,
    pub slug: String,
    pub shop_id: String,
}

impl ShopSelection {
    pub const DEFAULT_NAME: &'static str = "Wash Wise Intelligence";
    pub const DEFAULT_SLUG: &'static str = "wash-wise-intelligence";
    pub const DEFAULT_ID: &'static str = "LMSS-00000";

    pub fn is_default(&self) -> bool {
        self.shop_id == Self::DEFAULT_ID
    }

    /// Route prefix for pages scoped to this shop, e.g. `/wash-wise-intelligence/dashboard`.
    pub fn route(&self, page: &str) -> String {
        let page = page.trim_start_matches('/');
        if page.is_empty() {
            format!("/{}", self.slug)
        } else {
            format!("/{}/{}", self.slug, page)
        }
    }
}

impl Default for ShopSelection {
    fn default() -> Self {
        Self {
            shop_name: Self::DEFAULT_NAME.to_string(),
            slug: Self::DEFAULT_SLUG.to_string(),
            shop_id: Self::DEFAULT_ID.to_string(),
        }
    }
}
