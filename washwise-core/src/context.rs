use serde::{Deserialize, Serialize};
use washwise_shared::{Masked, ShopSelection};

use crate::repository::ShopDirectory;

/// The signed-in staff member as returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffProfile {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
}

/// Credentials of the current login.
///
/// Serializable so a front end can persist it between reloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    staff: Option<StaffProfile>,
    token: Option<Masked<String>>,
    api_key: Option<Masked<String>>,
}

impl Session {
    /// Store a fresh login. A leading `Bearer ` on the token is dropped.
    pub fn login(&mut self, staff: StaffProfile, token: &str, api_key: Option<String>) {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        tracing::info!(staff_id = %staff.id, "staff signed in");
        self.staff = Some(staff);
        self.token = Some(Masked::new(token.to_string()));
        self.api_key = api_key.map(Masked::new);
    }

    pub fn logout(&mut self) {
        if let Some(staff) = &self.staff {
            tracing::info!(staff_id = %staff.id, "staff signed out");
        }
        *self = Session::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.staff.is_some() && self.token.is_some()
    }

    pub fn staff(&self) -> Option<&StaffProfile> {
        self.staff.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose().as_str())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose().as_str())
    }
}

/// Per-application state shared by every screen: which shop is selected and who is signed in.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    shop: ShopSelection,
    session: Session,
}

impl AppContext {
    pub fn new(shop: ShopSelection, session: Session) -> Self {
        Self { shop, session }
    }

    pub fn shop(&self) -> &ShopSelection {
        &self.shop
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn select_shop(&mut self, shop: ShopSelection) {
        tracing::debug!(slug = %shop.slug, shop_id = %shop.shop_id, "shop selected");
        self.shop = shop;
    }

    /// Resolve a URL slug to a shop. Missing slugs, unknown slugs and lookup
    /// failures all fall back to the default shop.
    pub async fn resolve_shop(&mut self, slug: Option<&str>, directory: &dyn ShopDirectory) -> &ShopSelection {
        let slug = slug.map(str::trim).filter(|s| !s.is_empty());

        let shop = match slug {
            None => ShopSelection::default(),
            Some(slug) => match directory.find_by_slug(slug).await {
                Ok(Some(shop)) => shop,
                Ok(None) => {
                    tracing::warn!(slug, "unknown shop slug, using default shop");
                    ShopSelection::default()
                }
                Err(e) => {
                    tracing::warn!(slug, error = %e, "shop lookup failed, using default shop");
                    ShopSelection::default()
                }
            },
        };

        self.select_shop(shop);
        &self.shop
    }

    /// Session expiry wipes credentials and the shop choice.
    pub fn expire_session(&mut self) {
        tracing::warn!("session expired");
        self.session.logout();
        self.shop = ShopSelection::default();
    }

    pub fn route(&self, page: &str) -> String {
        self.shop.route(page)
    }
}
