use std::sync::Arc;

use serde::Serialize;
use tracing::info;

/// Tag written when a vehicle is reserved.
pub const PRIMARY_RESERVED_TAG: &str = "Reserved";

/// Every tag that marks a vehicle as reserved, including the Thai storefront label.
pub const RESERVED_TAGS: [&str; 2] = [PRIMARY_RESERVED_TAG, "จองแล้ว"];

/// Result of flipping a product's reservation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationChange {
    pub reserved: bool,
    pub tags: Vec<String>,
}

/// Removes every reserved marker when one is present, otherwise appends the primary marker.
pub fn toggle_reserved(tags: &[String]) -> ReservationChange {
    let is_reserved = tags.iter().any(|tag| is_reserved_tag(tag));
    if is_reserved {
        ReservationChange {
            reserved: false,
            tags: tags
                .iter()
                .filter(|tag| !is_reserved_tag(tag))
                .cloned()
                .collect(),
        }
    } else {
        let mut tags = tags.to_vec();
        tags.push(PRIMARY_RESERVED_TAG.to_string());
        ReservationChange {
            reserved: true,
            tags,
        }
    }
}

fn is_reserved_tag(tag: &str) -> bool {
    RESERVED_TAGS.contains(&tag)
}

/// Product catalog holding the tag list of each vehicle.
pub trait CatalogGateway: Send + Sync {
    fn product_tags(&self, product_id: &str) -> Result<Vec<String>, CatalogError>;
    fn update_product_tags(&self, product_id: &str, tags: &[String]) -> Result<(), CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(String),
    #[error("catalog rejected the update: {0}")]
    Rejected(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Shared-secret login for the office tools.
#[derive(Clone, PartialEq, Eq)]
pub struct OfficeCredentials {
    pub username: String,
    pub password: String,
}

impl OfficeCredentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        constant_time_eq(self.username.as_bytes(), username.as_bytes())
            & constant_time_eq(self.password.as_bytes(), password.as_bytes())
    }
}

impl std::fmt::Debug for OfficeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficeCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Toggles reservation tags through the catalog gateway.
pub struct ReservationService<C> {
    catalog: Arc<C>,
    credentials: OfficeCredentials,
}

impl<C> ReservationService<C>
where
    C: CatalogGateway + 'static,
{
    pub fn new(catalog: Arc<C>, credentials: OfficeCredentials) -> Self {
        Self {
            catalog,
            credentials,
        }
    }

    pub fn authorize(&self, username: &str, password: &str) -> bool {
        self.credentials.verify(username, password)
    }

    pub fn toggle(&self, product_id: &str) -> Result<ReservationChange, ReservationServiceError> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            return Err(ReservationServiceError::MissingProductId);
        }

        let current = self.catalog.product_tags(product_id)?;
        let change = toggle_reserved(&current);
        self.catalog.update_product_tags(product_id, &change.tags)?;

        info!(product_id, reserved = change.reserved, "reservation toggled");
        Ok(change)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationServiceError {
    #[error("missing product id")]
    MissingProductId,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
