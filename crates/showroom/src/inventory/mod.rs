//! Reservation tagging for catalog vehicles, gated by the office credentials.

pub mod reservation;
pub mod router;

pub use reservation::{
    toggle_reserved, CatalogError, CatalogGateway, OfficeCredentials, ReservationChange,
    ReservationService, ReservationServiceError, PRIMARY_RESERVED_TAG, RESERVED_TAGS,
};
pub use router::office_router;
