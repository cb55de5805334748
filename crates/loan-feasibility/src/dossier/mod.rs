//! Evaluated dossiers: storage, the payment gate in front of them, and their HTTP routes.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    DossierRecord, DossierRepository, DossierView, PaymentError, PaymentGateway, PaymentIntent,
    PaymentStatus, RepositoryError,
};
pub use router::{dossier_router, ConfirmPaymentRequest, CreateIntentRequest};
pub use service::{DossierError, DossierService, DEFAULT_DOSSIER_PRICE_CENTS};
