//! Application workflows.
//!
//! Each workflow composes store traits with the pure domain rules and owns
//! the accept/reject decision for one use case. Outcomes are typed `Result`s;
//! nothing here panics or performs IO except through the injected stores.

pub mod admin;
pub mod invite_gate;
pub mod login;
pub mod orders;
pub mod reconciler;
pub mod registration;

pub use admin::{AdminError, CatalogAdmin, InviteAdmin, NewProductRequest, UserAdmin};
pub use invite_gate::InviteGate;
pub use login::{LoginError, LoginService};
pub use orders::{OrderError, OrderWorkflow};
pub use reconciler::{ReserveError, StockReconciler};
pub use registration::{RegistrationError, RegistrationRequest, RegistrationService};

use supplier_catalog::Shortfall;

pub(crate) fn describe_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
