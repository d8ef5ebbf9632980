//! Core value types: sites, extension payloads and resource states.

pub mod site;
pub mod extension;
pub mod state;

pub use site::Site;
pub use extension::{DeliveryIndex, ExtensionData, N_DELIVERIES};
pub use state::{DeliverySet, State, extend, is_dominate};
