//! APIs and models related to payments.

mod api;
mod model;

pub use api::Payment;
pub use model::*;
