//! Rust client for the [PayPlug](https://www.payplug.com) payments API.
//!
//! Check out also the official PayPlug [API documentation](https://docs.payplug.com/api/apiref.html).
//!
//! # Usage
//!
//! ## Prerequisites
//!
//! Retrieve your secret key from the PayPlug portal. Test keys (`sk_test_...`) only create
//! test payments.
//!
//! ## Initialize and authenticate a new `PayPlugClient`
//!
//! ```rust,no_run
//! # use payplug_rust::{PayPlugClient, Error};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let client = PayPlugClient::builder("sk_test_my_secret_key")
//!     .with_success_return_url("https://my.shop/payments/success?tracker=")
//!     .with_cancel_return_url("https://my.shop/payments/cancel?tracker=")
//!     .with_notification_url("https://my.shop/payments/notifications?tracker=")
//!     .build()?;
//!
//! client.authenticate().await?;
//! # Ok(())
//! # }
//! ```
//!
//! By default, a `PayPlugClient` connects to `https://api.payplug.com/`.
//! Use [`with_base_url`](crate::client::PayPlugClientBuilder::with_base_url) to target another endpoint.
//!
//! ## Create a payment
//!
//! Each payment carries a tracker chosen by the caller. It is stored in the payment metadata and
//! appended to the return and notification urls, so that PayPlug callbacks can be matched
//! with your own orders.
//!
//! ```rust,no_run
//! # use payplug_rust::{PayPlugClient, Error, apis::payments::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let client: PayPlugClient = unreachable!();
//! #
//! let options = PaymentOptionsBuilder::default()
//!     .amount(1000u64)
//!     .currency("EUR")
//!     .customer(Customer {
//!         email: Some("some.one@email.com".to_string()),
//!         first_name: Some("Some".to_string()),
//!         last_name: Some("One".to_string()),
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut payment = Payment::new(&client, "order-42", options)?;
//! payment.send_create().await?;
//!
//! println!("Redirect the customer to: {}", payment.payment_url().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Abort pending payments
//!
//! ```rust,no_run
//! # use payplug_rust::{PayPlugClient, Error, apis::payments::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let client: PayPlugClient = unreachable!();
//! #
//! for mut payment in Payment::list(&client, None, None).await? {
//!     if !payment.is_failed() && !payment.is_paid() {
//!         payment.send_abort().await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns an [`Error`](crate::error::Error). `4xx` responses become
//! [`Error::Functional`](crate::error::Error::Functional), `5xx` responses become
//! [`Error::Technical`](crate::error::Error::Technical), both carrying the status code,
//! the status message and the attempted request.

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub mod client;
mod common;
pub mod error;
mod middlewares;

pub use apis::payments::Payment;
pub use client::{ClientOptions, PayPlugClient};
pub use common::DEFAULT_PAYPLUG_URL;
pub use error::Error;
