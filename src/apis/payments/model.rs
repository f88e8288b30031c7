use crate::apis::payments::Payment;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment fields sent to PayPlug when creating a new [`Payment`](crate::apis::payments::Payment).
///
/// Only the most common fields are typed. Anything else can be passed through `extra`,
/// whose entries are flattened into the request body as is.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Builder)]
#[builder(derive(Debug))]
pub struct PaymentOptions {
    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub amount: Option<u64>,
    /// ISO 4217 code, e.g. `EUR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub save_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub force_3ds: Option<bool>,
    /// Replaces the return urls computed from the client options.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub hosted_payment: Option<HostedPayment>,
    /// Replaces the notification url computed from the client options.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub notification_url: Option<String>,
    /// Free metadata. The payment tracker is always added under `paymentTracker`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HostedPayment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    /// Set by PayPlug once the payment is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// One page of payments, as returned by [`Payment::list_page`](crate::apis::payments::Payment::list_page).
#[derive(Debug, Clone)]
pub struct PaymentPage {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub has_more: bool,
    /// Payments carrying a tracker, in the order returned by PayPlug.
    pub payments: Vec<Payment>,
}

/// Body of `GET /v1/payments`.
#[derive(Deserialize, Debug)]
pub(crate) struct ListPaymentsResponse {
    #[serde(default)]
    pub(crate) page: Option<u64>,
    #[serde(default)]
    pub(crate) per_page: Option<u64>,
    #[serde(default)]
    pub(crate) has_more: bool,
    #[serde(default)]
    pub(crate) data: Vec<Value>,
}
