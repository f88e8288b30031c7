use crate::{
    apis::payments::{ListPaymentsResponse, PaymentOptions, PaymentPage},
    client::PayPlugClient,
    common::{METADATA_KEY, PAYMENTS_PATH, PAYMENT_TRACKER_KEY},
    Error,
};
use serde_json::{json, Map, Value};
use std::fmt;
use urlencoding::encode;

/// A payment exchanged with PayPlug.
///
/// A `Payment` wraps the raw JSON record sent to and received from the PayPlug API.
/// Every successful call merges the fresh copy returned by PayPlug into the local record,
/// top-level keys of the response winning.
///
/// The payment tracker is the correlation key between local payments and PayPlug records:
/// it is stored in the record metadata under `paymentTracker` and records without one are
/// never turned into a `Payment`.
#[derive(Debug, Clone)]
pub struct Payment {
    client: PayPlugClient,
    record: Map<String, Value>,
}

impl Payment {
    /// Failure code reported by PayPlug for payments aborted with [`send_abort`](Payment::send_abort).
    pub const ABORT_STATUS: &'static str = "aborted";

    /// Prepares a new payment, to be sent with [`send_create`](Payment::send_create).
    ///
    /// The record starts with the return and notification urls built from the client options
    /// and the tracker, then `options` are applied on top of them.
    ///
    /// Fails with a functional error if the client is not authenticated, and with a technical
    /// error if the tracker is empty.
    pub fn new(
        client: &PayPlugClient,
        tracker: &str,
        options: PaymentOptions,
    ) -> Result<Self, Error> {
        ensure_authenticated(client)?;
        if tracker.is_empty() {
            tracing::error!("Cannot create a Payment without payment tracker");
            return Err(Error::technical(
                "You must provide a payment tracker to create a Payment.",
            ));
        }

        let client_options = client.options();
        let mut record = into_record(json!({
            "hosted_payment": {
                "return_url": format!("{}{}", client_options.success_return_url, tracker),
                "cancel_url": format!("{}{}", client_options.cancel_return_url, tracker),
            },
            "notification_url": format!("{}{}", client_options.notification_url, tracker),
        }))?;
        merge(&mut record, into_record(serde_json::to_value(options)?)?);

        let payment = Self::with_tracker(client, tracker, record);
        tracing::trace!("Payment is {:?}", payment.record);
        Ok(payment)
    }

    /// Rebuilds a payment from a record returned by PayPlug.
    ///
    /// The record is kept as is: no default is applied. Fails with a technical error if the
    /// record has no payment tracker in its metadata.
    pub fn from_gateway_payment(client: &PayPlugClient, raw: Value) -> Result<Self, Error> {
        let tracker = tracker_of(&raw).map(str::to_string);

        let (tracker, record) = match (tracker, raw) {
            (Some(tracker), Value::Object(record)) => (tracker, record),
            (_, raw) => {
                tracing::error!(
                    "Cannot create a Payment from a PayPlug payment without payment tracker: {}",
                    raw
                );
                return Err(Error::technical(
                    "cannot create Payment from PayPlug payment without paymentTracker",
                ));
            }
        };

        ensure_authenticated(client)?;
        tracing::debug!(
            "Payment rebuilt from its PayPlug copy, id={:?}, tracker={}",
            record.get("id"),
            tracker
        );

        Ok(Self::with_tracker(client, &tracker, record))
    }

    /// Lists the payments known by PayPlug.
    ///
    /// If either `per_page` or `page` is set, the page is requested explicitly, `page` defaulting
    /// to `0` and `per_page` to `100`. Records without a payment tracker are skipped.
    pub async fn list(
        client: &PayPlugClient,
        per_page: Option<u32>,
        page: Option<u32>,
    ) -> Result<Vec<Payment>, Error> {
        Ok(Self::list_page(client, per_page, page).await?.payments)
    }

    /// Same as [`list`](Payment::list), also returning the paging information reported by PayPlug.
    #[tracing::instrument(name = "List Payments", skip(client))]
    pub async fn list_page(
        client: &PayPlugClient,
        per_page: Option<u32>,
        page: Option<u32>,
    ) -> Result<PaymentPage, Error> {
        let path = match (per_page, page) {
            (None, None) => PAYMENTS_PATH.to_string(),
            _ => format!(
                "{}?page={}&per_page={}",
                PAYMENTS_PATH,
                page.unwrap_or(0),
                per_page.unwrap_or(100)
            ),
        };

        let res: ListPaymentsResponse = serde_json::from_value(client.get(&path).await?)?;
        tracing::debug!("Payments successfully listed, {} received", res.data.len());

        let payments = res
            .data
            .into_iter()
            .filter(|raw| tracker_of(raw).is_some())
            .map(|raw| Self::from_gateway_payment(client, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaymentPage {
            page: res.page,
            per_page: res.per_page,
            has_more: res.has_more,
            payments,
        })
    }

    /// Fetches one payment by its PayPlug id.
    ///
    /// Empty, `.` and `..` ids are rejected with a technical error before any request is sent.
    #[tracing::instrument(name = "Retrieve Payment", skip(client))]
    pub async fn retrieve(client: &PayPlugClient, id: &str) -> Result<Payment, Error> {
        let path = payment_path(id)
            .ok_or_else(|| Error::technical(format!("Invalid payment id \"{}\"", id)))?;

        let res = client.get(&path).await?;
        tracing::debug!("Payment {} successfully retrieved", id);

        Self::from_gateway_payment(client, res)
    }

    /// Creates the payment on PayPlug.
    ///
    /// On success the id and the hosted payment url become available. On failure the local
    /// record is left untouched.
    #[tracing::instrument(
        name = "Create Payment",
        skip(self),
        fields(tracker = self.tracker().unwrap_or_default())
    )]
    pub async fn send_create(&mut self) -> Result<&mut Self, Error> {
        tracing::info!("Sending payment {}", self);

        let res = self.client.post(PAYMENTS_PATH, &self.record).await?;
        tracing::debug!("Payment successfully created: {}", res);

        merge(&mut self.record, into_record(res)?);
        Ok(self)
    }

    /// Aborts the payment on PayPlug.
    ///
    /// PayPlug reports the abort through the failure sub-record, whose code becomes
    /// [`ABORT_STATUS`](Payment::ABORT_STATUS). The payment must have an id, i.e. it must have
    /// been created or fetched first: otherwise a technical error is returned and nothing is sent.
    #[tracing::instrument(
        name = "Abort Payment",
        skip(self),
        fields(id = self.id().unwrap_or_default())
    )]
    pub async fn send_abort(&mut self) -> Result<&mut Self, Error> {
        tracing::info!("Aborting payment {}", self);

        let path = self.id().and_then(payment_path).ok_or_else(|| {
            Error::technical("Cannot abort a payment which has not been created")
        })?;

        let res = self.client.patch(&path, &json!({ "abort": true })).await?;
        tracing::debug!("Payment successfully aborted: {}", res);

        merge(&mut self.record, into_record(res)?);
        Ok(self)
    }

    /// PayPlug id, once created.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").and_then(Value::as_str)
    }

    /// Url of the PayPlug hosted payment page the customer must be redirected to, once created.
    pub fn payment_url(&self) -> Option<&str> {
        self.record
            .get("hosted_payment")
            .and_then(|hosted_payment| hosted_payment.get("payment_url"))
            .and_then(Value::as_str)
    }

    /// Payment tracker stored in the record metadata.
    pub fn tracker(&self) -> Option<&str> {
        self.record
            .get(METADATA_KEY)
            .and_then(|metadata| metadata.get(PAYMENT_TRACKER_KEY))
            .and_then(Value::as_str)
    }

    /// Amount in cents.
    pub fn amount(&self) -> Option<u64> {
        self.record.get("amount").and_then(Value::as_u64)
    }

    /// ISO 4217 currency code.
    pub fn currency(&self) -> Option<&str> {
        self.record.get("currency").and_then(Value::as_str)
    }

    /// Failure sub-record, set by PayPlug when the payment failed or was aborted.
    pub fn failure(&self) -> Option<&Map<String, Value>> {
        self.record.get("failure").and_then(Value::as_object)
    }

    /// Code of the failure, e.g. [`ABORT_STATUS`](Payment::ABORT_STATUS).
    pub fn failure_code(&self) -> Option<&str> {
        self.failure()
            .and_then(|failure| failure.get("code"))
            .and_then(Value::as_str)
    }

    /// Human readable failure reason.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure()
            .and_then(|failure| failure.get("message"))
            .and_then(Value::as_str)
    }

    pub fn is_failed(&self) -> bool {
        self.record.get("failure").map_or(false, |failure| match failure {
            Value::Object(failure) => !failure.is_empty(),
            Value::Array(failure) => !failure.is_empty(),
            Value::String(failure) => !failure.is_empty(),
            Value::Null | Value::Bool(_) | Value::Number(_) => false,
        })
    }

    /// Whether the failure was caused by [`send_abort`](Payment::send_abort).
    pub fn is_aborted(&self) -> bool {
        self.failure_code() == Some(Self::ABORT_STATUS)
    }

    /// `true` only if PayPlug explicitly reported the payment as paid.
    pub fn is_paid(&self) -> bool {
        self.record.get("is_paid") == Some(&Value::Bool(true))
    }

    /// `true` only if PayPlug explicitly reported the payment as refunded.
    pub fn is_refunded(&self) -> bool {
        self.record.get("is_refunded") == Some(&Value::Bool(true))
    }

    /// The raw record, as last exchanged with PayPlug.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Mutable access to the raw record, sent as is by [`send_create`](Payment::send_create).
    pub fn record_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.record
    }

    /// Consumes the payment, returning its raw record.
    pub fn into_record(self) -> Map<String, Value> {
        self.record
    }

    fn with_tracker(client: &PayPlugClient, tracker: &str, mut record: Map<String, Value>) -> Self {
        let metadata = record
            .entry(METADATA_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        if let Value::Object(metadata) = metadata {
            metadata.insert(
                PAYMENT_TRACKER_KEY.to_string(),
                Value::String(tracker.to_string()),
            );
        }

        Self {
            client: client.clone(),
            record,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{tracker: {}, amount: {}, currency: {}}}",
            self.tracker().unwrap_or("none"),
            self.amount()
                .map_or_else(|| "none".to_string(), |amount| amount.to_string()),
            self.currency().unwrap_or("none")
        )
    }
}

fn ensure_authenticated(client: &PayPlugClient) -> Result<(), Error> {
    if !client.is_authenticated() {
        tracing::error!("Cannot create a Payment without an authenticated PayPlugClient");
        return Err(Error::functional(
            "The API must be authenticated to create a Payment.",
        ));
    }

    Ok(())
}

/// Path of a single payment. Ids which would not address a payment once the url is resolved,
/// i.e. empty ids and the `.` and `..` segments, are rejected.
fn payment_path(id: &str) -> Option<String> {
    match id {
        "" | "." | ".." => None,
        id => Some(format!("{}/{}", PAYMENTS_PATH, encode(id))),
    }
}

/// Non-empty payment tracker stored in the metadata of a raw PayPlug record.
fn tracker_of(raw: &Value) -> Option<&str> {
    raw.get(METADATA_KEY)
        .and_then(|metadata| metadata.get(PAYMENT_TRACKER_KEY))
        .and_then(Value::as_str)
        .filter(|tracker| !tracker.is_empty())
}

fn into_record(value: Value) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(Error::technical(format!(
            "Unexpected payment payload: {}",
            other
        ))),
    }
}

/// Shallow merge, `source` keys win.
fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        target.insert(key, value);
    }
}
