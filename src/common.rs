// Default URLs
pub static DEFAULT_PAYPLUG_URL: &str = "https://api.payplug.com/";
pub static DEFAULT_SUCCESS_RETURN_URL: &str = "https://example.net/success?tracker=";
pub static DEFAULT_CANCEL_RETURN_URL: &str = "https://example.net/cancel?tracker=";
pub static DEFAULT_NOTIFICATION_URL: &str = "https://example.net/notifications?tracker=";

// API paths
pub static PAYMENTS_PATH: &str = "/v1/payments";
pub static AUTHENTICATION_PROBE_PATH: &str = "/v1/payments?page=1&per_page=0";

// Header values
pub static JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// Record keys
pub static METADATA_KEY: &str = "metadata";
pub static PAYMENT_TRACKER_KEY: &str = "paymentTracker";
