use payplug_rust::{PayPlugClient, DEFAULT_PAYPLUG_URL};
use reqwest::Url;

pub struct TestContext {
    pub client: PayPlugClient,
    gateway_url: Url,
}

impl TestContext {
    pub async fn start() -> Self {
        // Take the required credentials from the env. Use a test key!
        let secret_key = std::env::var("ACCEPTANCE_TESTS_SECRET_KEY").unwrap();
        let base_url = std::env::var("ACCEPTANCE_TESTS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PAYPLUG_URL.to_string());

        // Configure a new PayPlugClient to point to PayPlug
        let client = PayPlugClient::builder(secret_key)
            .with_base_url(base_url)
            .with_success_return_url("https://example.net/payplug/test/success?tracker=")
            .with_cancel_return_url("https://example.net/payplug/test/cancel?tracker=")
            .with_notification_url("https://example.net/payplug/test/notifications?tracker=")
            .build()
            .unwrap();
        client.authenticate().await.unwrap();

        Self {
            gateway_url: client.gateway_url().clone(),
            client,
        }
    }

    pub fn gateway_url(&self) -> &Url {
        &self.gateway_url
    }
}
