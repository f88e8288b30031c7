use anyhow::Context;
use payplug_rust::{
    apis::payments::{Customer, Payment, PaymentOptionsBuilder},
    ClientOptions, PayPlugClient,
};

#[derive(serde::Deserialize, Debug)]
struct Config {
    secret_key: String,
    #[serde(default)]
    client: ClientOptions,
}

impl Config {
    fn read() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("PAYPLUG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to assemble the required configuration")
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::read()?;

    // Setup and authenticate the PayPlug client
    let client = PayPlugClient::new(config.secret_key, config.client)?;
    client.authenticate().await?;

    // Create a new payment
    let tracker = format!("demo-{}", uuid::Uuid::new_v4());
    let mut payment = Payment::new(
        &client,
        &tracker,
        PaymentOptionsBuilder::default()
            .amount(1000u64)
            .currency("EUR")
            .customer(Customer {
                email: Some("some.one@email.com".to_string()),
                first_name: Some("Some".to_string()),
                last_name: Some("One".to_string()),
            })
            .build()?,
    )?;
    payment.send_create().await?;

    tracing::info!(
        "Created new payment {}: {}",
        payment.id().unwrap_or_default(),
        payment
    );
    tracing::info!(
        "Hosted payment page: {}",
        payment.payment_url().unwrap_or_default()
    );

    // Find it back among the listed payments
    let listed = Payment::list(&client, Some(10), None).await?;
    let found = listed
        .into_iter()
        .find(|p| p.tracker() == Some(tracker.as_str()))
        .context("Cannot find the new payment in the list")?;
    tracing::info!("Listed payment: {}", found);

    // Abort it
    payment.send_abort().await?;
    tracing::info!(
        "Payment aborted: {} ({})",
        payment.is_aborted(),
        payment.failure_message().unwrap_or_default()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
