
use actix_web::{web, App, HttpServer};
use reqwest::Url;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tokio::sync::oneshot;

#[derive(Clone)]
struct MockServerConfiguration {
    secret_key: String,
}

/// In-memory storage for payments created on the mock server, oldest first.
type MockServerStorage = Arc<RwLock<Vec<Value>>>;

/// Simple mock server for PayPlug APIs used in local integration tests.
pub struct PayPlugMockServer {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
    storage: MockServerStorage,
}

impl PayPlugMockServer {
    pub async fn start(secret_key: &str) -> Self {
        let configuration = MockServerConfiguration {
            secret_key: secret_key.to_string(),
        };

        // Setup the in-memory storage
        let storage = MockServerStorage::default();
        let storage_clone = storage.clone();

        // Setup the mock HTTP server and bind it to a random port
        let http_server_factory = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(configuration.clone()))
                .app_data(web::Data::new(storage.clone()))
                .service(
                    web::resource("/v1/payments")
                        .route(web::get().to(routes::list_payments))
                        .route(web::post().to(routes::create_payment)),
                )
                .service(
                    web::resource("/v1/payments/{id}")
                        .route(web::get().to(routes::get_payment_by_id))
                        .route(web::patch().to(routes::update_payment)),
                )
        })
        .workers(1)
        .bind("127.0.0.1:0")
        .unwrap();

        // Retrieve the address and port the server was bound to
        let addr = http_server_factory.addrs().first().cloned().unwrap();

        // Prepare a oneshot channel to kill the HTTP server when this struct is dropped
        let (shutdown_sender, shutdown_recv) = oneshot::channel();

        // Start the server in another task
        let http_server = http_server_factory.run();
        tokio::spawn(async move {
            tokio::select! {
                _ = http_server => panic!("HTTP server crashed"),
                _ = shutdown_recv => { /* Intentional shutdown */ }
            }
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            shutdown: Some(shutdown_sender),
            storage: storage_clone,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Stores a raw record as if it had been created by someone else.
    pub fn insert_payment(&self, record: Value) {
        self.storage.write().unwrap().push(record);
    }
}

impl Drop for PayPlugMockServer {
    fn drop(&mut self) {
        // Send a shutdown signal to the actix server on drop
        let _ = self.shutdown.take().unwrap().send(());
    }
}
