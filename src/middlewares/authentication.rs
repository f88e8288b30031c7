use crate::Error;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Request, Response,
};
use reqwest_middleware::{Middleware, Next};
use secrecy::{ExposeSecret, Secret};
use task_local_extensions::Extensions;

/// Reqwest middleware to inject the PayPlug secret key as a bearer token into outgoing HTTP requests.
pub struct AuthenticationMiddleware {
    secret_key: Secret<String>,
}

impl AuthenticationMiddleware {
    /// Fails if the secret key cannot be carried by an HTTP header.
    pub fn new(secret_key: Secret<String>) -> Result<Self, Error> {
        bearer_header(&secret_key)?;
        Ok(Self { secret_key })
    }
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let header_value = bearer_header(&self.secret_key)?;
        req.headers_mut().insert(AUTHORIZATION, header_value);

        // Run the rest of the middlewares
        next.run(req, extensions).await
    }
}

fn bearer_header(secret_key: &Secret<String>) -> Result<HeaderValue, Error> {
    let mut header_value =
        HeaderValue::from_str(&format!("Bearer {}", secret_key.expose_secret()))
            .map_err(|_| Error::technical("secret key contains invalid header characters"))?;
    // Keeps the key out of debug output
    header_value.set_sensitive(true);
    Ok(header_value)
}
