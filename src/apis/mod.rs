//! Clients for the various PayPlug APIs.

use crate::client::ClientOptions;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::{
    fmt::{Debug, Formatter},
    sync::atomic::AtomicBool,
};

pub mod payments;

pub(crate) struct PayPlugClientInner {
    pub(crate) client: ClientWithMiddleware,
    pub(crate) base_url: Url,
    pub(crate) options: ClientOptions,
    pub(crate) authenticated: AtomicBool,
}

impl Debug for PayPlugClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPlugClientInner")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}
