//! The tidyDNS API client. Operations are grouped by resource in the
//! submodules; this module holds the request plumbing they share.
mod dhcp;
mod records;
mod users;
mod zones;

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{Conflict, Error, Result};
use crate::transport::{ApiRequest, ApiResponse, BasicAuth, Form, HttpTransport, Transport};
use crate::wire;

/// Stateless client; clones share the transport and connection parameters.
pub struct TidyDnsClient<T: Transport = HttpTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    cancel: Option<CancellationToken>,
}

impl<T: Transport> Clone for TidyDnsClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            cancel: self.cancel.clone(),
        }
    }
}

impl TidyDnsClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> TidyDnsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            cancel: None,
        }
    }

    /// A clone whose requests abort with [`Error::Cancelled`] once `token`
    /// is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest {
            method,
            url: self.config.endpoint(path),
            query: Vec::new(),
            form: None,
            auth: BasicAuth {
                username: self.config.username.clone(),
                password: self.config.password.clone(),
            },
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> ApiRequest {
        let mut req = self.request(Method::GET, path);
        req.query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        req
    }

    fn post(&self, path: &str, form: Form) -> ApiRequest {
        let mut req = self.request(Method::POST, path);
        req.form = Some(form);
        req
    }

    fn delete(&self, path: &str) -> ApiRequest {
        self.request(Method::DELETE, path)
    }

    /// One round trip, raced against the cancellation token.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "tidyDNS request");

        let res = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    res = self.transport.execute(request) => res,
                }
            }
            None => self.transport.execute(request).await,
        }?;

        trace!(status = %res.status, bytes = res.body.len(), "tidyDNS response");
        Ok(res)
    }

    /// Like [`send`](Self::send) but any status other than 200 is an error.
    async fn send_ok(&self, request: ApiRequest) -> Result<ApiResponse> {
        let res = self.send(request).await?;
        if !res.is_ok() {
            return Err(Error::UnexpectedStatus(res.status));
        }
        Ok(res)
    }

    /// Like [`send_ok`](Self::send_ok), but a rejection whose body names the
    /// duplicate key `needle` becomes `conflict` instead.
    async fn send_detecting_conflict(
        &self,
        request: ApiRequest,
        needle: &str,
        conflict: Conflict,
    ) -> Result<ApiResponse> {
        let res = self.send(request).await?;
        if res.is_ok() {
            return Ok(res);
        }
        if res.body.contains(needle) {
            debug!(status = %res.status, %conflict, "tidyDNS duplicate key");
            return Err(conflict.into());
        }
        Err(Error::UnexpectedStatus(res.status))
    }

    async fn get_json<D>(
        &self,
        what: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<D>
    where
        D: for<'de> Deserialize<'de>,
    {
        let res = self.send_ok(self.get(path, query)).await?;
        wire::decode(what, &res.body)
    }
}

/// Body text the service uses for unique-constraint violations.
fn duplicate_key_message(column: &str, value: &str) -> String {
    format!("Key ({column})=({value}) already exists")
}
