use log::trace;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::MonitorConfig,
    controls::Command,
    error::{MonitorError, Result},
    session::SessionId,
    telemetry::{ModelDescription, Snapshot},
};

/// The training process as seen by the monitor.
#[allow(unused)]
#[trait_variant::make(Endpoint: Send)]
pub trait LocalEndpoint {
    /// Fetches everything `session` has not read yet.
    ///
    /// # Arguments
    /// * `session` - The id whose read position is advanced.
    ///
    /// # Returns
    /// The decoded snapshot, or the classified failure.
    async fn snapshot(&self, session: SessionId) -> Result<Snapshot>;

    /// Fetches the static model description.
    async fn describe(&self) -> Result<ModelDescription>;

    /// Sends a control command, ignoring the response body.
    async fn command(&self, command: Command) -> Result<()>;
}

/// [`Endpoint`] over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    base_url: String,
}

impl HttpEndpoint {
    /// Creates a new `HttpEndpoint` for the configured host and port.
    ///
    /// # Errors
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        // The training process closes every connection after answering.
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(resp),
            status => Err(MonitorError::Protocol {
                path: path.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get(path).await?.bytes().await?;
        trace!("GET {path}: {} bytes", body.len());

        serde_json::from_slice(&body).map_err(|source| MonitorError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl Endpoint for HttpEndpoint {
    async fn snapshot(&self, session: SessionId) -> Result<Snapshot> {
        self.get_json(&session.path()).await
    }

    async fn describe(&self) -> Result<ModelDescription> {
        self.get_json("/describe").await
    }

    async fn command(&self, command: Command) -> Result<()> {
        self.get(command.path()).await.map(|_| ())
    }
}
