use std::error::Error as StdError;
use std::io::{Error, ErrorKind, Read, Result};
use std::sync::Arc;
use std::time::Duration;

use oxhttp::model::Request;
use oxhttp::model::header::ACCEPT;

/// Blocking HTTP client shared by the registry and the remote context loader.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<oxhttp::Client>,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Result<Self> {
        let mut client = oxhttp::Client::new()
            .with_redirection_limit(redirection_limit)
            .with_user_agent(concat!("trustshacl/", env!("CARGO_PKG_VERSION")))
            .map_err(invalid_input_error)?;
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// GETs `url` and returns the response body.
    ///
    /// Non-2xx answers are errors carrying the status and the response payload.
    pub fn get(&self, url: &str, accept: &'static str) -> Result<Vec<u8>> {
        let request = Request::builder()
            .uri(url)
            .header(ACCEPT, accept)
            .body(())
            .map_err(invalid_input_error)?;
        let response = self.client.request(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::other(format!(
                "Error {} returned by {} with payload:\n{}",
                status,
                url,
                response.into_body().to_string()?
            )));
        }
        let mut body = Vec::new();
        response.into_body().read_to_end(&mut body)?;
        Ok(body)
    }
}

fn invalid_input_error(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidInput, error)
}
