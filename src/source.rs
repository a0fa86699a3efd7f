//! Where icon markup comes from.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::IconError;
use crate::icon::IconId;

/// Public Iconify API.
pub const DEFAULT_ENDPOINT: &str = "https://api.iconify.design";

/// Fetches the SVG markup for an icon.
pub trait IconSource {
    fn fetch_svg(&self, icon: &IconId) -> Result<String, IconError>;
}

impl<S: IconSource + ?Sized> IconSource for &S {
    fn fetch_svg(&self, icon: &IconId) -> Result<String, IconError> {
        (**self).fetch_svg(icon)
    }
}

/// Fetches icons over HTTP from `<endpoint>/<prefix>/<name>.svg`.
///
/// Requests are blocking and never retried.
#[derive(Debug, Clone)]
pub struct HttpIconSource {
    client: Client,
    endpoint: String,
}

impl HttpIconSource {
    /// Creates a source for `endpoint`. Without a `timeout` the HTTP
    /// client's default applies.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IconSource for HttpIconSource {
    fn fetch_svg(&self, icon: &IconId) -> Result<String, IconError> {
        let url = icon.svg_url(&self.endpoint);
        debug!(%url, "fetching icon");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(IconError::FetchStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}
