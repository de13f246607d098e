//! Blocking HTTP access to Crossref and arXiv.

use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::source::MetadataSource;

const CROSSREF_OPENURL: &str = "https://www.crossref.org/openurl/";
const ARXIV_API: &str = "https://export.arxiv.org/api/query";
const ARXIV_PDF: &str = "https://arxiv.org/pdf/";
const USER_AGENT: &str = concat!("bibliophant/", env!("CARGO_PKG_VERSION"));

/// `MetadataSource` backed by the public web services.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    contact: Option<String>,
}

impl HttpSource {
    /// Create a source whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            contact: None,
        })
    }

    /// Email address sent to Crossref as the OpenURL `pid`.
    pub fn with_contact(mut self, email: impl Into<String>) -> Self {
        self.contact = Some(email.into());
        self
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::blocking::Response> {
        debug!(target: "bibliophant::import", url, "GET");
        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("{} answered {}", url, status)));
        }
        Ok(response)
    }
}

impl MetadataSource for HttpSource {
    fn crossref_unixref(&self, doi: &str) -> Result<String> {
        let id = format!("doi:{}", doi);
        let mut query = vec![
            ("id", id.as_str()),
            ("noredirect", "true"),
            ("format", "unixref"),
        ];
        if let Some(contact) = &self.contact {
            query.push(("pid", contact.as_str()));
        }
        Ok(self.get(CROSSREF_OPENURL, &query)?.text()?)
    }

    fn arxiv_atom(&self, id: &str) -> Result<String> {
        Ok(self.get(ARXIV_API, &[("id_list", id)])?.text()?)
    }

    fn arxiv_pdf(&self, id: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}.pdf", ARXIV_PDF, id);
        let response = self.get(&url, &[])?;
        let is_pdf = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/pdf"));
        if !is_pdf {
            return Err(Error::NotPdf(url));
        }
        Ok(response.bytes()?.to_vec())
    }
}
