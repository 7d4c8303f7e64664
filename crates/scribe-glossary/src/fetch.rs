//! HTTP fetch of the glossary page.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::errors::GlossaryError;
use crate::model::Glossary;
use crate::parse::parse_glossary;

/// HTTP client that identifies itself with a descriptive `User-Agent`.
pub struct GlossaryClient {
    client: reqwest::Client,
}

impl GlossaryClient {
    /// Create a client with the given identity and request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, GlossaryError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body. Non-2xx statuses are errors.
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, GlossaryError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GlossaryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "fetched glossary page");
        Ok(body)
    }

    /// Fetch, parse, and drop reference sections.
    ///
    /// A page with no sections left over is a [`GlossaryError::Parse`].
    pub async fn fetch_glossary(&self, url: &str) -> Result<Glossary, GlossaryError> {
        let html = self.fetch_html(url).await?;
        let mut glossary = parse_glossary(&html)?;
        let removed = glossary.strip_non_content();
        if !removed.is_empty() {
            debug!(?removed, "dropped non-content sections");
        }
        if glossary.is_empty() {
            return Err(GlossaryError::Parse("no glossary sections found".into()));
        }
        info!(
            sections = glossary.len(),
            terms = glossary.term_count(),
            "extracted glossary"
        );
        Ok(glossary)
    }
}
