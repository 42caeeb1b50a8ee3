//! Access to a lookup site.
//!
//! The crawl only needs three operations, each returning raw markup:
//! open the home page, run a search from an offset, and fetch one inmate's
//! detail page. [`InmateSite`] is that capability; [`HttpInmateSite`]
//! provides it over HTTP and tests provide it from memory.

use std::collections::BTreeMap;
use std::future::Future;

use crate::SourceError;
use crate::site_def::SiteDefinition;

/// User agent sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// The fetch capability the crawl runs against.
///
/// Calls are made one at a time; implementations may keep session state
/// (cookies) between them.
pub trait InmateSite: Send + Sync {
    /// Opens the home page, establishing the server-side session.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the transport fails.
    fn open_home(&self) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Runs the roster search starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the transport fails.
    fn search(&self, offset: usize) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Fetches the detail page for the inmate with `system_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the transport fails.
    fn fetch_detail(
        &self,
        system_id: &str,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// [`InmateSite`] over HTTP, with a cookie store shared by every request.
#[derive(Debug, Clone)]
pub struct HttpInmateSite {
    client: reqwest::Client,
    site: SiteDefinition,
}

impl HttpInmateSite {
    /// Creates a client for `site`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(site: SiteDefinition) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;
        Ok(Self { client, site })
    }

    /// Returns the site definition this client talks to.
    #[must_use]
    pub const fn site(&self) -> &SiteDefinition {
        &self.site
    }

    async fn post_form(
        &self,
        path: &str,
        form: &BTreeMap<String, String>,
    ) -> Result<String, SourceError> {
        let url = self.site.url(path);
        log::debug!("POST {url} {form:?}");
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl InmateSite for HttpInmateSite {
    async fn open_home(&self) -> Result<String, SourceError> {
        let url = self.site.url(&self.site.home.path);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn search(&self, offset: usize) -> Result<String, SourceError> {
        let form = self.site.search_form(offset);
        self.post_form(&self.site.search.path, &form).await
    }

    async fn fetch_detail(&self, system_id: &str) -> Result<String, SourceError> {
        let form = self.site.detail_form(system_id);
        self.post_form(&self.site.detail.path, &form).await
    }
}
