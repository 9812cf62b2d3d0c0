use std::error::Error;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use oxjsonld::{JsonLdLoadDocumentOptions, JsonLdRemoteDocument};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::http::HttpClient;

type LoadResult = Result<JsonLdRemoteDocument, Box<dyn Error + Send + Sync>>;

const JSON_LD_ACCEPT: &str = "application/ld+json, application/json;q=0.9";

/// Resolves the `@context` URLs met while expanding JSON-LD documents.
///
/// The W3C credentials, security and DID contexts are bundled. Other contexts
/// must be registered with [`with_document`](Self::with_document), or fetched
/// over HTTP once [`with_remote`](Self::with_remote) is enabled. Fetched
/// contexts are kept for the lifetime of the loader and its clones.
///
/// ```
/// use trustshacl::ContextLoader;
///
/// let loader = ContextLoader::new()
///     .with_document("https://example.org/context.jsonld", r#"{"@context":{}}"#);
/// assert!(loader.contains("https://www.w3.org/2018/credentials/v1"));
/// assert!(loader.contains("https://example.org/context.jsonld"));
/// ```
#[derive(Clone)]
pub struct ContextLoader {
    documents: Arc<FxHashMap<String, Arc<[u8]>>>,
    remote: Option<HttpClient>,
    fetched: Arc<Mutex<FxHashMap<String, Arc<[u8]>>>>,
}

impl ContextLoader {
    /// A loader knowing only the bundled contexts.
    pub fn new() -> Self {
        let bundled = [
            ("https://www.w3.org/2018/credentials/v1", ssi_contexts::CREDENTIALS_V1),
            (
                "https://www.w3.org/2018/credentials/examples/v1",
                ssi_contexts::CREDENTIALS_EXAMPLES_V1,
            ),
            ("https://w3id.org/security/v1", ssi_contexts::SECURITY_V1),
            ("https://w3id.org/security/v2", ssi_contexts::SECURITY_V2),
            (
                "https://w3id.org/security/suites/jws-2020/v1",
                ssi_contexts::LDS_JWS2020_V1,
            ),
            (
                "https://w3c-ccg.github.io/lds-jws2020/contexts/lds-jws2020-v1.json",
                ssi_contexts::LDS_JWS2020_V1,
            ),
            ("https://www.w3.org/ns/did/v1", ssi_contexts::DID_V1),
            ("https://w3id.org/did/v1", ssi_contexts::DID_V1),
        ];
        Self {
            documents: Arc::new(
                bundled
                    .into_iter()
                    .map(|(url, document)| (url.to_owned(), Arc::from(document.as_bytes())))
                    .collect(),
            ),
            remote: None,
            fetched: Arc::default(),
        }
    }

    /// Allows fetching unknown contexts over HTTP(S).
    pub fn with_remote(
        mut self,
        timeout: Option<Duration>,
        redirection_limit: usize,
    ) -> io::Result<Self> {
        self.remote = Some(HttpClient::new(timeout, redirection_limit)?);
        Ok(self)
    }

    /// Serves `document` whenever `url` is requested.
    #[must_use]
    pub fn with_document(mut self, url: impl Into<String>, document: impl AsRef<[u8]>) -> Self {
        Arc::make_mut(&mut self.documents).insert(url.into(), Arc::from(document.as_ref()));
        self
    }

    /// Whether `url` can be resolved without network access.
    pub fn contains(&self, url: &str) -> bool {
        self.documents.contains_key(url) || self.cached(url).is_some()
    }

    fn cached(&self, url: &str) -> Option<Arc<[u8]>> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    fn load(&self, url: &str) -> LoadResult {
        if let Some(document) = self.documents.get(url).cloned().or_else(|| self.cached(url)) {
            return Ok(remote_document(url, &document));
        }
        let Some(client) = &self.remote else {
            return Err(format!("the JSON-LD context {url} is not available offline").into());
        };
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(format!("the JSON-LD context {url} is not an HTTP URL").into());
        }
        debug!(url, "fetching remote JSON-LD context");
        let document: Arc<[u8]> = client.get(url, JSON_LD_ACCEPT)?.into();
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_owned(), Arc::clone(&document));
        Ok(remote_document(url, &document))
    }

    /// The document loader handed to the JSON-LD parser.
    pub(crate) fn callback(
        &self,
    ) -> impl Fn(&str, &JsonLdLoadDocumentOptions) -> LoadResult
    + Send
    + Sync
    + std::panic::UnwindSafe
    + std::panic::RefUnwindSafe
    + 'static {
        let loader = AssertUnwindSafe(self.clone());
        move |url, _options| loader.load(url)
    }
}

impl Default for ContextLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn remote_document(url: &str, document: &[u8]) -> JsonLdRemoteDocument {
    JsonLdRemoteDocument {
        document: document.to_vec(),
        document_url: url.to_owned(),
    }
}
