//! Sources of trust framework shapes.

use std::fs;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::ShapeLoadError;
use crate::http::HttpClient;

/// A registry publishing the types of a trust framework and their SHACL shapes.
pub trait Registry: Send + Sync + 'static {
    /// The short names of the types the trust framework implements.
    fn implemented_types(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, ShapeLoadError>> + Send;

    /// The raw shape document of `type_name`, JSON-LD or Turtle.
    fn fetch_shape(
        &self,
        type_name: &str,
    ) -> impl Future<Output = Result<String, ShapeLoadError>> + Send;

    /// Where the shape of `type_name` comes from, for error reports.
    fn shape_location(&self, type_name: &str) -> String;
}

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A registry reached over HTTP.
///
/// It serves `GET {base}/shapes/implemented` as a JSON array of type names and
/// `GET {base}/shapes/{type}` as the shape document of each type.
#[derive(Clone)]
pub struct HttpRegistry {
    base_url: String,
    client: HttpClient,
}

impl HttpRegistry {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        redirection_limit: usize,
    ) -> io::Result<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            base_url,
            client: HttpClient::new(timeout, redirection_limit)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn implemented_url(&self) -> String {
        format!("{}/shapes/implemented", self.base_url)
    }

    async fn get(&self, url: String, accept: &'static str) -> Result<Vec<u8>, ShapeLoadError> {
        debug!(url, "querying shape registry");
        let client = self.client.clone();
        let target = url.clone();
        match tokio::task::spawn_blocking(move || client.get(&target, accept)).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => Err(ShapeLoadError::fetch(url, e)),
            Err(e) => Err(ShapeLoadError::fetch(url, io::Error::other(e))),
        }
    }
}

impl Registry for HttpRegistry {
    async fn implemented_types(&self) -> Result<Vec<String>, ShapeLoadError> {
        let url = self.implemented_url();
        let body = self.get(url.clone(), "application/json").await?;
        serde_json::from_slice(&body)
            .map_err(|source| ShapeLoadError::InvalidImplementedList { url, source })
    }

    async fn fetch_shape(&self, type_name: &str) -> Result<String, ShapeLoadError> {
        let url = self.shape_location(type_name);
        if matches!(type_name, "" | "." | "..") {
            return Err(ShapeLoadError::InvalidTypeName {
                url,
                type_name: type_name.to_owned(),
            });
        }
        let body = self
            .get(
                url.clone(),
                "application/ld+json, text/turtle;q=0.9, */*;q=0.1",
            )
            .await?;
        String::from_utf8(body).map_err(|e| {
            ShapeLoadError::fetch(url, io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    fn shape_location(&self, type_name: &str) -> String {
        format!(
            "{}/shapes/{}",
            self.base_url,
            utf8_percent_encode(type_name, PATH_SEGMENT)
        )
    }
}

/// An in-memory registry.
///
/// It counts the shape fetches it serves, which makes cache behavior observable.
///
/// ```
/// use trustshacl::{Registry, StaticRegistry};
///
/// # tokio::runtime::Runtime::new()?.block_on(async {
/// let registry = StaticRegistry::new(["Member"])
///     .with_shape("Member", "@prefix sh: <http://www.w3.org/ns/shacl#> .");
/// assert_eq!(registry.implemented_types().await?, ["Member"]);
/// registry.fetch_shape("Member").await?;
/// assert_eq!(registry.shape_fetches(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # })?;
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct StaticRegistry {
    implemented: Vec<String>,
    shapes: FxHashMap<String, String>,
    shape_fetches: AtomicUsize,
}

impl StaticRegistry {
    pub fn new(implemented: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            implemented: implemented.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Loads a registry laid out on disk.
    ///
    /// `dir/implemented.json` holds the JSON array of type names, and the shape
    /// of each type is read from `dir/{type}.ttl`, `dir/{type}.jsonld` or `dir/{type}.json`.
    pub fn from_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        let implemented: Vec<String> =
            serde_json::from_slice(&fs::read(dir.join("implemented.json"))?)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut registry = Self::new(implemented.iter().cloned());
        for type_name in &implemented {
            for extension in ["ttl", "jsonld", "json"] {
                let path = dir.join(format!("{type_name}.{extension}"));
                if path.is_file() {
                    registry = registry.with_shape(type_name.clone(), fs::read_to_string(path)?);
                    break;
                }
            }
        }
        Ok(registry)
    }

    #[must_use]
    pub fn with_shape(mut self, type_name: impl Into<String>, shape: impl Into<String>) -> Self {
        self.shapes.insert(type_name.into(), shape.into());
        self
    }

    /// How many times [`fetch_shape`](Registry::fetch_shape) has been called.
    pub fn shape_fetches(&self) -> usize {
        self.shape_fetches.load(Ordering::Relaxed)
    }
}

impl Registry for StaticRegistry {
    async fn implemented_types(&self) -> Result<Vec<String>, ShapeLoadError> {
        Ok(self.implemented.clone())
    }

    async fn fetch_shape(&self, type_name: &str) -> Result<String, ShapeLoadError> {
        self.shape_fetches.fetch_add(1, Ordering::Relaxed);
        self.shapes.get(type_name).cloned().ok_or_else(|| {
            ShapeLoadError::fetch(
                self.shape_location(type_name),
                io::Error::new(io::ErrorKind::NotFound, "no shape registered for this type"),
            )
        })
    }

    fn shape_location(&self, type_name: &str) -> String {
        format!("static:shapes/{type_name}")
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;

    #[test]
    fn test_http_registry_urls() -> io::Result<()> {
        let registry = HttpRegistry::new("https://registry.example.org/api/", None, 5)?;
        assert_eq!(registry.base_url(), "https://registry.example.org/api");
        assert_eq!(
            registry.implemented_url(),
            "https://registry.example.org/api/shapes/implemented"
        );
        assert_eq!(
            registry.shape_location("LegalPerson"),
            "https://registry.example.org/api/shapes/LegalPerson"
        );
        Ok(())
    }

    #[test]
    fn test_type_names_stay_in_one_path_segment() -> io::Result<()> {
        let registry = HttpRegistry::new("https://registry.example.org/api", None, 5)?;
        assert_eq!(
            registry.shape_location("Legal Person/../x?y#z"),
            "https://registry.example.org/api/shapes/Legal%20Person%2F..%2Fx%3Fy%23z"
        );
        assert_eq!(
            registry.shape_location("100%"),
            "https://registry.example.org/api/shapes/100%25"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_dot_segments_are_not_fetched() -> io::Result<()> {
        // Nothing listens there, so any request would be a fetch error.
        let registry = HttpRegistry::new("http://127.0.0.1:9", Some(Duration::from_secs(2)), 0)?;
        for type_name in ["", ".", ".."] {
            let Err(error) = registry.fetch_shape(type_name).await else {
                panic!("{type_name:?} must be rejected");
            };
            assert!(matches!(error, ShapeLoadError::InvalidTypeName { .. }));
            assert!(!error.is_infrastructure());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_static_shape_is_a_fetch_error() {
        let registry = StaticRegistry::new(["Member"]);
        let Err(error) = registry.fetch_shape("Member").await else {
            panic!("no shape was registered");
        };
        assert!(error.is_infrastructure());
        assert_eq!(error.url(), "static:shapes/Member");
        assert_eq!(registry.shape_fetches(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_registry() -> io::Result<()> {
        let registry = HttpRegistry::new("http://127.0.0.1:9", Some(Duration::from_secs(2)), 0)?;
        let Err(error) = registry.implemented_types().await else {
            panic!("nothing listens on the discard port");
        };
        assert!(matches!(error, ShapeLoadError::Fetch { .. }));
        Ok(())
    }
}
