//! Blocking HTTP fetcher.
//!
//! Issues one GET per artifact and streams the body into a `.part` file
//! next to its final location in the [`DownloadCache`]. The file is renamed
//! into place only after the whole body has arrived and its length matches
//! the declared size; failed transfers leave nothing behind.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, Response};

use crate::cache::{partial_path, DownloadCache};
use crate::error::FetchError;
use crate::fetch::{Artifact, FetchOutcome, Fetcher, Transfer};

/// Client settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Proxy URL for all requests, if any.
    pub proxy: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        HttpOptions {
            user_agent: concat!("corepm/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
        }
    }
}

/// Fetches archives over HTTP into a download cache.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    cache: DownloadCache,
}

impl HttpFetcher {
    /// Build a fetcher storing into `cache`.
    pub fn new(cache: DownloadCache, options: &HttpOptions) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(options.user_agent.clone());
        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|source| FetchError::Client { source })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(HttpFetcher { client, cache })
    }

    fn start(&self, artifact: &Artifact<'_>) -> Result<Option<HttpTransfer>, FetchError> {
        let resource = artifact.resource;
        let url = reqwest::Url::parse(&resource.url).map_err(|e| FetchError::InvalidUrl {
            url: resource.url.clone(),
            detail: e.to_string(),
        })?;
        let dest = self
            .cache
            .archive_path(artifact.kind, &resource.archive_file_name)?;

        if self.cache.contains(artifact.kind, resource)? {
            tracing::debug!(label = %artifact.label, path = %dest.display(), "archive already cached");
            return Ok(None);
        }
        self.cache.ensure_dir(artifact.kind)?;

        tracing::info!("Fetching {} from {}", artifact.label, url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = response
            .content_length()
            .or((resource.size > 0).then_some(resource.size));

        Ok(Some(HttpTransfer {
            response,
            url: url.to_string(),
            dest,
            expected_size: resource.size,
            total,
        }))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, artifact: &Artifact<'_>) -> FetchOutcome {
        match self.start(artifact) {
            Ok(Some(transfer)) => FetchOutcome::InProgress(Box::new(transfer)),
            Ok(None) => FetchOutcome::AlreadyPresent,
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

/// A response body being streamed to disk.
struct HttpTransfer {
    response: Response,
    url: String,
    dest: PathBuf,
    expected_size: u64,
    total: Option<u64>,
}

impl HttpTransfer {
    fn stream(&mut self, part: &Path, progress: &mut dyn FnMut(u64)) -> Result<u64, FetchError> {
        let write_err = |source| FetchError::Cache {
            path: part.to_path_buf(),
            source,
        };
        let mut file = File::create(part).map_err(write_err)?;
        let mut buf = vec![0u8; 64 * 1024];
        let mut received = 0u64;
        loop {
            let n = self
                .response
                .read(&mut buf)
                .map_err(|source| FetchError::Interrupted {
                    url: self.url.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).map_err(write_err)?;
            received += n as u64;
            progress(received);
        }
        file.flush().map_err(write_err)?;
        Ok(received)
    }
}

impl Transfer for HttpTransfer {
    fn total_size(&self) -> Option<u64> {
        self.total
    }

    fn complete(mut self: Box<Self>, progress: &mut dyn FnMut(u64)) -> Result<PathBuf, FetchError> {
        let part = partial_path(&self.dest);
        let result = self.stream(&part, progress).and_then(|received| {
            if self.expected_size > 0 && received != self.expected_size {
                return Err(FetchError::SizeMismatch {
                    path: self.dest.clone(),
                    expected: self.expected_size,
                    actual: received,
                });
            }
            std::fs::rename(&part, &self.dest).map_err(|source| FetchError::Cache {
                path: self.dest.clone(),
                source,
            })
        });

        match result {
            Ok(()) => Ok(self.dest),
            Err(err) => {
                if let Err(e) = std::fs::remove_file(&part) {
                    tracing::debug!(path = %part.display(), "leaving partial file: {e}");
                }
                Err(err)
            }
        }
    }
}
