//! Dataset fetch pipeline
//!
//! Three sequential steps, each skipped when its output already exists
//! (except the last): download the archive, extract it, run the graph
//! builder on the extracted directory.

use async_trait::async_trait;
use futures::StreamExt;
use paperlens_common::config::FetchConfig;
use paperlens_common::errors::{AppError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// The side-effecting steps of a fetch
#[async_trait]
pub trait FetchSteps: Send + Sync {
    /// Download `url` to `dest`
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Unpack a `.tar.gz` archive into `dest_root`
    async fn extract(&self, archive: &Path, dest_root: &Path) -> Result<()>;

    /// Run the citation graph builder on `data_dir` and wait for it
    async fn build_graph(&self, data_dir: &Path) -> Result<()>;
}

/// What a fetch run actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: bool,
    pub extracted: bool,
}

/// Idempotent download -> extract -> build pipeline
pub struct DatasetFetcher<S: FetchSteps> {
    steps: S,
    url: String,
    archive_path: PathBuf,
    data_dir: PathBuf,
}

impl DatasetFetcher<HttpFetchSteps> {
    /// Production pipeline for the given configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(
            HttpFetchSteps::new(config)?,
            config.resolved_download_url(),
            config.archive_path.clone(),
            config.data_dir.clone(),
        ))
    }
}

impl<S: FetchSteps> DatasetFetcher<S> {
    pub fn new(
        steps: S,
        url: impl Into<String>,
        archive_path: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            steps,
            url: url.into(),
            archive_path: archive_path.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Run the pipeline. The graph builder always runs.
    pub async fn run(&self) -> Result<FetchReport> {
        let downloaded = if self.archive_path.exists() {
            info!(
                archive = %self.archive_path.display(),
                "Found existing archive, skipping download"
            );
            false
        } else {
            info!(url = %self.url, archive = %self.archive_path.display(), "Downloading dataset");
            self.steps.download(&self.url, &self.archive_path).await?;
            true
        };

        let extracted = if self.data_dir.is_dir() {
            info!(
                dir = %self.data_dir.display(),
                "Found existing directory, skipping extraction"
            );
            false
        } else {
            let dest_root = parent_or_current(&self.data_dir);
            info!(
                archive = %self.archive_path.display(),
                dest = %dest_root.display(),
                "Extracting dataset"
            );
            self.steps.extract(&self.archive_path, &dest_root).await?;

            if !self.data_dir.is_dir() {
                return Err(AppError::Extraction {
                    archive: self.archive_path.clone(),
                    message: format!(
                        "archive did not contain {}",
                        self.data_dir.display()
                    ),
                });
            }
            true
        };

        info!(dir = %self.data_dir.display(), "Running citation graph builder");
        self.steps.build_graph(&self.data_dir).await?;

        Ok(FetchReport {
            downloaded,
            extracted,
        })
    }
}

/// reqwest + tar + child process implementation
pub struct HttpFetchSteps {
    client: Client,
    /// Drive's confirmed-download endpoint, used when the first response is
    /// the virus-scan interstitial page
    confirm_url: Option<String>,
    graph_builder: String,
}

impl HttpFetchSteps {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let confirm_url = match config.download_url {
            Some(_) => None,
            None => Some(format!(
                "https://drive.usercontent.google.com/download?id={}&export=download&confirm=t",
                config.file_id
            )),
        };

        Ok(Self {
            client,
            confirm_url,
            graph_builder: config.graph_builder.clone(),
        })
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Download {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }
        Ok(response)
    }

    /// Graph builder next to the running executable, else whatever `PATH` finds
    fn graph_builder_program(&self) -> PathBuf {
        let file_name = format!("{}{}", self.graph_builder, std::env::consts::EXE_SUFFIX);
        if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                return candidate;
            }
        }
        PathBuf::from(&self.graph_builder)
    }
}

#[async_trait]
impl FetchSteps for HttpFetchSteps {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self.get(url).await?;
        let mut source = url.to_string();

        if is_html_response(content_type(&response).as_deref(), &[]) {
            let Some(confirm_url) = &self.confirm_url else {
                return Err(AppError::Download {
                    url: url.to_string(),
                    message: "got an HTML page instead of the archive".to_string(),
                });
            };
            warn!(url = %url, "Got an HTML page, retrying with download confirmation");
            response = self.get(confirm_url).await?;
            source = confirm_url.clone();
        }

        let parent = parent_or_current(dest);
        fs::create_dir_all(&parent).map_err(|e| AppError::io(&parent, e))?;
        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| AppError::io(&parent, e))?;

        let content_type = content_type(&response);
        let mut stream = response.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if written == 0 && is_html_response(content_type.as_deref(), &chunk) {
                return Err(AppError::Download {
                    url: source,
                    message: format!("got HTML instead of the archive (content-type={content_type:?})"),
                });
            }
            temp.write_all(&chunk).map_err(|e| AppError::io(temp.path(), e))?;
            written += chunk.len();
        }

        if written == 0 {
            return Err(AppError::Download {
                url: source,
                message: "empty response body".to_string(),
            });
        }

        temp.flush().map_err(|e| AppError::io(dest, e))?;
        temp.persist(dest).map_err(|e| AppError::io(dest, e.error))?;

        info!(archive = %dest.display(), bytes = written, "Download complete");
        Ok(())
    }

    async fn extract(&self, archive: &Path, dest_root: &Path) -> Result<()> {
        let archive = archive.to_path_buf();
        let dest_root = dest_root.to_path_buf();
        tokio::task::spawn_blocking(move || extract_tar_gz(&archive, &dest_root))
            .await
            .map_err(|e| AppError::Internal {
                message: format!("extraction task failed: {e}"),
            })?
    }

    async fn build_graph(&self, data_dir: &Path) -> Result<()> {
        let program = self.graph_builder_program();
        let command = format!("{} --dataset-path {}", program.display(), data_dir.display());
        debug!(command = %command, "Spawning graph builder");

        let status = Command::new(&program)
            .arg("--dataset-path")
            .arg(data_dir)
            .status()
            .await
            .map_err(|e| AppError::Subprocess {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(AppError::Subprocess {
                command,
                message: format!("exited with {status}"),
            });
        }

        info!("Citation graph builder finished");
        Ok(())
    }
}

/// Unpack a gzip-compressed tarball into `dest_root`
pub fn extract_tar_gz(archive: &Path, dest_root: &Path) -> Result<()> {
    let extraction_err = |e: std::io::Error| AppError::Extraction {
        archive: archive.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(archive).map_err(|e| AppError::io(archive, e))?;
    let gz = flate2::read::GzDecoder::new(file);
    let mut tarball = tar::Archive::new(gz);

    fs::create_dir_all(dest_root).map_err(|e| AppError::io(dest_root, e))?;
    tarball.unpack(dest_root).map_err(extraction_err)?;

    info!(archive = %archive.display(), dest = %dest_root.display(), "Archive extracted");
    Ok(())
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok().map(str::to_owned))
}

fn is_html_response(content_type: Option<&str>, body: &[u8]) -> bool {
    content_type
        .map(|value| value.to_lowercase().contains("text/html"))
        .unwrap_or(false)
        || body
            .iter()
            .skip_while(|byte| byte.is_ascii_whitespace())
            .take(5)
            .map(|byte| byte.to_ascii_lowercase())
            .eq(b"<html".iter().copied())
        || body
            .iter()
            .skip_while(|byte| byte.is_ascii_whitespace())
            .take(9)
            .map(|byte| byte.to_ascii_lowercase())
            .eq(b"<!doctype".iter().copied())
}

fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
