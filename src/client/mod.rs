//! Measuring client for a speed-test server.
//!
//! # Data Flow
//! ```text
//! SpeedtestClient
//!     → HEAD /ping          → latency
//!     → GET  /testfile.bin  → download Transfer (streamed, counted)
//!     → POST /upload        → upload Transfer
//!     → Report (Mbit/s, ms)
//! ```
//!
//! Rates use decimal megabits: bits / seconds / 1,000,000.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::StatusCode;

use crate::endpoints::{DOWNLOAD_PATH, PING_PATH, UPLOAD_COMPLETE, UPLOAD_PATH};

/// Error type for client measurements.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Download truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },
    #[error("Unexpected upload reply {0:?}")]
    UnexpectedReply(String),
}

/// Bytes moved in one measurement and how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    pub bytes: u64,
    pub elapsed: Duration,
}

impl Transfer {
    /// Throughput in decimal megabits per second.
    pub fn megabits_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.bytes as f64 * 8.0) / secs / 1_000_000.0
    }
}

/// Result of a full measurement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub ping: Duration,
    pub download: Transfer,
    pub upload: Transfer,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Download: {:.2} Mbit/s", self.download.megabits_per_second())?;
        writeln!(f, "Upload:   {:.2} Mbit/s", self.upload.megabits_per_second())?;
        write!(f, "Ping:     {:.2} ms", self.ping.as_secs_f64() * 1000.0)
    }
}

/// HTTP client that measures a speed-test server.
#[derive(Debug, Clone)]
pub struct SpeedtestClient {
    base_url: String,
    client: reqwest::Client,
}

impl SpeedtestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Round-trip time of a single `HEAD /ping`.
    pub async fn ping(&self) -> Result<Duration, ClientError> {
        let start = Instant::now();
        let res = self.client.head(self.url(PING_PATH)).send().await?;
        let elapsed = start.elapsed();

        if res.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(res.status()));
        }
        Ok(elapsed)
    }

    /// Download the test file, counting bytes as they arrive.
    pub async fn download(&self) -> Result<Transfer, ClientError> {
        let start = Instant::now();
        let mut res = self.client.get(self.url(DOWNLOAD_PATH)).send().await?;
        if res.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(res.status()));
        }

        let expected = res.content_length();
        let mut bytes: u64 = 0;
        while let Some(chunk) = res.chunk().await? {
            bytes += chunk.len() as u64;
        }
        let elapsed = start.elapsed();

        if let Some(expected) = expected {
            if bytes != expected {
                return Err(ClientError::Truncated { expected, actual: bytes });
            }
        }

        tracing::debug!(bytes, elapsed_ms = elapsed.as_millis() as u64, "Download finished");
        Ok(Transfer { bytes, elapsed })
    }

    /// Upload `size` zero bytes.
    pub async fn upload(&self, size: usize) -> Result<Transfer, ClientError> {
        let payload = vec![0u8; size];
        let start = Instant::now();
        let res = self.client.post(self.url(UPLOAD_PATH)).body(payload).send().await?;
        let status = res.status();
        let reply = res.text().await?;
        let elapsed = start.elapsed();

        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(status));
        }
        if reply != UPLOAD_COMPLETE {
            return Err(ClientError::UnexpectedReply(reply));
        }

        tracing::debug!(bytes = size, elapsed_ms = elapsed.as_millis() as u64, "Upload finished");
        Ok(Transfer {
            bytes: size as u64,
            elapsed,
        })
    }

    /// Ping, then download, then upload as many bytes as were downloaded.
    pub async fn run(&self) -> Result<Report, ClientError> {
        let ping = self.ping().await?;
        let download = self.download().await?;
        let upload = self.upload(download.bytes as usize).await?;
        Ok(Report {
            ping,
            download,
            upload,
        })
    }
}
