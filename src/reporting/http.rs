use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};

use crate::error::EngineError;
use crate::session::SessionSummary;

use super::{ResultsPayload, ResultsReporter};

/// POSTs each summary as JSON to the results endpoint.
pub struct HttpReporter {
    http_client: reqwest::Client,
    url: String,
}

impl HttpReporter {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ResultsReporter for HttpReporter {
    async fn deliver(&self, summary: &SessionSummary) -> Result<()> {
        let payload = ResultsPayload::from(summary);
        info!(
            "Sending results for session {} ({}) to {}",
            summary.session_id, payload.documento, self.url
        );

        let response = self
            .http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                EngineError::report(format!("results request to {} failed: {err}", self.url))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        if !status.is_success() {
            return Err(EngineError::report(format!(
                "results endpoint returned {status}: {body}"
            ))
            .into());
        }

        debug!("Results endpoint replied: {body}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;
    use crate::attention::{IndicatorName, PerIndicator};
    use crate::documents::DocumentId;

    fn summary() -> SessionSummary {
        let now = Utc::now();
        SessionSummary {
            session_id: "s-42".into(),
            document_id: DocumentId::Long,
            percentages: PerIndicator {
                eye_openness: 40.0,
                head_pose: 90.0,
                mouth_closure: 90.0,
            },
            best: IndicatorName::HeadPose,
            total_frames: 10,
            started_at: now,
            finished_at: now,
        }
    }

    /// Accepts one request, hands its body back and answers with `status_line`.
    async fn one_shot_server(status_line: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/resultados/", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            let body = loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let headers = text[..split].to_ascii_lowercase();
                    let length = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    let body = &text[split + 4..];
                    if body.len() >= length {
                        break body.to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            let reply = "{\"mensaje\":\"ok\"}";
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(body);
        });

        (url, rx)
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let (url, body_rx) = one_shot_server("HTTP/1.1 200 OK").await;
        let reporter = HttpReporter::new(url, 5).unwrap();

        reporter.deliver(&summary()).await.unwrap();

        let body: serde_json::Value = serde_json::from_str(&body_rx.await.unwrap()).unwrap();
        assert_eq!(body["documento"], "extenso");
        assert_eq!(body["headPose"], 90.0);
        assert_eq!(body["mejor"], "Head Pose");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, _body_rx) = one_shot_server("HTTP/1.1 500 Internal Server Error").await;
        let reporter = HttpReporter::new(url, 5).unwrap();

        let err = reporter.deliver(&summary()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::Report { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = HttpReporter::new(format!("http://{addr}/api/resultados/"), 2).unwrap();
        let err = reporter.deliver(&summary()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::Report { .. })
        ));
    }
}
