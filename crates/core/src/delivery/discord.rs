use crate::config::Settings;
use crate::delivery::DeliverySink;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

/// Discord rejects message content above this many characters.
pub const DISCORD_CONTENT_LIMIT: usize = 2000;

#[derive(Debug, Clone)]
pub struct DiscordWebhookSink {
    http: reqwest::Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

impl DiscordWebhookSink {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let webhook_url = settings.require_discord_webhook()?.to_string();
        Self::new(webhook_url, Duration::from_secs(settings.http_timeout_secs))
    }

    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build webhook http client")?;
        Ok(Self { http, webhook_url })
    }
}

#[async_trait::async_trait]
impl DeliverySink for DiscordWebhookSink {
    fn sink_name(&self) -> &'static str {
        "discord_webhook"
    }

    async fn deliver(&self, report_text: &str) -> Result<()> {
        let chars = report_text.chars().count();
        if chars > DISCORD_CONTENT_LIMIT {
            tracing::warn!(
                chars,
                limit = DISCORD_CONTENT_LIMIT,
                "report exceeds Discord content limit; webhook will likely reject it"
            );
        }

        let res = self
            .http
            .post(&self.webhook_url)
            .json(&WebhookMessage {
                content: report_text,
            })
            .send()
            .await
            .context("webhook request failed")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("webhook HTTP {status}: {text}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sink(server: &MockServer) -> DiscordWebhookSink {
        DiscordWebhookSink::new(format!("{}/hook", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn payload_is_a_single_content_field() {
        let v = serde_json::to_value(WebhookMessage { content: "hi\nthere" }).unwrap();
        assert_eq!(v, serde_json::json!({"content": "hi\nthere"}));
    }

    #[tokio::test]
    async fn posts_report_as_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({"content": "3D Top 20"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        sink(&server).deliver("3D Top 20").await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_fails_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Unknown Webhook"))
            .expect(1)
            .mount(&server)
            .await;

        let err = sink(&server).deliver("report").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("404"), "{msg}");
        assert!(msg.contains("Unknown Webhook"), "{msg}");
    }
}
