use anyhow::Result;

pub mod discord;

/// Write side: one payload per report.
#[async_trait::async_trait]
pub trait DeliverySink: Send + Sync {
    fn sink_name(&self) -> &'static str;

    async fn deliver(&self, report_text: &str) -> Result<()>;
}

/// Prints the report instead of sending it (dry runs).
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

#[async_trait::async_trait]
impl DeliverySink for StdoutSink {
    fn sink_name(&self) -> &'static str {
        "stdout"
    }

    async fn deliver(&self, report_text: &str) -> Result<()> {
        println!("{report_text}");
        Ok(())
    }
}
