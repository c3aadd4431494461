/// Failures that end a run. Per-symbol history problems never reach this level.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("market universe unavailable ({stage}): {detail}")]
    UniverseUnavailable { stage: &'static str, detail: String },

    #[error("report delivery failed (sink={sink}): {detail}")]
    DeliveryFailure { sink: &'static str, detail: String },
}

impl RunError {
    pub fn universe(stage: &'static str, err: &anyhow::Error) -> Self {
        RunError::UniverseUnavailable {
            stage,
            detail: format!("{err:#}"),
        }
    }

    pub fn delivery(sink: &'static str, err: &anyhow::Error) -> Self {
        RunError::DeliveryFailure {
            sink,
            detail: format!("{err:#}"),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            RunError::UniverseUnavailable { stage, .. } => *stage,
            RunError::DeliveryFailure { .. } => "deliver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn keeps_the_whole_context_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("connection reset"))
            .context("ticker request failed")
            .unwrap_err();
        let run = RunError::universe("snapshot_prices", &err);
        assert_eq!(
            run.to_string(),
            "market universe unavailable (snapshot_prices): ticker request failed: connection reset"
        );
        assert_eq!(run.stage(), "snapshot_prices");
    }
}
