use super::backend::{SubmissionBackend, SubmissionReceipt};
use super::messages::{ChallengeSubmission, SubmissionAck};
use anyhow::{Context, Result};
use async_nats::Client;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

/// Submits challenges over NATS request/reply
pub struct NatsSubmissionBackend {
    client: Client,
    subject_prefix: String,
    timeout: Duration,
}

impl NatsSubmissionBackend {
    /// Connect to NATS server
    pub async fn connect(url: &str, subject_prefix: String, timeout: Duration) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix,
            timeout,
        })
    }

    pub fn subject_for(&self, challenge_id: &str) -> String {
        format!("{}.{}", self.subject_prefix, challenge_id)
    }
}

#[async_trait::async_trait]
impl SubmissionBackend for NatsSubmissionBackend {
    async fn submit(&self, submission: ChallengeSubmission) -> Result<SubmissionReceipt> {
        let subject = self.subject_for(&submission.challenge_id);
        let payload = serde_json::to_vec(&submission)?;

        info!(
            "Submitting {} to {} ({} bytes)",
            submission.challenge_id,
            subject,
            payload.len()
        );

        let reply = tokio::time::timeout(self.timeout, self.client.request(subject, payload.into()))
            .await
            .context("Submission timed out")?
            .context("Submission request failed")?;

        let ack: SubmissionAck =
            serde_json::from_slice(&reply.payload).context("Malformed submission reply")?;
        let message = interpret_ack(&submission.challenge_id, ack)?;

        info!("Submission {} accepted", submission.challenge_id);

        Ok(SubmissionReceipt {
            challenge_id: submission.challenge_id,
            accepted_at: Utc::now(),
            message,
        })
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// Turn a backend reply into the receipt note, or an error when rejected
pub fn interpret_ack(challenge_id: &str, ack: SubmissionAck) -> Result<Option<String>> {
    if !ack.accepted {
        let reason = ack
            .message
            .unwrap_or_else(|| "Submission was rejected".to_string());
        warn!("Submission {} rejected: {}", challenge_id, reason);
        anyhow::bail!(reason);
    }

    if ack.challenge_id != challenge_id {
        warn!(
            "Reply acknowledged {} while submitting {}",
            ack.challenge_id, challenge_id
        );
    }

    Ok(ack.message)
}
