//! Spark scheduler: today's suggested outreach tasks.
//!
//! The task list is ephemeral. Each refresh rebuilds it from the ranking
//! service and replaces it in one step; completion flips the local flag
//! first and acknowledges to the server afterwards.
//!
//! State machine per task:
//!
//!   PENDING ──complete──> COMPLETED
//!
//! There is no way back. A failed acknowledgement does not undo the flip.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::SparkError;
use crate::gateway::{segment, Method, SyncGateway};
use crate::ranking::{RankedSuggestion, RankingClient};

/// A suggested outreach action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparkTask {
    /// Contact id as text for server tasks; a UUID for local placeholders.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkStatus {
    Pending,
    Completed,
}

impl SparkTask {
    pub fn from_ranked(ranked: RankedSuggestion) -> Self {
        Self {
            id: ranked.contact_id.to_string(),
            name: ranked.suggestion.text,
            is_completed: false,
            suggestion_id: ranked.suggestion.task_id,
        }
    }

    /// A locally seeded task not backed by any contact.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_completed: false,
            suggestion_id: None,
        }
    }

    pub fn status(&self) -> SparkStatus {
        if self.is_completed {
            SparkStatus::Completed
        } else {
            SparkStatus::Pending
        }
    }
}

/// Acknowledgement body posted when a spark is completed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkCompletion {
    pub when_interacted: DateTime<Utc>,
    pub success: bool,
}

impl SparkCompletion {
    pub fn now() -> Self {
        Self {
            when_interacted: Utc::now(),
            success: true,
        }
    }
}

enum Toggle {
    Missing,
    AlreadyCompleted,
    Flipped,
}

pub struct SparkScheduler {
    ranking: RankingClient,
    gateway: SyncGateway,
    user_id: String,
    state: watch::Sender<Vec<SparkTask>>,
    /// Generation handed to the most recently started refresh.
    started: AtomicU64,
    /// Generation of the refresh whose result the list currently holds.
    installed: AtomicU64,
}

impl SparkScheduler {
    pub fn new(gateway: SyncGateway, user_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            ranking: RankingClient::new(gateway.clone()),
            gateway,
            user_id: user_id.into(),
            state,
            started: AtomicU64::new(0),
            installed: AtomicU64::new(0),
        }
    }

    /// Receiver notified whenever the task list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<SparkTask>> {
        self.state.subscribe()
    }

    /// Snapshot of the current task list.
    pub fn tasks(&self) -> Vec<SparkTask> {
        self.state.borrow().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .borrow()
            .iter()
            .filter(|t| t.status() == SparkStatus::Pending)
            .count()
    }

    /// Rebuild the task list from the ranking service.
    ///
    /// Returns the number of tasks produced (at most `n`). If phase 1 fails
    /// the list is cleared and the error returned. If a refresh started
    /// later has already installed its result, this one leaves the list
    /// alone and returns [`SparkError::Superseded`]. A later refresh that is
    /// dropped before resolving does not supersede anything.
    pub async fn refresh(&self, n: usize) -> Result<usize, SparkError> {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.ranking.fetch_ranked(&self.user_id, n).await;

        let (tasks, outcome) = match result {
            Ok(ranked) => {
                let tasks: Vec<SparkTask> = ranked.into_iter().map(SparkTask::from_ranked).collect();
                let count = tasks.len();
                (tasks, Ok(count))
            }
            Err(e) => (Vec::new(), Err(SparkError::from(e))),
        };

        // Compared and swapped under the channel lock: an older result never
        // replaces a newer installed one.
        let mut current = false;
        self.state.send_if_modified(|list| {
            current = generation > self.installed.load(Ordering::SeqCst);
            if current {
                self.installed.store(generation, Ordering::SeqCst);
                *list = tasks;
            }
            current
        });

        if !current {
            tracing::debug!(generation, "discarding superseded refresh");
            return Err(SparkError::Superseded);
        }
        match &outcome {
            Ok(count) => tracing::info!(count, requested = n, "sparks refreshed"),
            Err(e) => tracing::warn!(error = %e, "spark refresh failed; task list cleared"),
        }
        outcome
    }

    /// Mark a task completed and acknowledge it to the server.
    ///
    /// The local flag flips before the request is sent and stays flipped
    /// whatever the outcome. Acknowledgement failures are logged only.
    pub async fn complete(&self, task_id: &str) -> Result<(), SparkError> {
        let mut toggle = Toggle::Missing;
        self.state.send_if_modified(|tasks| {
            match tasks.iter_mut().find(|t| t.id == task_id) {
                None => false,
                Some(task) if task.is_completed => {
                    toggle = Toggle::AlreadyCompleted;
                    false
                }
                Some(task) => {
                    task.is_completed = true;
                    toggle = Toggle::Flipped;
                    true
                }
            }
        });

        match toggle {
            Toggle::Missing => return Err(SparkError::TaskNotFound(task_id.to_string())),
            Toggle::AlreadyCompleted => return Ok(()),
            Toggle::Flipped => {}
        }

        let path = format!(
            "/create/spark/{}/{}",
            segment(&self.user_id),
            segment(task_id)
        );
        let ack = SparkCompletion::now();
        if let Err(e) = self.gateway.send(Method::POST, &path, Some(&ack)).await {
            tracing::warn!(task_id, error = %e, "spark completion not acknowledged");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NoAuth;
    use crate::ranking::Suggestion;
    use std::sync::Arc;

    fn offline_scheduler() -> SparkScheduler {
        let gateway = SyncGateway::new("http://127.0.0.1:9/api", Arc::new(NoAuth)).unwrap();
        SparkScheduler::new(gateway, "1")
    }

    #[test]
    fn ranked_task_uses_contact_id() {
        let task = SparkTask::from_ranked(RankedSuggestion {
            contact_id: 42,
            suggestion: Suggestion {
                text: "Ask about the trip".into(),
                task_id: Some("t-9".into()),
            },
        });
        assert_eq!(task.id, "42");
        assert_eq!(task.name, "Ask about the trip");
        assert_eq!(task.status(), SparkStatus::Pending);
        assert_eq!(task.suggestion_id.as_deref(), Some("t-9"));
    }

    #[test]
    fn placeholders_get_unique_ids() {
        let a = SparkTask::placeholder("Say hi");
        let b = SparkTask::placeholder("Say hi");
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert!(!a.is_completed);
    }

    #[test]
    fn completion_wire_shape() {
        let value = serde_json::to_value(SparkCompletion::now()).unwrap();
        assert_eq!(value["success"], true);
        let stamp = value["whenInteracted"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn completing_unknown_task_is_an_error() {
        let scheduler = offline_scheduler();
        let err = scheduler.complete("nope").await.unwrap_err();
        assert!(matches!(err, SparkError::TaskNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn failed_phase_one_clears_list() {
        let scheduler = offline_scheduler();
        scheduler
            .state
            .send_replace(vec![SparkTask::placeholder("stale")]);

        let err = scheduler.refresh(3).await.unwrap_err();
        assert!(matches!(err, SparkError::Ranking(_)));
        assert!(scheduler.tasks().is_empty());
    }

    #[tokio::test]
    async fn completion_flips_even_when_ack_cannot_be_sent() {
        let scheduler = offline_scheduler();
        let task = SparkTask::placeholder("Send a postcard");
        scheduler.state.send_replace(vec![task.clone()]);

        scheduler.complete(&task.id).await.unwrap();

        assert!(scheduler.tasks()[0].is_completed);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
