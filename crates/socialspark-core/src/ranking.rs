//! Ranking client: two-phase fetch of today's highest-priority contacts.
//!
//! Phase 1 returns rank-ordered contact ids; phase 2 resolves each id to
//! suggestion text. A contact is only produced when both phases succeed for it.

use futures::future::join_all;
use serde::Deserialize;

use crate::error::RankingError;
use crate::gateway::{segment, SyncGateway};

/// Shapes the suggestion endpoint has been seen to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionWire {
    Text(String),
    /// `[suggestionText, taskId]`
    Pair(Vec<String>),
}

/// Suggestion text for one contact, normalized from either wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SuggestionWire")]
pub struct Suggestion {
    pub text: String,
    /// Server-side task id, when the response carried one.
    pub task_id: Option<String>,
}

impl TryFrom<SuggestionWire> for Suggestion {
    type Error = String;

    fn try_from(wire: SuggestionWire) -> Result<Self, Self::Error> {
        match wire {
            SuggestionWire::Text(text) => Ok(Suggestion {
                text,
                task_id: None,
            }),
            SuggestionWire::Pair(parts) => {
                let mut parts = parts.into_iter();
                let text = parts
                    .next()
                    .ok_or_else(|| "suggestion array is empty".to_string())?;
                Ok(Suggestion {
                    text,
                    task_id: parts.next(),
                })
            }
        }
    }
}

/// A contact that survived both phases, in rank position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSuggestion {
    pub contact_id: i64,
    pub suggestion: Suggestion,
}

#[derive(Debug, Clone)]
pub struct RankingClient {
    gateway: SyncGateway,
}

impl RankingClient {
    pub fn new(gateway: SyncGateway) -> Self {
        Self { gateway }
    }

    /// Phase 1: rank-ordered contact ids, index 0 highest priority.
    ///
    /// Never returns more than `n` ids.
    pub async fn fetch_top_n(&self, user_id: &str, n: usize) -> Result<Vec<i64>, RankingError> {
        let path = format!("/get/get-top-n/{}/{}", segment(user_id), n);
        let mut ids: Vec<i64> = self.gateway.get(&path).await?;
        if ids.len() > n {
            tracing::debug!(returned = ids.len(), n, "top-n response longer than requested");
            ids.truncate(n);
        }
        Ok(ids)
    }

    /// Phase 2: suggestion text for one contact.
    pub async fn fetch_suggestion(
        &self,
        user_id: &str,
        contact_id: i64,
    ) -> Result<Suggestion, RankingError> {
        let path = format!("/get/daily_suggestion/{}/{}", segment(user_id), contact_id);
        Ok(self.gateway.get(&path).await?)
    }

    /// Both phases. Phase-2 fetches run concurrently; ids whose fetch fails
    /// are logged and dropped. Output keeps phase-1 order.
    pub async fn fetch_ranked(
        &self,
        user_id: &str,
        n: usize,
    ) -> Result<Vec<RankedSuggestion>, RankingError> {
        let ids = self.fetch_top_n(user_id, n).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetches = ids.iter().map(|&contact_id| async move {
            (contact_id, self.fetch_suggestion(user_id, contact_id).await)
        });
        let results = join_all(fetches).await;

        Ok(collect_ranked(results))
    }
}

/// Keep successful phase-2 results in the order given.
fn collect_ranked(
    results: Vec<(i64, Result<Suggestion, RankingError>)>,
) -> Vec<RankedSuggestion> {
    results
        .into_iter()
        .filter_map(|(contact_id, result)| match result {
            Ok(suggestion) => Some(RankedSuggestion {
                contact_id,
                suggestion,
            }),
            Err(e) => {
                tracing::warn!(contact_id, error = %e, "dropping contact without suggestion");
                None
            }
        })
        .collect()
}
