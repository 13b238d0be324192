//! The record of a finished study session, as handed to score persistence.
use super::{Response, StudySession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub deck_id: String,
    /// `None` for anonymous study.
    pub user_id: Option<String>,
    pub percentage: u32,
    pub correct: usize,
    pub total: usize,
    pub completed_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub responses: BTreeMap<String, Response>,
}

impl AttemptRecord {
    /// Builds the record of a completed session. Returns `None` while the
    /// session is still in progress.
    pub fn from_session(session: &StudySession, user_id: Option<&str>) -> Option<Self> {
        let completed_at = session.completed_at()?;
        let stats = session.stats_at(completed_at);
        Some(Self {
            deck_id: session.deck().id.clone(),
            user_id: user_id.map(str::to_string),
            percentage: stats.percentage,
            correct: stats.correct,
            total: stats.total,
            completed_at,
            elapsed_ms: stats.elapsed.num_milliseconds(),
            responses: session
                .responses()
                .map(|(id, response)| (id.to_string(), response))
                .collect(),
        })
    }
}
