//! 견적 단가 반영 이력을 남기는 감사 로그.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// 감사 로그 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ActivityEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: actor.into(),
            action: action.into(),
            description: description.into(),
            category: category.into(),
            metadata,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActivityLogError {
    #[error("감사 로그 기록 실패: {0}")]
    Io(#[from] std::io::Error),
    #[error("감사 로그 직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 감사 로그 기록 대상.
pub trait ActivityLog {
    fn log_activity(&self, entry: &ActivityEntry) -> Result<(), ActivityLogError>;
}

/// 한 줄에 JSON 한 건씩 파일 끝에 덧붙인다.
#[derive(Debug, Clone)]
pub struct JsonlActivityLog {
    path: PathBuf,
}

impl JsonlActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ActivityLog for JsonlActivityLog {
    fn log_activity(&self, entry: &ActivityEntry) -> Result<(), ActivityLogError> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// 파일 없이 tracing 이벤트로만 남긴다.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn log_activity(&self, entry: &ActivityEntry) -> Result<(), ActivityLogError> {
        tracing::info!(
            actor = %entry.actor,
            action = %entry.action,
            category = %entry.category,
            metadata = %entry.metadata,
            "{}",
            entry.description
        );
        Ok(())
    }
}
