use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who a timer session belongs to. Anonymous runs form their own partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    User(String),
    Anonymous,
}

impl Identity {
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(user) if !user.is_empty() => Identity::User(user.to_string()),
            _ => Identity::Anonymous,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::User(id) => Some(id),
            Identity::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    pub id: i64,
    pub identity: Identity,
    pub duration: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TimerSession {
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration)
    }

    pub fn summary(&self) -> TimerSessionSummary {
        TimerSessionSummary {
            id: self.id,
            duration: self.duration,
            formatted_duration: self.formatted_duration(),
            created_at: self.created_at.to_rfc3339(),
            completed: self.completed,
        }
    }

    pub fn list_entry(&self) -> TimerSessionListEntry {
        TimerSessionListEntry {
            id: self.id,
            duration: self.duration,
            formatted_duration: self.formatted_duration(),
            created_at: self.created_at.to_rfc3339(),
            date: self.created_at.format("%a, %d %b").to_string(),
            time: self.created_at.format("%H:%M").to_string(),
            completed: self.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimerSessionSummary {
    pub id: i64,
    pub duration: u32,
    pub formatted_duration: String,
    pub created_at: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct TimerSessionListEntry {
    pub id: i64,
    pub duration: u32,
    pub formatted_duration: String,
    pub created_at: String,
    pub date: String,
    pub time: String,
    pub completed: bool,
}

/// Renders seconds as `1h 2m 5s`, `2m 5s` or `45s`.
pub fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
