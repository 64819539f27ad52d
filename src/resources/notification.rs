// src/resources/notification.rs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, VoidjobError};

/// One event type the scheduler can send mail about (`--mail-type`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MailEvent {
    None,
    Begin,
    End,
    Fail,
    Requeue,
    All,
    InvalidDepend,
    StageOut,
    TimeLimit,
    TimeLimit90,
    TimeLimit80,
    TimeLimit50,
    ArrayTasks,
}

impl MailEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            MailEvent::None => "NONE",
            MailEvent::Begin => "BEGIN",
            MailEvent::End => "END",
            MailEvent::Fail => "FAIL",
            MailEvent::Requeue => "REQUEUE",
            MailEvent::All => "ALL",
            MailEvent::InvalidDepend => "INVALID_DEPEND",
            MailEvent::StageOut => "STAGE_OUT",
            MailEvent::TimeLimit => "TIME_LIMIT",
            MailEvent::TimeLimit90 => "TIME_LIMIT_90",
            MailEvent::TimeLimit80 => "TIME_LIMIT_80",
            MailEvent::TimeLimit50 => "TIME_LIMIT_50",
            MailEvent::ArrayTasks => "ARRAY_TASKS",
        }
    }
}

impl FromStr for MailEvent {
    type Err = VoidjobError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NONE" => Ok(MailEvent::None),
            "BEGIN" => Ok(MailEvent::Begin),
            "END" => Ok(MailEvent::End),
            "FAIL" | "FAILURE" => Ok(MailEvent::Fail),
            "REQUEUE" => Ok(MailEvent::Requeue),
            "ALL" => Ok(MailEvent::All),
            "INVALID_DEPEND" => Ok(MailEvent::InvalidDepend),
            "STAGE_OUT" => Ok(MailEvent::StageOut),
            "TIME_LIMIT" => Ok(MailEvent::TimeLimit),
            "TIME_LIMIT_90" => Ok(MailEvent::TimeLimit90),
            "TIME_LIMIT_80" => Ok(MailEvent::TimeLimit80),
            "TIME_LIMIT_50" => Ok(MailEvent::TimeLimit50),
            "ARRAY_TASKS" => Ok(MailEvent::ArrayTasks),
            other => Err(VoidjobError::ResourceError(format!(
                "unknown notification type '{other}'"
            ))),
        }
    }
}

/// Which job events trigger a notification, e.g. `"ALL"` or `"BEGIN,END"`.
///
/// `NONE` cannot be combined with anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPolicy {
    events: BTreeSet<MailEvent>,
}

impl NotificationPolicy {
    pub fn none() -> Self {
        Self {
            events: BTreeSet::from([MailEvent::None]),
        }
    }

    pub fn from_events(events: impl IntoIterator<Item = MailEvent>) -> Result<Self> {
        let events: BTreeSet<MailEvent> = events.into_iter().collect();
        if events.is_empty() {
            return Err(VoidjobError::ResourceError(
                "notification policy needs at least one event type".to_string(),
            ));
        }
        if events.contains(&MailEvent::None) && events.len() > 1 {
            return Err(VoidjobError::ResourceError(
                "notification type NONE cannot be combined with other types".to_string(),
            ));
        }
        Ok(Self { events })
    }

    pub fn is_none(&self) -> bool {
        self.events.contains(&MailEvent::None)
    }

    pub fn events(&self) -> impl Iterator<Item = MailEvent> + '_ {
        self.events.iter().copied()
    }
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl FromStr for NotificationPolicy {
    type Err = VoidjobError;

    fn from_str(s: &str) -> Result<Self> {
        let events = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(MailEvent::from_str)
            .collect::<Result<Vec<_>>>()?;
        NotificationPolicy::from_events(events)
    }
}

impl fmt::Display for NotificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.events().map(MailEvent::as_str).collect();
        write!(f, "{}", names.join(","))
    }
}
