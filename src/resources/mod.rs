// src/resources/mod.rs

//! Resource reservation declared to the workload manager.
//!
//! - [`memory`] parses memory ceilings (`200G`).
//! - [`wall_clock`] parses time limits in the scheduler's formats.
//! - [`notification`] models the `--mail-type` policy.
//!
//! [`declare_resources`] turns a [`ResourceRequest`] into the scheduler
//! directives that reserve it. It is a pure function of the request: the same
//! request always yields the same directives.

pub mod memory;
pub mod notification;
pub mod wall_clock;

use std::fmt;
use std::num::NonZeroU32;

pub use memory::{MemoryQuantity, MemoryUnit};
pub use notification::{MailEvent, NotificationPolicy};
pub use wall_clock::WallClock;

/// What the job asks the workload manager for.
///
/// Built once from the config and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub memory_limit: MemoryQuantity,
    pub wall_clock_limit: WallClock,
    pub task_count: NonZeroU32,
    pub notification_policy: NotificationPolicy,
    /// Address notifications are sent to; the scheduler defaults to the
    /// submitting user when unset.
    pub notify_user: Option<String>,
}

/// A single `#SBATCH --flag=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub flag: &'static str,
    pub value: String,
}

impl Directive {
    pub fn new(flag: &'static str, value: impl Into<String>) -> Self {
        Self {
            flag,
            value: value.into(),
        }
    }

    /// The line as it appears in a batch script header.
    pub fn header_line(&self) -> String {
        format!("#SBATCH {self}")
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}={}", self.flag, self.value)
    }
}

/// Directives that reserve `request`.
pub fn declare_resources(request: &ResourceRequest) -> Vec<Directive> {
    let mut directives = vec![
        Directive::new("mem", request.memory_limit.to_string()),
        Directive::new("time", request.wall_clock_limit.to_string()),
        Directive::new("ntasks", request.task_count.to_string()),
        Directive::new("mail-type", request.notification_policy.to_string()),
    ];

    if let Some(ref user) = request.notify_user {
        directives.push(Directive::new("mail-user", user.clone()));
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ResourceRequest {
        ResourceRequest {
            memory_limit: "200G".parse().unwrap(),
            wall_clock_limit: "01:00:00".parse().unwrap(),
            task_count: NonZeroU32::new(1).unwrap(),
            notification_policy: "all".parse().unwrap(),
            notify_user: None,
        }
    }

    #[test]
    fn declares_memory_time_tasks_and_mail() {
        let lines: Vec<String> = declare_resources(&request())
            .iter()
            .map(Directive::header_line)
            .collect();

        assert_eq!(
            lines,
            vec![
                "#SBATCH --mem=200G",
                "#SBATCH --time=01:00:00",
                "#SBATCH --ntasks=1",
                "#SBATCH --mail-type=ALL",
            ]
        );
    }

    #[test]
    fn mail_user_is_only_declared_when_set() {
        let mut req = request();
        req.notify_user = Some("someone@example.org".to_string());

        let directives = declare_resources(&req);
        assert_eq!(directives.len(), 5);
        assert_eq!(directives[4].to_string(), "--mail-user=someone@example.org");
    }
}
