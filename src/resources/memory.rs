// src/resources/memory.rs

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, VoidjobError};

static MEMORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*([kmgt])?(i?b)?\s*$").expect("memory pattern compiles")
});

/// Unit suffix understood by the workload manager's `--mem` option.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemoryUnit {
    Kibi,
    Mebi,
    Gibi,
    Tebi,
}

impl MemoryUnit {
    fn suffix(self) -> char {
        match self {
            MemoryUnit::Kibi => 'K',
            MemoryUnit::Mebi => 'M',
            MemoryUnit::Gibi => 'G',
            MemoryUnit::Tebi => 'T',
        }
    }

    fn kibibytes(self) -> u64 {
        match self {
            MemoryUnit::Kibi => 1,
            MemoryUnit::Mebi => 1 << 10,
            MemoryUnit::Gibi => 1 << 20,
            MemoryUnit::Tebi => 1 << 30,
        }
    }
}

/// A memory ceiling such as `200G`.
///
/// Accepts `200G`, `200GB`, `200GiB` and `200 g` alike; a bare number is in
/// megabytes, which is the scheduler's default unit. The quantity keeps the
/// unit it was written in so the rendered directive reads like the config.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryQuantity {
    value: u64,
    unit: MemoryUnit,
}

impl MemoryQuantity {
    pub fn new(value: u64, unit: MemoryUnit) -> Result<Self> {
        if value == 0 {
            return Err(VoidjobError::ResourceError(
                "memory limit must be greater than zero".to_string(),
            ));
        }
        value.checked_mul(unit.kibibytes()).ok_or_else(|| {
            VoidjobError::ResourceError(format!("memory limit {value}{} overflows", unit.suffix()))
        })?;
        Ok(Self { value, unit })
    }

    pub fn unit(&self) -> MemoryUnit {
        self.unit
    }

    pub fn as_kibibytes(&self) -> u64 {
        self.value * self.unit.kibibytes()
    }
}

impl FromStr for MemoryQuantity {
    type Err = VoidjobError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = MEMORY_RE.captures(s).ok_or_else(|| {
            VoidjobError::ResourceError(format!(
                "cannot parse memory limit '{s}'; expected e.g. '200G' or '512M'"
            ))
        })?;

        let value: u64 = caps[1].parse().map_err(|e| {
            VoidjobError::ResourceError(format!("memory value in '{s}' is out of range: {e}"))
        })?;

        let unit = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
            None => MemoryUnit::Mebi,
            Some(u) if u == "K" => MemoryUnit::Kibi,
            Some(u) if u == "M" => MemoryUnit::Mebi,
            Some(u) if u == "G" => MemoryUnit::Gibi,
            Some(_) => MemoryUnit::Tebi,
        };

        if caps.get(2).is_none() && caps.get(3).is_some() {
            return Err(VoidjobError::ResourceError(format!(
                "memory limit '{s}' has a byte suffix without a unit"
            )));
        }

        MemoryQuantity::new(value, unit)
    }
}

impl fmt::Display for MemoryQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
