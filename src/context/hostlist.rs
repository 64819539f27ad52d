// src/context/hostlist.rs

//! Expansion of the scheduler's compressed host list syntax.
//!
//! `nid[001-003,007],login1` expands to
//! `nid001 nid002 nid003 nid007 login1`. Several bracket groups in one entry
//! expand as a cartesian product (`r[1-2]n[1-2]` gives four hosts). Zero
//! padding of the lower bound is kept.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, VoidjobError};

/// Upper bound on the number of host names a single expression may expand to.
pub const MAX_HOSTS: usize = 1 << 16;

/// Node list of a job: the raw scheduler string plus its expansion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeList {
    raw: String,
    hosts: Vec<String>,
}

impl NodeList {
    pub fn parse(raw: &str) -> Result<Self> {
        let hosts = expand(raw).map_err(|reason| VoidjobError::NodeListError {
            input: raw.to_string(),
            reason,
        })?;
        Ok(Self {
            raw: raw.trim().to_string(),
            hosts,
        })
    }

    /// A node list whose expression could not be expanded; only the raw
    /// string is kept.
    pub fn unexpanded(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            hosts: Vec::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl FromStr for NodeList {
    type Err = VoidjobError;

    fn from_str(s: &str) -> Result<Self> {
        NodeList::parse(s)
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn expand(input: &str) -> std::result::Result<Vec<String>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut hosts = Vec::new();
    for entry in split_top_level(input)? {
        if entry.is_empty() {
            return Err("empty host entry".to_string());
        }
        expand_entry(entry, &mut hosts)?;
        if hosts.len() > MAX_HOSTS {
            return Err(format!("expands to more than {MAX_HOSTS} hosts"));
        }
    }
    Ok(hosts)
}

/// Split on commas that are not inside brackets.
fn split_top_level(input: &str) -> std::result::Result<Vec<&str>, String> {
    let mut entries = Vec::new();
    let mut in_brackets = false;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '[' if in_brackets => return Err("nested '['".to_string()),
            '[' => in_brackets = true,
            ']' if !in_brackets => return Err("unmatched ']'".to_string()),
            ']' => in_brackets = false,
            ',' if !in_brackets => {
                entries.push(input[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_brackets {
        return Err("unterminated '['".to_string());
    }
    entries.push(input[start..].trim());
    Ok(entries)
}

fn expand_entry(entry: &str, hosts: &mut Vec<String>) -> std::result::Result<(), String> {
    let mut partial = vec![String::new()];
    let mut rest = entry;

    while let Some(open) = rest.find('[') {
        let literal = &rest[..open];
        let close = rest[open..]
            .find(']')
            .map(|offset| open + offset)
            .ok_or_else(|| "unterminated '['".to_string())?;
        let choices = expand_ranges(&rest[open + 1..close])?;

        if partial.len().saturating_mul(choices.len()) > MAX_HOSTS {
            return Err(format!("expands to more than {MAX_HOSTS} hosts"));
        }

        let mut next = Vec::with_capacity(partial.len() * choices.len());
        for prefix in &partial {
            for choice in &choices {
                next.push(format!("{prefix}{literal}{choice}"));
            }
        }
        partial = next;
        rest = &rest[close + 1..];
    }

    for host in partial.iter_mut() {
        host.push_str(rest);
    }
    hosts.extend(partial);
    Ok(())
}

fn expand_ranges(body: &str) -> std::result::Result<Vec<String>, String> {
    if body.trim().is_empty() {
        return Err("empty brackets".to_string());
    }

    let mut values = Vec::new();
    for part in body.split(',') {
        let part = part.trim();
        let (lo, hi) = part.split_once('-').unwrap_or((part, part));
        let width = lo.len();
        let lo_n = parse_index(lo)?;
        let hi_n = parse_index(hi)?;

        if lo_n > hi_n {
            return Err(format!("descending range '{part}'"));
        }
        if hi_n - lo_n >= MAX_HOSTS as u64 {
            return Err(format!("range '{part}' is too large"));
        }

        for n in lo_n..=hi_n {
            values.push(format!("{n:0width$}"));
        }
    }
    Ok(values)
}

fn parse_index(s: &str) -> std::result::Result<u64, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{s}' is not a node index"));
    }
    s.parse().map_err(|e| format!("node index '{s}': {e}"))
}
