use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::document::TRIGGER_CHAR;

const DEFAULT_TAGS: &[&str] = &[
    "liver",
    "pain",
    "right",
    "left",
    "pancreas",
    "kidney",
    "brain",
    "severe_pain",
    "tumour",
    "cancer",
    "MRI",
    "CT",
    "male",
    "female",
    "bone",
    "shoulder",
    "hip",
    "XRAY",
    "knee",
    "spine",
    "head",
    "abdomen",
    "contrast",
    "fragment",
    "detached",
    "injury",
    "torn",
    "rotator",
    "cuff",
    "abdominal",
    "dilatation",
];

/// Ordered list of known tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<String>,
}

impl Vocabulary {
    /// Keeps the first occurrence of every tag and drops empty entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry.into();
            if entry.is_empty() || result.contains(&entry) {
                continue;
            }
            result.push(entry);
        }
        Self { entries: result }
    }

    /// One tag per line. Blank lines are ignored and a leading trigger is stripped.
    pub fn parse(content: &str) -> Self {
        Self::new(content.lines().map(|line| {
            let line = line.trim();
            line.strip_prefix(TRIGGER_CHAR).unwrap_or(line).trim().to_string()
        }))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read vocabulary {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_TAGS.iter().copied())
    }
}
