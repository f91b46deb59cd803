use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{PostbookError, Result};
use crate::importer::parse_date;
use crate::models::TransactionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostedStatus {
    #[default]
    All,
    Posted,
    Unposted,
}

impl PostedStatus {
    fn admits(&self, posted: bool) -> bool {
        match self {
            Self::All => true,
            Self::Posted => posted,
            Self::Unposted => !posted,
        }
    }
}

impl FromStr for PostedStatus {
    type Err = PostbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "posted" => Ok(Self::Posted),
            "unposted" => Ok(Self::Unposted),
            other => Err(PostbookError::Filter(format!(
                "unknown posted status '{other}' (use all, posted or unposted)"
            ))),
        }
    }
}

/// Independent constraints, ANDed together. `None` means unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// Inclusive on both ends.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    pub posted: PostedStatus,
}

impl FilterSpec {
    /// Build a filter from user-entered text.
    pub fn from_inputs(
        from: Option<&str>,
        to: Option<&str>,
        name: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self> {
        let date_range = match (from, to) {
            (None, None) => None,
            (Some(start), Some(end)) => Some((parse_bound(start)?, parse_bound(end)?)),
            _ => {
                return Err(PostbookError::Filter(
                    "a date range needs both a start and an end date".to_string(),
                ))
            }
        };
        let name_contains = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let posted = match status {
            Some(s) => s.parse()?,
            None => PostedStatus::All,
        };
        let spec = FilterSpec {
            date_range,
            name_contains,
            posted,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((start, end)) = self.date_range {
            if end < start {
                return Err(PostbookError::Filter(format!(
                    "end date {end} is before start date {start}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.name_contains.is_none() && self.posted == PostedStatus::All
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            if record.date < start || record.date > end {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !record.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        self.posted.admits(record.posted)
    }
}

fn parse_bound(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| PostbookError::Filter(format!("could not parse date '{raw}'")))
}

/// The records satisfying every constraint in `spec`, in input order.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Result<Vec<TransactionRecord>>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    spec.validate()?;
    Ok(records
        .into_iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect())
}
