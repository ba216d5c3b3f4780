//! Client-side ordering of the alert list.

use std::cmp::{Ordering, Reverse};

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::alerts::{Alert, SortKey};

/// Rank lookup for severity labels; lower ranks sort first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeverityRanks {
    ranks: Vec<(String, u8)>,
    unranked: u8,
}

impl Default for SeverityRanks {
    fn default() -> Self {
        Self::new(
            [("Critical", 0), ("High", 1), ("Medium", 2), ("Low", 3)],
            4,
        )
    }
}

impl SeverityRanks {
    pub fn new<'a>(ranks: impl IntoIterator<Item = (&'a str, u8)>, unranked: u8) -> Self {
        Self {
            ranks: ranks
                .into_iter()
                .map(|(label, rank)| (label.to_string(), rank))
                .collect(),
            unranked,
        }
    }

    /// Rank for a label; unknown and empty labels share the unranked slot.
    pub fn rank(&self, severity: &str) -> u8 {
        self.ranks
            .iter()
            .find(|(label, _)| label == severity)
            .map(|(_, rank)| *rank)
            .unwrap_or(self.unranked)
    }
}

/// Pure ordering of alerts by a [`SortKey`].
///
/// Every ordering is stable: alerts with equal keys keep their input order.
#[derive(Clone, Debug, Default)]
pub struct SortEngine {
    severity_ranks: SeverityRanks,
}

impl SortEngine {
    pub fn new(severity_ranks: SeverityRanks) -> Self {
        Self { severity_ranks }
    }

    pub fn severity_ranks(&self) -> &SeverityRanks {
        &self.severity_ranks
    }

    /// Return a newly ordered view over `alerts`; the input is left untouched.
    pub fn sort<'a>(&self, alerts: &'a [Alert], key: SortKey) -> Vec<&'a Alert> {
        match key {
            SortKey::PublishedDate => {
                let mut keyed: Vec<_> = alerts
                    .iter()
                    .map(|alert| (Reverse(published_timestamp(&alert.published_date)), alert))
                    .collect();
                keyed.sort_by_key(|(stamp, _)| *stamp);
                keyed.into_iter().map(|(_, alert)| alert).collect()
            }
            SortKey::Severity => {
                let mut keyed: Vec<_> = alerts
                    .iter()
                    .map(|alert| (self.severity_ranks.rank(&alert.severity), alert))
                    .collect();
                keyed.sort_by_key(|(rank, _)| *rank);
                keyed.into_iter().map(|(_, alert)| alert).collect()
            }
            SortKey::EffectiveDate => {
                let mut sorted: Vec<&Alert> = alerts.iter().collect();
                sorted.sort_by(|a, b| compare_effective(&a.effective_date, &b.effective_date));
                sorted
            }
        }
    }
}

/// Order with the default severity table.
pub fn sort_alerts(alerts: &[Alert], key: SortKey) -> Vec<&Alert> {
    SortEngine::default().sort(alerts, key)
}

// Dated alerts first, then plain string order.
fn compare_effective(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

/// Milliseconds since the Unix epoch, or 0 when the value is empty or unparseable.
pub fn published_timestamp(value: &str) -> i64 {
    parse_published(value.trim())
        .map(|stamp| (stamp.unix_timestamp_nanos() / 1_000_000) as i64)
        .unwrap_or(0)
}

/// Parse the date formats feeds and the backend produce.
pub(crate) fn parse_published(value: &str) -> Option<OffsetDateTime> {
    if value.is_empty() {
        return None;
    }
    if let Ok(stamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(stamp);
    }
    if let Ok(stamp) = OffsetDateTime::parse(value, &Rfc2822) {
        return Some(stamp);
    }
    if let Some(prefix) = value
        .strip_suffix(" GMT")
        .or_else(|| value.strip_suffix(" UTC"))
        .or_else(|| value.strip_suffix(" UT"))
        && let Ok(stamp) = OffsetDateTime::parse(&format!("{prefix} +0000"), &Rfc2822)
    {
        return Some(stamp);
    }
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let naive_spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let head = value.get(..19).unwrap_or(value);
    if let Ok(stamp) = PrimitiveDateTime::parse(head, naive)
        .or_else(|_| PrimitiveDateTime::parse(head, naive_spaced))
    {
        return Some(stamp.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(value, date_only)
        .ok()
        .map(|date| date.midnight().assume_utc())
}
