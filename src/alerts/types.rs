use serde::{Deserialize, Deserializer, Serialize};

/// A regulatory notice as returned by the alerts backend.
///
/// Classification fields only carry meaning once `analysed` is true; callers
/// should branch on `analysed` rather than on the content of those fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feed_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_sectors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_items: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effective_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_entities: Vec<String>,

    #[serde(default)]
    pub analysed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// Optional constraints applied when listing alerts.
///
/// `None` leaves a dimension unconstrained. `Some("")` is a distinct value
/// and compares unequal to `None`, even though the query builder omits empty
/// parameters on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertFilters {
    pub feed_category: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub analysed: Option<bool>,
}

impl AlertFilters {
    /// Return a copy with the feed category constraint replaced.
    pub fn with_feed_category(&self, value: Option<String>) -> Self {
        Self {
            feed_category: value,
            ..self.clone()
        }
    }

    /// Return a copy with the category constraint replaced.
    pub fn with_category(&self, value: Option<String>) -> Self {
        Self {
            category: value,
            ..self.clone()
        }
    }

    /// Return a copy with the severity constraint replaced.
    pub fn with_severity(&self, value: Option<String>) -> Self {
        Self {
            severity: value,
            ..self.clone()
        }
    }

    /// Return a copy with the analysis status constraint replaced.
    pub fn with_analysed(&self, value: Option<bool>) -> Self {
        Self {
            analysed: value,
            ..self.clone()
        }
    }

    /// True when no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.feed_category.is_none()
            && self.category.is_none()
            && self.severity.is_none()
            && self.analysed.is_none()
    }

    /// Query parameters for the list endpoint, skipping absent and empty values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text = [
            ("feed_category", &self.feed_category),
            ("category", &self.category),
            ("severity", &self.severity),
        ];
        for (key, value) in text {
            if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(analysed) = self.analysed {
            pairs.push(("analysed", analysed.to_string()));
        }
        pairs
    }
}

/// Response body of the list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertsListResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCategoryCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub feed_category: String,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    pub count: u64,
}

/// Server-computed aggregate counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: u64,
    pub analysed: u64,
    pub pending: u64,
    #[serde(default)]
    pub by_feed_category: Vec<FeedCategoryCount>,
    #[serde(default)]
    pub by_severity: Vec<SeverityCount>,
    #[serde(default)]
    pub by_category: Vec<CategoryCount>,
}

impl AlertStats {
    /// Feed categories in server order, used as filter options.
    pub fn feed_categories(&self) -> Vec<&str> {
        self.by_feed_category
            .iter()
            .map(|entry| entry.feed_category.as_str())
            .collect()
    }

    /// Severities in server order, used as filter options.
    pub fn severities(&self) -> Vec<&str> {
        self.by_severity
            .iter()
            .map(|entry| entry.severity.as_str())
            .collect()
    }

    /// Categories in server order, used as filter options.
    pub fn categories(&self) -> Vec<&str> {
        self.by_category
            .iter()
            .map(|entry| entry.category.as_str())
            .collect()
    }
}

/// Outcome of a server-side feed ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    #[serde(default)]
    pub feeds_fetched: u64,
    #[serde(default)]
    pub entries_found: u64,
    #[serde(default)]
    pub new_alerts: u64,
    #[serde(default)]
    pub duplicates_skipped: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Outcome of a server-side classification batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyseResult {
    #[serde(default)]
    pub analysed_count: u64,
    #[serde(default)]
    pub analysed_ids: Vec<i64>,
}

/// Orderings offered by the alert list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PublishedDate,
    Severity,
    EffectiveDate,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [
        SortKey::PublishedDate,
        SortKey::Severity,
        SortKey::EffectiveDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PublishedDate => "Published Date",
            Self::Severity => "Severity",
            Self::EffectiveDate => "Effective Date",
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_filters_are_distinct_values() {
        let absent = AlertFilters::default();
        let empty = absent.with_severity(Some(String::new()));
        assert_ne!(absent, empty);
        assert!(absent.is_unconstrained());
        assert!(!empty.is_unconstrained());
    }

    #[test]
    fn query_pairs_skip_absent_and_empty_values() {
        let filters = AlertFilters {
            feed_category: Some("Notices".into()),
            category: Some(String::new()),
            severity: None,
            analysed: Some(false),
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("feed_category", "Notices".to_string()),
                ("analysed", "false".to_string()),
            ]
        );
    }

    #[test]
    fn builders_replace_one_dimension() {
        let filters = AlertFilters::default()
            .with_category(Some("AML".into()))
            .with_analysed(Some(true));
        let cleared = filters.with_category(None);
        assert_eq!(cleared.category, None);
        assert_eq!(cleared.analysed, Some(true));
        assert_eq!(filters.category.as_deref(), Some("AML"));
    }

    #[test]
    fn alert_decodes_nulls_and_missing_classification() {
        let body = r#"{
            "id": 7,
            "title": "Notice",
            "link": "https://example.test/7",
            "source": "GFSC",
            "feed_category": "Notices",
            "published_date": "Mon, 01 Jan 2024 10:00:00 +0000",
            "raw_content": "",
            "subcategories": null,
            "effective_date": null,
            "analysed": false,
            "created_at": "2024-01-01T10:00:00"
        }"#;
        let alert: Alert = serde_json::from_str(body).unwrap();
        assert_eq!(alert.id, 7);
        assert!(alert.subcategories.is_empty());
        assert_eq!(alert.effective_date, "");
        assert_eq!(alert.severity, "");
        assert!(!alert.analysed);
    }

    #[test]
    fn stats_expose_filter_options_in_server_order() {
        let stats: AlertStats = serde_json::from_str(
            r#"{
                "total": 3, "analysed": 1, "pending": 2,
                "by_feed_category": [{"feed_category": "Notices", "count": 2}, {"feed_category": "News", "count": 1}],
                "by_severity": [{"severity": "High", "count": 1}],
                "by_category": []
            }"#,
        )
        .unwrap();
        assert_eq!(stats.feed_categories(), vec!["Notices", "News"]);
        assert_eq!(stats.severities(), vec!["High"]);
        assert!(stats.categories().is_empty());
    }

    #[test]
    fn sort_key_uses_snake_case_names() {
        assert_eq!(
            serde_json::to_string(&SortKey::EffectiveDate).unwrap(),
            "\"effective_date\""
        );
        assert_eq!(SortKey::default(), SortKey::PublishedDate);
    }
}
