//! Entities reported by the news-analysis pipeline.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Sentiment label attached to an article.
///
/// Labels are matched case-sensitively. Anything outside the three known
/// labels is carried through unchanged as [`Sentiment::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
    Other(String),
}

impl Sentiment {
    pub fn label(&self) -> &str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Positive" => Self::Positive,
            "Neutral" => Self::Neutral,
            "Negative" => Self::Negative,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A summarized, sentiment-scored article.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment: Sentiment,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Publication timestamp exactly as the pipeline sent it.
    #[serde(deserialize_with = "null_as_default")]
    pub publish_date: String,
}

/// Labels shown first, in this order, by [`SentimentDistribution::ordered`].
const DISPLAY_ORDER: [&str; 3] = ["Positive", "Neutral", "Negative"];

/// Article count per sentiment label. Absent labels count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentDistribution(BTreeMap<String, u64>);

impl SentimentDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Fraction of the total carried by `label`, 0.0 when the total is zero.
    pub fn share(&self, label: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / total as f64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Entries with the known labels first, then the rest alphabetically.
    pub fn ordered(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = DISPLAY_ORDER
            .iter()
            .filter_map(|label| self.0.get(*label).map(|count| (*label, *count)))
            .collect();
        entries.extend(
            self.iter()
                .filter(|(label, _)| !DISPLAY_ORDER.iter().any(|known| known == label)),
        );
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for SentimentDistribution {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(label, count)| (label.into(), count)).collect())
    }
}

/// Terminal payload of a streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_distribution: SentimentDistribution,
    /// Failure note the pipeline attaches when its own run went wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of the non-streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(flatten)]
    pub result: SessionResult,
}

/// A `null` member reads the same as a missing one.
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
    fn sentiment_labels_are_case_sensitive() {
        assert_eq!(Sentiment::from("Positive"), Sentiment::Positive);
        assert_eq!(
            Sentiment::from("positive"),
            Sentiment::Other("positive".to_string())
        );
    }

    #[test]
    fn unknown_sentiment_round_trips_as_string() {
        let article: Article =
            serde_json::from_str(r#"{"headline":"H","sentiment":"Mixed"}"#).unwrap();
        assert_eq!(article.sentiment, Sentiment::Other("Mixed".into()));
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["sentiment"], "Mixed");
    }

    #[test]
    fn article_missing_fields_default() {
        let article: Article = serde_json::from_str(r#"{"headline":"Only"}"#).unwrap();
        assert_eq!(article.headline, "Only");
        assert!(article.summary.is_empty());
        assert!(article.publish_date.is_empty());
        assert_eq!(article.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn article_null_fields_default() {
        let article: Article = serde_json::from_str(
            r#"{"headline":"H","summary":null,"sentiment":null,"source":null,"url":null,"publish_date":null}"#,
        )
        .unwrap();
        assert_eq!(article.headline, "H");
        assert!(article.summary.is_empty());
        assert!(article.source.is_empty());
        assert!(article.url.is_empty());
        assert!(article.publish_date.is_empty());
        assert_eq!(article.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn session_result_null_members_default() {
        let result: SessionResult = serde_json::from_str(
            r#"{"articles":null,"sentiment_distribution":null,"error":null}"#,
        )
        .unwrap();
        assert_eq!(result, SessionResult::default());

        let report: NewsReport =
            serde_json::from_str(r#"{"topic":null,"articles":[]}"#).unwrap();
        assert!(report.topic.is_empty());
    }

    #[test]
    fn distribution_absent_label_is_zero() {
        let dist: SentimentDistribution = [("Positive", 3)].into_iter().collect();
        assert_eq!(dist.count("Positive"), 3);
        assert_eq!(dist.count("Negative"), 0);
        assert_eq!(dist.total(), 3);
        assert!((dist.share("Positive") - 1.0).abs() < f64::EPSILON);
        assert_eq!(SentimentDistribution::new().share("Positive"), 0.0);
    }

    #[test]
    fn distribution_orders_known_labels_first() {
        let dist: SentimentDistribution = [
            ("Alarmed", 1),
            ("Negative", 2),
            ("Positive", 4),
            ("Bored", 1),
        ]
        .into_iter()
        .collect();
        let labels: Vec<&str> = dist.ordered().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Positive", "Negative", "Alarmed", "Bored"]);
    }

    #[test]
    fn distribution_rejects_negative_counts() {
        let parsed: Result<SentimentDistribution, _> = serde_json::from_str(r#"{"Positive":-1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn news_report_reads_flattened_shape() {
        let report: NewsReport = serde_json::from_str(
            r#"{"topic":"AI","articles":[{"headline":"A"}],"sentiment_distribution":{"Neutral":1}}"#,
        )
        .unwrap();
        assert_eq!(report.topic, "AI");
        assert_eq!(report.result.articles.len(), 1);
        assert_eq!(report.result.sentiment_distribution.count("Neutral"), 1);
        assert!(report.result.error.is_none());
    }
}
