//! Per-source comparison over the lookback window

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{format_number, optional_count};

/// Aggregates of one upstream source
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SourceSummary {
    #[serde(default, deserialize_with = "optional_count")]
    pub count: Option<u64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default)]
    pub min_temperature: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
}

/// One table row: source name and its aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub source: String,
    pub summary: SourceSummary,
}

impl SourceRow {
    /// Cells in column order: source, observations, avg, min, max
    #[must_use]
    pub fn cells(&self) -> [String; 5] {
        [
            self.source.clone(),
            self.summary
                .count
                .map_or_else(|| super::NOT_AVAILABLE.to_string(), |c| c.to_string()),
            format_number(self.summary.avg_temperature),
            format_number(self.summary.min_temperature),
            format_number(self.summary.max_temperature),
        ]
    }
}

/// Mapping of source name to summary. Rows keep the key order of the JSON
/// object they were decoded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceComparison {
    rows: Vec<SourceRow>,
}

impl SourceComparison {
    #[must_use]
    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, source: &str) -> Option<&SourceSummary> {
        self.rows
            .iter()
            .find(|row| row.source == source)
            .map(|row| &row.summary)
    }
}

impl FromIterator<(String, SourceSummary)> for SourceComparison {
    fn from_iter<I: IntoIterator<Item = (String, SourceSummary)>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(source, summary)| SourceRow { source, summary })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SourceComparison {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = SourceComparison;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of source name to summary")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows: Vec<SourceRow> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((source, summary)) = map.next_entry::<String, SourceSummary>()? {
                    // A repeated key replaces the earlier row but keeps its position
                    if let Some(row) = rows.iter_mut().find(|r| r.source == source) {
                        row.summary = summary;
                    } else {
                        rows.push(SourceRow { source, summary });
                    }
                }
                Ok(SourceComparison { rows })
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl Serialize for SourceComparison {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.source, &row.summary)?;
        }
        map.end()
    }
}
