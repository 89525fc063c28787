//! Route records and their public projections.

use serde::{Deserialize, Serialize};

use super::{GenerationKey, Tour};

/// A scored tour as stored by the persistence collaborator.
///
/// Serializes with the store's attribute names: `routeId`, `runGen`, `route`
/// and `len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Opaque unique ID assigned at creation.
    #[serde(rename = "routeId")]
    pub route_id: String,
    /// Run and generation this tour belongs to.
    #[serde(rename = "runGen")]
    pub generation_key: GenerationKey,
    /// The tour itself.
    #[serde(rename = "route")]
    pub tour: Tour,
    /// Closed-cycle length of `tour`.
    #[serde(rename = "len")]
    pub length: f64,
}

impl RouteRecord {
    /// Returns the public `{routeId, length}` projection of this record.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            route_id: self.route_id.clone(),
            length: self.length,
        }
    }
}

/// The externally visible part of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub route_id: String,
    pub length: f64,
}

/// Route summaries ordered ascending by length.
///
/// Ties keep the order the records were supplied in.
///
/// # Examples
///
/// ```
/// use u_evoroute::models::{GenerationKey, RankedSummary, RouteRecord, Tour};
///
/// let key = GenerationKey::new("run", 1).unwrap();
/// let record = |id: &str, length| RouteRecord {
///     route_id: id.to_string(),
///     generation_key: key.clone(),
///     tour: Tour::new(vec![0, 1, 2, 3]),
///     length,
/// };
/// let ranked = RankedSummary::from_records(&[record("a", 9.0), record("b", 4.0)]);
/// assert_eq!(ranked.best().unwrap().route_id, "b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedSummary {
    entries: Vec<RouteSummary>,
}

impl RankedSummary {
    /// Projects each record to its summary and sorts by length (stable).
    pub fn from_records(records: &[RouteRecord]) -> Self {
        let mut entries: Vec<RouteSummary> = records.iter().map(RouteRecord::summary).collect();
        entries.sort_by(|a, b| a.length.total_cmp(&b.length));
        Self { entries }
    }

    /// Ranked entries, shortest first.
    pub fn entries(&self) -> &[RouteSummary] {
        &self.entries
    }

    /// The shortest route, if any.
    pub fn best(&self) -> Option<&RouteSummary> {
        self.entries.first()
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the summary, returning the ranked entries.
    pub fn into_entries(self) -> Vec<RouteSummary> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, length: f64) -> RouteRecord {
        RouteRecord {
            route_id: id.to_string(),
            generation_key: GenerationKey::new("run", 2).expect("valid"),
            tour: Tour::new(vec![0, 1, 2, 3]),
            length,
        }
    }

    #[test]
    fn test_ranked_ascending() {
        let ranked = RankedSummary::from_records(&[
            record("a", 12.0),
            record("b", 3.5),
            record("c", 7.0),
        ]);
        let ids: Vec<&str> = ranked.entries().iter().map(|e| e.route_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked.best().map(|e| e.length), Some(3.5));
    }

    #[test]
    fn test_entries_are_independent_copies() {
        let records = [record("a", 1.0), record("b", 2.0), record("c", 3.0)];
        let ranked = RankedSummary::from_records(&records);
        for (entry, record) in ranked.entries().iter().zip(&records) {
            assert_eq!(entry.route_id, record.route_id);
            assert_eq!(entry.length, record.length);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = RankedSummary::from_records(&[
            record("x", 5.0),
            record("y", 1.0),
            record("z", 5.0),
            record("w", 5.0),
        ]);
        let ids: Vec<&str> = ranked.entries().iter().map(|e| e.route_id.as_str()).collect();
        assert_eq!(ids, vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn test_empty() {
        let ranked = RankedSummary::from_records(&[]);
        assert!(ranked.is_empty());
        assert!(ranked.best().is_none());
    }

    #[test]
    fn test_record_wire_names() {
        let json = serde_json::to_value(record("id1", 14.0)).expect("serialize");
        assert_eq!(json["routeId"], "id1");
        assert_eq!(json["runGen"], "run#2");
        assert_eq!(json["route"], serde_json::json!([0, 1, 2, 3]));
        assert_eq!(json["len"], 14.0);

        let back: RouteRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, record("id1", 14.0));
    }

    #[test]
    fn test_summary_wire_names() {
        let json = serde_json::to_string(&record("id1", 2.5).summary()).expect("serialize");
        assert_eq!(json, r#"{"routeId":"id1","length":2.5}"#);
    }
}
