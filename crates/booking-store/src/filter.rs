use crate::Train;

/// Builder for read-side train filtering.
///
/// Source and destination match as case-insensitive substrings; an unset
/// field matches every train.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainFilter {
    /// Substring the train's source must contain.
    pub source: Option<String>,

    /// Substring the train's destination must contain.
    pub destination: Option<String>,

    /// Maximum number of trains to return.
    pub limit: Option<usize>,
}

impl TrainFilter {
    /// Creates a filter matching every train.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by source substring.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Filters by destination substring.
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Limits the number of trains returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the train satisfies both substring conditions.
    pub fn matches(&self, train: &Train) -> bool {
        contains_ignore_case(&train.source, self.source.as_deref())
            && contains_ignore_case(&train.destination, self.destination.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{NewTrain, TrainId};

    fn train(source: &str, destination: &str) -> Train {
        Train::from_new(
            TrainId::new(1),
            NewTrain {
                train_number: "1".to_string(),
                name: "Test".to_string(),
                source: source.to_string(),
                destination: destination.to_string(),
                departure_time: Utc::now(),
                arrival_time: Utc::now(),
                total_seats: 10,
            },
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TrainFilter::new().matches(&train("Pune", "Goa")));
    }

    #[test]
    fn source_matches_case_insensitive_substring() {
        let filter = TrainFilter::new().source("delhi");
        assert!(filter.matches(&train("New Delhi", "Agra")));
        assert!(!filter.matches(&train("Mumbai", "Delhi")));
    }

    #[test]
    fn both_fields_must_match() {
        let filter = TrainFilter::new().source("DELHI").destination("mum");
        assert!(filter.matches(&train("New Delhi", "Mumbai Central")));
        assert!(!filter.matches(&train("New Delhi", "Chennai")));
    }

    #[test]
    fn builder_chain_sets_limit() {
        let filter = TrainFilter::new().source("a").limit(3);
        assert_eq!(filter.limit, Some(3));
        assert_eq!(filter.source.as_deref(), Some("a"));
        assert!(filter.destination.is_none());
    }
}
