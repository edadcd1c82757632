//! Search view-model computation.
//!
//! Pure functions from the record list and a query string to a view
//! model, kept free of any rendering concern so the same logic backs the
//! HTTP client, the CLI printer, and the tests.

use serde::Serialize;

use crate::record::IpRecord;

/// The state of the search results pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "records", rename_all = "snake_case")]
pub enum SearchView {
    /// No query entered yet; prompt the operator instead of listing.
    Placeholder,
    /// A query was entered but nothing matched.
    NoMatches,
    /// Matching records, in inventory order.
    Results(Vec<IpRecord>),
}

impl SearchView {
    /// Number of records shown, zero for the empty states.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Placeholder | Self::NoMatches => 0,
            Self::Results(records) => records.len(),
        }
    }

    /// Check whether the view shows no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the search view for a query over the record list.
///
/// An empty query yields the placeholder state, never the full list. A
/// non-empty query matches case-insensitively against the IP and the
/// account number.
#[must_use]
pub fn search_view(records: &[IpRecord], query: &str) -> SearchView {
    if query.is_empty() {
        return SearchView::Placeholder;
    }

    let needle = query.to_lowercase();
    let matches: Vec<IpRecord> = records
        .iter()
        .filter(|record| record_matches(record, &needle))
        .cloned()
        .collect();

    if matches.is_empty() {
        SearchView::NoMatches
    } else {
        SearchView::Results(matches)
    }
}

fn record_matches(record: &IpRecord, needle: &str) -> bool {
    if record.ip.to_lowercase().contains(needle) {
        return true;
    }
    record
        .account_number
        .as_ref()
        .is_some_and(|account| account.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::IpType;

    fn sample_records() -> Vec<IpRecord> {
        let mut first = IpRecord::unused("10.0.0.5", "255.255.255.0", "10.0.0.1");
        first.used = true;
        first.account_number = Some("ACC100".to_string());
        first.kind = Some(IpType::Static);
        first.mac = Some("aabbccddeeff".to_string());

        let second = IpRecord::unused("10.0.1.7", "255.255.255.0", "10.0.1.1");
        let third = IpRecord::unused("192.168.4.2", "255.255.255.0", "192.168.4.1");

        vec![first, second, third]
    }

    #[test]
    fn test_empty_query_is_placeholder() {
        let records = sample_records();
        assert_eq!(search_view(&records, ""), SearchView::Placeholder);
    }

    #[test]
    fn test_empty_query_on_empty_inventory_is_placeholder() {
        assert_eq!(search_view(&[], ""), SearchView::Placeholder);
    }

    #[test]
    fn test_no_matches_state() {
        let records = sample_records();
        assert_eq!(search_view(&records, "172.16"), SearchView::NoMatches);
    }

    #[test]
    fn test_match_by_ip_substring() {
        let records = sample_records();
        let view = search_view(&records, "10.0.");
        match view {
            SearchView::Results(found) => {
                assert_eq!(found.len(), 2);
                assert_eq!(found[0].ip, "10.0.0.5");
                assert_eq!(found[1].ip, "10.0.1.7");
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn test_match_by_account_case_insensitive() {
        let records = sample_records();
        let view = search_view(&records, "acc1");
        match view {
            SearchView::Results(found) => {
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].ip, "10.0.0.5");
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn test_unused_records_have_no_account_to_match() {
        let records = sample_records();
        assert_eq!(search_view(&records, "acc999"), SearchView::NoMatches);
    }

    #[test]
    fn test_whitespace_query_is_a_real_query() {
        // Only the empty string is the placeholder; a space searches.
        let records = sample_records();
        assert_eq!(search_view(&records, " "), SearchView::NoMatches);
    }

    #[test]
    fn test_view_len() {
        let records = sample_records();
        assert_eq!(search_view(&records, "").len(), 0);
        assert!(search_view(&records, "").is_empty());
        assert_eq!(search_view(&records, "10.0.").len(), 2);
        assert!(!search_view(&records, "10.0.").is_empty());
    }

    #[test]
    fn test_view_serializes_with_state_tag() {
        let json = serde_json::to_value(SearchView::Placeholder).unwrap();
        assert_eq!(json["state"], "placeholder");

        let records = sample_records();
        let json = serde_json::to_value(search_view(&records, "192.168")).unwrap();
        assert_eq!(json["state"], "results");
    }
}
