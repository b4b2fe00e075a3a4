use logstitch_types::Record;

/// Number of leading records of `current` that repeat the tail of `previous`.
///
/// Both pages are newest-first. The result is the largest `k` such that the
/// last `k` records of `previous` equal the first `k` records of `current`,
/// element by element, or 0 when no suffix matches.
pub fn overlap_length(previous: &[Record], current: &[Record]) -> usize {
    let Some(head) = current.first() else {
        return 0;
    };
    let limit = previous.len().min(current.len());
    let mut best = 0;

    for k in 1..=limit {
        let candidate = &previous[previous.len() - k..];
        // Candidates only get newer as k grows; once one starts after the
        // head of the new page no longer suffix can match.
        if candidate[0].timestamp() > head.timestamp() {
            break;
        }
        if candidate == &current[..k] {
            best = k;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use logstitch_types::FieldMap;

    fn record(secs: i64, tag: &str) -> Record {
        let ts = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        let mut fields = FieldMap::new();
        fields.insert("tag".to_string(), tag.into());
        Record::new(ts, fields)
    }

    #[test]
    fn test_empty_inputs_have_no_overlap() {
        assert_eq!(overlap_length(&[], &[]), 0);
        assert_eq!(overlap_length(&[record(1, "a")], &[]), 0);
        assert_eq!(overlap_length(&[], &[record(1, "a")]), 0);
    }

    #[test]
    fn test_boundary_ties_are_matched() {
        let previous = vec![record(9, "a"), record(8, "b"), record(8, "c")];
        let current = vec![record(8, "b"), record(8, "c"), record(7, "d")];
        assert_eq!(overlap_length(&previous, &current), 2);
    }

    #[test]
    fn test_single_boundary_record() {
        let previous = vec![record(9, "a"), record(5, "b")];
        let current = vec![record(5, "b"), record(4, "c")];
        assert_eq!(overlap_length(&previous, &current), 1);
    }

    #[test]
    fn test_same_timestamp_but_different_record_is_not_overlap() {
        let previous = vec![record(9, "a"), record(5, "b")];
        let current = vec![record(5, "z"), record(4, "c")];
        assert_eq!(overlap_length(&previous, &current), 0);
    }

    #[test]
    fn test_disjoint_pages() {
        let previous = vec![record(9, "a"), record(8, "b")];
        let current = vec![record(3, "c"), record(2, "d")];
        assert_eq!(overlap_length(&previous, &current), 0);
    }

    #[test]
    fn test_whole_page_repeated() {
        let page = vec![record(5, "a"), record(5, "b"), record(5, "c")];
        assert_eq!(overlap_length(&page, &page.clone()), 3);
    }

    #[test]
    fn test_longest_match_wins() {
        // Both k=1 ([x]) and k=3 ([x, y, x]) are valid suffix/prefix matches.
        let previous = vec![record(5, "x"), record(5, "y"), record(5, "x")];
        let current = vec![record(5, "x"), record(5, "y"), record(5, "x"), record(4, "w")];
        assert_eq!(overlap_length(&previous, &current), 3);
    }

    #[test]
    fn test_candidate_bounded_by_shorter_page() {
        let previous = vec![record(6, "a"), record(5, "b"), record(5, "c")];
        let current = vec![record(5, "c")];
        assert_eq!(overlap_length(&previous, &current), 1);
    }
}
