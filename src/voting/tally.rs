//! Result tallies over stored vote records.
//!
//! A position's total is the number of selections recorded for it, so for the
//! multi-seat council position one ballot contributes up to eight to the total.
//! Candidates are listed in catalog order; names that are no longer in the
//! catalog but appear in stored records follow in first-seen order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::barangay::{self, BARANGAYS};
use crate::models::{OrderedMap, Position, VoteRecord};
use crate::voting::percentage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTally {
    pub votes: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveCandidate {
    pub votes: u64,
    pub votes_by_barangay: OrderedMap<u64>,
    pub percentage: f64,
    pub percentage_by_barangay: OrderedMap<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivePosition {
    pub total_votes: u64,
    pub candidates: OrderedMap<LiveCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangayTag {
    pub barangay: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveResults {
    pub total_votes: u64,
    pub last_updated: DateTime<Utc>,
    pub results: OrderedMap<LivePosition>,
    pub barangay_totals: OrderedMap<u64>,
    pub votes: Vec<BarangayTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionResults {
    pub position: String,
    pub total_votes: u64,
    pub last_updated: DateTime<Utc>,
    pub results: OrderedMap<CandidateTally>,
    pub vote_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangayPosition {
    pub total_votes: u64,
    pub candidates: OrderedMap<CandidateTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangayResults {
    pub barangay: String,
    pub total_votes: u64,
    pub last_updated: DateTime<Utc>,
    pub results: OrderedMap<BarangayPosition>,
}

struct CandidateCount {
    name: String,
    votes: u64,
    by_barangay: [u64; BARANGAYS.len()],
}

impl CandidateCount {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            votes: 0,
            by_barangay: [0; BARANGAYS.len()],
        }
    }
}

// Every catalog candidate starts at zero.
fn count_position(position: &Position, records: &[VoteRecord]) -> Vec<CandidateCount> {
    let mut counts: Vec<CandidateCount> =
        position.candidates.iter().map(|c| CandidateCount::new(c)).collect();

    for record in records {
        let Some(picks) = record.votes.get(&position.name) else {
            continue;
        };
        let area = record.barangay.as_deref().and_then(barangay::index_of);

        for pick in picks {
            let idx = match counts.iter().position(|c| c.name == *pick) {
                Some(idx) => idx,
                None => {
                    counts.push(CandidateCount::new(pick));
                    counts.len() - 1
                }
            };
            counts[idx].votes += 1;
            if let Some(area) = area {
                counts[idx].by_barangay[area] += 1;
            }
        }
    }

    counts
}

fn simple_tallies(counts: Vec<CandidateCount>) -> (u64, OrderedMap<CandidateTally>) {
    let total: u64 = counts.iter().map(|c| c.votes).sum();
    let tallies = counts
        .into_iter()
        .map(|c| {
            let tally = CandidateTally {
                votes: c.votes,
                percentage: percentage(c.votes, total),
            };
            (c.name, tally)
        })
        .collect();
    (total, tallies)
}

pub fn live_results<'a>(
    positions: impl IntoIterator<Item = &'a Position>,
    records: &[VoteRecord],
    as_of: DateTime<Utc>,
) -> LiveResults {
    let total_votes = records.len() as u64;

    let mut ballots_per_barangay = [0u64; BARANGAYS.len()];
    for record in records {
        if let Some(area) = record.barangay.as_deref().and_then(barangay::index_of) {
            ballots_per_barangay[area] += 1;
        }
    }

    let mut results = OrderedMap::new();
    for position in positions {
        let mut counts = count_position(position, records);
        counts.retain(|c| c.votes > 0);

        let position_total: u64 = counts.iter().map(|c| c.votes).sum();
        let mut area_totals = [0u64; BARANGAYS.len()];
        for count in &counts {
            for (total, n) in area_totals.iter_mut().zip(count.by_barangay) {
                *total += n;
            }
        }

        let candidates = counts
            .into_iter()
            .map(|c| {
                let votes_by_barangay = BARANGAYS
                    .iter()
                    .zip(c.by_barangay)
                    .filter(|(_, n)| *n > 0)
                    .map(|(name, n)| (*name, n))
                    .collect();
                let percentage_by_barangay = BARANGAYS
                    .iter()
                    .enumerate()
                    .filter(|(area, _)| area_totals[*area] > 0)
                    .map(|(area, name)| (*name, percentage(c.by_barangay[area], area_totals[area])))
                    .collect();

                let live = LiveCandidate {
                    votes: c.votes,
                    votes_by_barangay,
                    percentage: percentage(c.votes, position_total),
                    percentage_by_barangay,
                };
                (c.name, live)
            })
            .collect();

        results.insert(
            position.name.clone(),
            LivePosition {
                total_votes,
                candidates,
            },
        );
    }

    LiveResults {
        total_votes,
        last_updated: as_of,
        results,
        barangay_totals: BARANGAYS
            .iter()
            .zip(ballots_per_barangay)
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| (*name, n))
            .collect(),
        votes: records
            .iter()
            .map(|r| BarangayTag {
                barangay: r.barangay.clone(),
            })
            .collect(),
    }
}

pub fn position_results(
    position: &Position,
    records: &[VoteRecord],
    as_of: DateTime<Utc>,
) -> PositionResults {
    let (total_votes, results) = simple_tallies(count_position(position, records));

    PositionResults {
        position: position.name.clone(),
        total_votes,
        last_updated: as_of,
        results,
        vote_limit: position.max_votes,
    }
}

/// Per-position tallies for records already filtered to `barangay`.
pub fn barangay_results<'a>(
    barangay: &str,
    positions: impl IntoIterator<Item = &'a Position>,
    records: &[VoteRecord],
    as_of: DateTime<Utc>,
) -> BarangayResults {
    let total_votes = records.len() as u64;

    let results = positions
        .into_iter()
        .map(|position| {
            let (_, candidates) = simple_tallies(count_position(position, records));
            let tally = BarangayPosition {
                total_votes,
                candidates,
            };
            (position.name.clone(), tally)
        })
        .collect();

    BarangayResults {
        barangay: barangay.to_string(),
        total_votes,
        last_updated: as_of,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, Selections};
    use chrono::TimeZone;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "MAYOR": { "candidates": ["A", "B"] },
                "MEMBER, SANGGUNIANG PANLUNGSOD": { "candidates": ["C1", "C2", "C3"] }
            }"#,
        )
        .unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap()
    }

    fn record(id: i64, barangay: Option<&str>, votes: &[(&str, &[&str])]) -> VoteRecord {
        let votes: Selections = votes
            .iter()
            .map(|(p, c)| (p.to_string(), c.iter().map(|s| s.to_string()).collect()))
            .collect();
        VoteRecord {
            id,
            voter_name: format!("Voter {id}"),
            contact_number: None,
            barangay: barangay.map(str::to_string),
            votes,
            timestamp: at(),
        }
    }

    #[test]
    fn single_vote_for_mayor() {
        let catalog = catalog();
        let records = vec![record(1, None, &[("MAYOR", &["A"])])];

        let results = position_results(catalog.position("MAYOR").unwrap(), &records, at());

        assert_eq!(results.total_votes, 1);
        assert_eq!(results.vote_limit, 1);
        assert_eq!(
            results.results.get("A"),
            Some(&CandidateTally { votes: 1, percentage: 100.0 })
        );
        assert_eq!(
            results.results.get("B"),
            Some(&CandidateTally { votes: 0, percentage: 0.0 })
        );
    }

    #[test]
    fn no_votes_means_zero_percent() {
        let catalog = catalog();
        let results = position_results(catalog.position("MAYOR").unwrap(), &[], at());

        assert_eq!(results.total_votes, 0);
        assert_eq!(results.results.len(), 2);
        assert!(results.results.values().all(|t| t.votes == 0 && t.percentage == 0.0));
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let catalog = catalog();
        let council = catalog.position("MEMBER, SANGGUNIANG PANLUNGSOD").unwrap();
        let records = vec![
            record(1, None, &[(council.name.as_str(), &["C1", "C2"])]),
            record(2, None, &[(council.name.as_str(), &["C1", "C3"])]),
            record(3, None, &[(council.name.as_str(), &["C2"])]),
        ];

        let results = position_results(council, &records, at());
        assert_eq!(results.total_votes, 5);

        let sum: f64 = results.results.values().map(|t| t.percentage).sum();
        let tolerance = 0.02 * results.results.len() as f64;
        assert!((sum - 100.0).abs() <= tolerance, "sum was {sum}");
    }

    #[test]
    fn position_results_include_names_outside_catalog() {
        let catalog = catalog();
        let records = vec![record(1, None, &[("MAYOR", &["Retired"])])];

        let results = position_results(catalog.position("MAYOR").unwrap(), &records, at());
        assert_eq!(results.results.keys().collect::<Vec<_>>(), vec!["A", "B", "Retired"]);
        assert_eq!(results.results.get("Retired").unwrap().percentage, 100.0);
    }

    #[test]
    fn live_results_break_down_by_barangay() {
        let catalog = catalog();
        let records = vec![
            record(1, Some("Tibanga"), &[("MAYOR", &["A"])]),
            record(2, Some("Tibanga"), &[("MAYOR", &["B"])]),
            record(3, Some("Tibanga"), &[("MAYOR", &["A"])]),
            record(4, Some("Palao"), &[("MAYOR", &["B"])]),
            record(5, None, &[("MAYOR", &["B"])]),
        ];

        let live = live_results(catalog.positions(), &records, at());
        assert_eq!(live.total_votes, 5);
        assert_eq!(live.votes.len(), 5);
        assert_eq!(live.barangay_totals.get("Tibanga"), Some(&3));
        assert_eq!(live.barangay_totals.get("Palao"), Some(&1));
        assert_eq!(live.barangay_totals.len(), 2);

        let mayor = live.results.get("MAYOR").unwrap();
        assert_eq!(mayor.total_votes, 5);

        let a = mayor.candidates.get("A").unwrap();
        assert_eq!(a.votes, 2);
        assert_eq!(a.percentage, 40.0);
        assert_eq!(a.votes_by_barangay.get("Tibanga"), Some(&2));
        assert_eq!(a.votes_by_barangay.get("Palao"), None);
        assert_eq!(a.percentage_by_barangay.get("Tibanga"), Some(&66.67));
        assert_eq!(a.percentage_by_barangay.get("Palao"), Some(&0.0));

        let b = mayor.candidates.get("B").unwrap();
        assert_eq!(b.votes, 3);
        assert_eq!(b.percentage, 60.0);
        assert_eq!(b.percentage_by_barangay.get("Tibanga"), Some(&33.33));
        assert_eq!(b.percentage_by_barangay.get("Palao"), Some(&100.0));
        assert_eq!(b.percentage_by_barangay.len(), 2);
    }

    #[test]
    fn live_results_skip_candidates_without_votes() {
        let catalog = catalog();
        let records = vec![record(1, Some("Suarez"), &[("MAYOR", &["A"])])];

        let live = live_results(catalog.positions(), &records, at());

        let mayor = live.results.get("MAYOR").unwrap();
        assert_eq!(mayor.candidates.keys().collect::<Vec<_>>(), vec!["A"]);

        let council = live.results.get("MEMBER, SANGGUNIANG PANLUNGSOD").unwrap();
        assert_eq!(council.total_votes, 1);
        assert!(council.candidates.is_empty());
    }

    #[test]
    fn live_results_keep_ballot_order() {
        let catalog = catalog();
        let live = live_results(catalog.positions(), &[], at());

        assert_eq!(
            live.results.keys().collect::<Vec<_>>(),
            vec!["MAYOR", "MEMBER, SANGGUNIANG PANLUNGSOD"]
        );
        assert_eq!(live.total_votes, 0);
        assert!(live.barangay_totals.is_empty());
    }

    #[test]
    fn barangay_results_list_every_candidate() {
        let catalog = catalog();
        let records = vec![
            record(
                1,
                Some("Tibanga"),
                &[("MAYOR", &["A"]), ("MEMBER, SANGGUNIANG PANLUNGSOD", &["C1", "C2"])],
            ),
            record(2, Some("Tibanga"), &[("MAYOR", &["A"])]),
        ];

        let results = barangay_results("Tibanga", catalog.positions(), &records, at());
        assert_eq!(results.barangay, "Tibanga");
        assert_eq!(results.total_votes, 2);

        let mayor = results.results.get("MAYOR").unwrap();
        assert_eq!(mayor.total_votes, 2);
        assert_eq!(
            mayor.candidates.get("A"),
            Some(&CandidateTally { votes: 2, percentage: 100.0 })
        );
        assert_eq!(
            mayor.candidates.get("B"),
            Some(&CandidateTally { votes: 0, percentage: 0.0 })
        );

        let council = results.results.get("MEMBER, SANGGUNIANG PANLUNGSOD").unwrap();
        assert_eq!(council.candidates.len(), 3);
        assert_eq!(council.candidates.get("C1").unwrap().percentage, 50.0);
        assert_eq!(council.candidates.get("C3").unwrap().votes, 0);
    }
}
