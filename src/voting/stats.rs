use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::VoteRecord;

// Zero-padded, so lexical order is chronological.
const HOUR_BUCKET: &str = "%Y-%m-%d %H:00:00";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBucket {
    pub hour: String,
    pub vote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyStats {
    pub hourly_stats: Vec<HourlyBucket>,
}

pub fn hourly_stats(records: &[VoteRecord]) -> HourlyStats {
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        let hour = record.timestamp.format(HOUR_BUCKET).to_string();
        *buckets.entry(hour).or_insert(0) += 1;
    }

    HourlyStats {
        hourly_stats: buckets
            .into_iter()
            .map(|(hour, vote_count)| HourlyBucket { hour, vote_count })
            .collect(),
    }
}
