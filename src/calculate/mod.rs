//! Pure statistics aggregation.
//!
//! Two operations derive everything the API serves:
//! - [`aggregate`] folds a batch of matches into a fresh snapshot.
//! - [`merge`] combines two snapshots built from disjoint match sets.
//!
//! Both are deterministic and perform no I/O. The orchestrator in
//! `service` is responsible for keeping merge inputs disjoint.

use crate::models::{MatchRecord, RecordEntry, RecordsSnapshot, StatKind, StatsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    High,
    Low,
}

impl Extreme {
    fn beats(self, candidate: u32, current: u32) -> bool {
        match self {
            // Strict comparison: ties keep the earlier entry.
            Extreme::High => candidate > current,
            Extreme::Low => candidate < current,
        }
    }
}

fn update_record(
    records: &mut RecordsSnapshot,
    kind: StatKind,
    value: u32,
    match_id: &str,
    extreme: Extreme,
) {
    match records.get(&kind) {
        Some(entry) if !extreme.beats(value, entry.value) => {}
        _ => {
            records.insert(
                kind,
                RecordEntry {
                    value,
                    match_id: match_id.to_string(),
                },
            );
        }
    }
}

/// Fold a batch of matches into a fresh snapshot.
///
/// `games_used` preserves the input order (callers pass matches newest
/// first). Sums, counters and extremes are order-independent; record
/// ties keep the first occurrence in input order.
pub fn aggregate(matches: &[MatchRecord]) -> StatsSnapshot {
    let mut snap = StatsSnapshot::default();

    for m in matches {
        snap.games_used.push(m.match_id.clone());

        snap.by_champion
            .entry(m.champion.clone())
            .or_default()
            .add_match(m);
        snap.by_position.entry(m.position).or_default().add_match(m);

        for friend in &m.friends {
            *snap.friends.entry(friend.clone()).or_default() += 1;
        }

        for kind in StatKind::ALL {
            let value = kind.of(m);
            update_record(&mut snap.records, kind, value, &m.match_id, Extreme::High);
            update_record(&mut snap.low_records, kind, value, &m.match_id, Extreme::Low);
        }
    }

    snap
}

fn merge_records(a: &RecordsSnapshot, b: &RecordsSnapshot, extreme: Extreme) -> RecordsSnapshot {
    let mut out = a.clone();
    for (kind, entry) in b {
        match out.get(kind) {
            // Strict comparison: ties prefer `a`'s record.
            Some(existing) if !extreme.beats(entry.value, existing.value) => {}
            _ => {
                out.insert(*kind, entry.clone());
            }
        }
    }
    out
}

/// Combine two snapshots built from disjoint match sets.
///
/// Precondition: `a.games_used` and `b.games_used` share no match ID.
/// Merging overlapping snapshots double-counts the shared matches;
/// callers that cannot guarantee disjointness must re-aggregate from
/// raw matches instead. The resulting ledger is `a`'s matches followed
/// by `b`'s.
pub fn merge(a: &StatsSnapshot, b: &StatsSnapshot) -> StatsSnapshot {
    let mut out = StatsSnapshot {
        games_used: a
            .games_used
            .iter()
            .chain(b.games_used.iter())
            .cloned()
            .collect(),
        friends: a.friends.clone(),
        by_champion: a.by_champion.clone(),
        by_position: a.by_position.clone(),
        records: merge_records(&a.records, &b.records, Extreme::High),
        low_records: merge_records(&a.low_records, &b.low_records, Extreme::Low),
    };

    for (friend, count) in &b.friends {
        *out.friends.entry(friend.clone()).or_default() += count;
    }
    for (champion, stats) in &b.by_champion {
        out.by_champion
            .entry(champion.clone())
            .or_default()
            .absorb(stats);
    }
    for (position, stats) in &b.by_position {
        out.by_position.entry(*position).or_default().absorb(stats);
    }

    out
}
