//! Aggregate statistics models.
//!
//! A [`StatsSnapshot`] is the cached unit: the aggregates derived from
//! the exact set of matches listed in its `games_used` ledger. It is
//! produced by `calculate::aggregate`, grown by `calculate::merge`,
//! and persisted through the cache gateway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{MatchRecord, Position};

/// Per-match stats tracked in the record tables.
///
/// An explicit enum with a typed accessor instead of string-keyed
/// lookups, so every stat read is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Kills,
    Deaths,
    Assists,
    Cs,
    Gold,
    DamageDealt,
    DamageTaken,
    VisionScore,
    DoubleKills,
    TripleKills,
    QuadraKills,
    PentaKills,
}

impl StatKind {
    pub const ALL: [StatKind; 12] = [
        StatKind::Kills,
        StatKind::Deaths,
        StatKind::Assists,
        StatKind::Cs,
        StatKind::Gold,
        StatKind::DamageDealt,
        StatKind::DamageTaken,
        StatKind::VisionScore,
        StatKind::DoubleKills,
        StatKind::TripleKills,
        StatKind::QuadraKills,
        StatKind::PentaKills,
    ];

    /// Read this stat's value from a match.
    pub fn of(self, m: &MatchRecord) -> u32 {
        match self {
            StatKind::Kills => m.kills,
            StatKind::Deaths => m.deaths,
            StatKind::Assists => m.assists,
            StatKind::Cs => m.cs,
            StatKind::Gold => m.gold,
            StatKind::DamageDealt => m.damage_dealt,
            StatKind::DamageTaken => m.damage_taken,
            StatKind::VisionScore => m.vision_score,
            StatKind::DoubleKills => m.double_kills,
            StatKind::TripleKills => m.triple_kills,
            StatKind::QuadraKills => m.quadra_kills,
            StatKind::PentaKills => m.penta_kills,
        }
    }
}

/// A single-match extreme for one stat, and the match it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub value: u32,
    pub match_id: String,
}

/// Per-stat extremes across all folded matches (high or low variant).
pub type RecordsSnapshot = BTreeMap<StatKind, RecordEntry>;

/// Teammate identity → number of matches played together.
pub type FriendsTally = BTreeMap<String, u32>;

/// Running aggregate for one bucket (a champion or a position).
///
/// Only counters, sums and maxes are stored. Ratios (win rate, KDA,
/// cs/min) are computed on read so merging two buckets stays a plain
/// field-wise sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub games: u32,
    pub wins: u32,

    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub cs: u64,
    pub gold: u64,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub vision_score: u64,
    pub double_kills: u64,
    pub triple_kills: u64,
    pub quadra_kills: u64,
    pub penta_kills: u64,
    pub duration_secs: u64,

    pub max_kills: u32,
    pub max_deaths: u32,
}

impl BucketStats {
    /// Fold one match into this bucket.
    pub fn add_match(&mut self, m: &MatchRecord) {
        self.games += 1;
        if m.win {
            self.wins += 1;
        }
        self.kills += u64::from(m.kills);
        self.deaths += u64::from(m.deaths);
        self.assists += u64::from(m.assists);
        self.cs += u64::from(m.cs);
        self.gold += u64::from(m.gold);
        self.damage_dealt += u64::from(m.damage_dealt);
        self.damage_taken += u64::from(m.damage_taken);
        self.vision_score += u64::from(m.vision_score);
        self.double_kills += u64::from(m.double_kills);
        self.triple_kills += u64::from(m.triple_kills);
        self.quadra_kills += u64::from(m.quadra_kills);
        self.penta_kills += u64::from(m.penta_kills);
        self.duration_secs += u64::from(m.game_duration_secs);
        self.max_kills = self.max_kills.max(m.kills);
        self.max_deaths = self.max_deaths.max(m.deaths);
    }

    /// Sum another bucket into this one. Counters add, maxes take max.
    pub fn absorb(&mut self, other: &BucketStats) {
        self.games += other.games;
        self.wins += other.wins;
        self.kills += other.kills;
        self.deaths += other.deaths;
        self.assists += other.assists;
        self.cs += other.cs;
        self.gold += other.gold;
        self.damage_dealt += other.damage_dealt;
        self.damage_taken += other.damage_taken;
        self.vision_score += other.vision_score;
        self.double_kills += other.double_kills;
        self.triple_kills += other.triple_kills;
        self.quadra_kills += other.quadra_kills;
        self.penta_kills += other.penta_kills;
        self.duration_secs += other.duration_secs;
        self.max_kills = self.max_kills.max(other.max_kills);
        self.max_deaths = self.max_deaths.max(other.max_deaths);
    }

    /// Win rate as a fraction (0.0 to 1.0).
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games)
        }
    }

    /// (kills + assists) / max(deaths, 1).
    pub fn kda(&self) -> f64 {
        (self.kills + self.assists) as f64 / self.deaths.max(1) as f64
    }

    /// Creep score per minute across all folded matches.
    pub fn cs_per_minute(&self) -> f64 {
        if self.duration_secs == 0 {
            0.0
        } else {
            self.cs as f64 / (self.duration_secs as f64 / 60.0)
        }
    }
}

/// The cached aggregate unit for one player on one server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Match IDs already folded in, newest first. Acts as the dedup
    /// ledger: every aggregate below is derivable from exactly these
    /// matches, and the list must never contain duplicates.
    pub games_used: Vec<String>,

    /// Teammate identity → matches played together.
    pub friends: FriendsTally,

    /// Aggregates keyed by champion name.
    pub by_champion: BTreeMap<String, BucketStats>,

    /// Aggregates keyed by role.
    pub by_position: BTreeMap<Position, BucketStats>,

    /// Highest single-match value per stat.
    pub records: RecordsSnapshot,

    /// Lowest single-match value per stat.
    pub low_records: RecordsSnapshot,
}

impl StatsSnapshot {
    /// The most recently played match folded into this snapshot.
    pub fn newest_game(&self) -> Option<&str> {
        self.games_used.first().map(String::as_str)
    }

    pub fn contains_game(&self, match_id: &str) -> bool {
        self.games_used.iter().any(|id| id == match_id)
    }

    /// True if the ledger is corrupt (same match folded twice).
    pub fn has_duplicate_games(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.games_used.len());
        self.games_used.iter().any(|id| !seen.insert(id.as_str()))
    }

    /// Total games across the ledger.
    pub fn games(&self) -> usize {
        self.games_used.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_match() -> MatchRecord {
        MatchRecord {
            match_id: "EUW1_1".to_string(),
            champion: "Jinx".to_string(),
            position: Position::Bottom,
            kills: 7,
            deaths: 2,
            assists: 9,
            cs: 210,
            gold: 12_500,
            damage_dealt: 24_000,
            damage_taken: 15_000,
            vision_score: 22,
            double_kills: 1,
            triple_kills: 0,
            quadra_kills: 0,
            penta_kills: 0,
            game_duration_secs: 1800,
            win: true,
            friends: vec!["Ana".to_string()],
        }
    }

    #[test]
    fn test_stat_kind_accessor() {
        let m = sample_match();
        assert_eq!(StatKind::Kills.of(&m), 7);
        assert_eq!(StatKind::Cs.of(&m), 210);
        assert_eq!(StatKind::DamageTaken.of(&m), 15_000);
        assert_eq!(StatKind::PentaKills.of(&m), 0);
        // Every kind must resolve.
        for kind in StatKind::ALL {
            let _ = kind.of(&m);
        }
    }

    #[test]
    fn test_bucket_add_match() {
        let mut b = BucketStats::default();
        b.add_match(&sample_match());

        assert_eq!(b.games, 1);
        assert_eq!(b.wins, 1);
        assert_eq!(b.kills, 7);
        assert_eq!(b.max_kills, 7);
        assert_eq!(b.duration_secs, 1800);
    }

    #[test]
    fn test_bucket_ratios_computed_on_read() {
        let mut b = BucketStats::default();
        let mut m = sample_match();
        b.add_match(&m);
        m.win = false;
        m.kills = 1;
        b.add_match(&m);

        assert_eq!(b.win_rate(), 0.5);
        // (7 + 1 + 9 + 9) / 4 deaths
        assert_eq!(b.kda(), 26.0 / 4.0);
        // 420 cs over 60 minutes
        assert!((b.cs_per_minute() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_kda_zero_deaths() {
        let mut b = BucketStats::default();
        let mut m = sample_match();
        m.deaths = 0;
        b.add_match(&m);

        assert_eq!(b.kda(), 16.0);
    }

    #[test]
    fn test_bucket_absorb_sums_and_maxes() {
        let mut a = BucketStats::default();
        let mut b = BucketStats::default();
        let m1 = sample_match();
        let mut m2 = sample_match();
        m2.kills = 12;
        m2.win = false;
        a.add_match(&m1);
        b.add_match(&m2);

        a.absorb(&b);
        assert_eq!(a.games, 2);
        assert_eq!(a.wins, 1);
        assert_eq!(a.kills, 19);
        assert_eq!(a.max_kills, 12);
    }

    #[test]
    fn test_snapshot_ledger_helpers() {
        let snap = StatsSnapshot {
            games_used: vec!["M3".into(), "M2".into(), "M1".into()],
            ..Default::default()
        };

        assert_eq!(snap.newest_game(), Some("M3"));
        assert!(snap.contains_game("M1"));
        assert!(!snap.contains_game("M4"));
        assert!(!snap.has_duplicate_games());
        assert_eq!(snap.games(), 3);
    }

    #[test]
    fn test_snapshot_duplicate_detection() {
        let snap = StatsSnapshot {
            games_used: vec!["M1".into(), "M2".into(), "M1".into()],
            ..Default::default()
        };
        assert!(snap.has_duplicate_games());
    }

    #[test]
    fn test_snapshot_serialization_round_trip() {
        let mut snap = StatsSnapshot::default();
        snap.games_used.push("EUW1_1".into());
        snap.by_champion
            .entry("Jinx".to_string())
            .or_default()
            .add_match(&sample_match());
        snap.by_position
            .entry(Position::Bottom)
            .or_default()
            .add_match(&sample_match());
        snap.records.insert(
            StatKind::Kills,
            RecordEntry {
                value: 7,
                match_id: "EUW1_1".into(),
            },
        );

        let json = serde_json::to_string(&snap).unwrap();
        let back: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}
