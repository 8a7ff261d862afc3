//! Match data as seen by one tracked player.

use serde::{Deserialize, Serialize};

/// Role a player occupied in a match.
///
/// Mirrors Riot's `teamPosition` values. Anything the upstream API
/// reports outside the five standard lanes maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
    Unknown,
}

impl Position {
    /// Parse a Riot `teamPosition` string.
    pub fn from_riot(s: &str) -> Self {
        match s {
            "TOP" => Position::Top,
            "JUNGLE" => Position::Jungle,
            "MIDDLE" => Position::Middle,
            "BOTTOM" => Position::Bottom,
            "UTILITY" => Position::Utility,
            _ => Position::Unknown,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Position::Top => "TOP",
            Position::Jungle => "JUNGLE",
            Position::Middle => "MIDDLE",
            Position::Bottom => "BOTTOM",
            Position::Utility => "UTILITY",
            Position::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Queue filter for match-history lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Queue {
    #[default]
    All,
    Ranked,
    Normal,
}

/// One played match, reduced to the tracked player's outcome.
///
/// Produced by a `MatchSource` and immutable afterwards. All aggregate
/// state is derived by folding these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique match identifier (e.g. "EUW1_6309031234").
    pub match_id: String,

    /// Champion the tracked player picked.
    pub champion: String,

    /// Lane/role the tracked player occupied.
    pub position: Position,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    /// Creep score (lane + neutral minions).
    pub cs: u32,

    pub gold: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub vision_score: u32,

    pub double_kills: u32,
    pub triple_kills: u32,
    pub quadra_kills: u32,
    pub penta_kills: u32,

    /// Match length in seconds, used for cs-per-minute.
    pub game_duration_secs: u32,

    pub win: bool,

    /// Identities of the four same-team players.
    pub friends: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_riot() {
        assert_eq!(Position::from_riot("TOP"), Position::Top);
        assert_eq!(Position::from_riot("UTILITY"), Position::Utility);
        assert_eq!(Position::from_riot(""), Position::Unknown);
        assert_eq!(Position::from_riot("Invalid"), Position::Unknown);
    }

    #[test]
    fn test_position_serializes_as_riot_string() {
        assert_eq!(
            serde_json::to_string(&Position::Middle).unwrap(),
            "\"MIDDLE\""
        );
        let p: Position = serde_json::from_str("\"JUNGLE\"").unwrap();
        assert_eq!(p, Position::Jungle);
    }

    #[test]
    fn test_queue_default_and_rename() {
        assert_eq!(Queue::default(), Queue::All);
        let q: Queue = serde_json::from_str("\"ranked\"").unwrap();
        assert_eq!(q, Queue::Ranked);
    }
}
