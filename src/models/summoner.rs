//! Summoner-facing response models.

use serde::{Deserialize, Serialize};

/// Public profile for a summoner, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerProfile {
    pub alias: String,
    pub server: String,
    pub level: u32,
    /// Data Dragon profile icon URL.
    pub image: String,
}

impl SummonerProfile {
    pub fn new(
        alias: impl Into<String>,
        server: impl Into<String>,
        level: u32,
        profile_icon_id: i32,
        ddragon_version: &str,
    ) -> Self {
        Self {
            alias: alias.into(),
            server: server.into(),
            level,
            image: format!(
                "https://ddragon.leagueoflegends.com/cdn/{}/img/profileicon/{}.png",
                ddragon_version, profile_icon_id
            ),
        }
    }
}

/// One champion mastery entry for a summoner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionMastery {
    pub champion_id: i64,
    pub level: u32,
    pub points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_icon_url() {
        let p = SummonerProfile::new("Faker", "kr", 742, 6296, "14.10.1");
        assert_eq!(
            p.image,
            "https://ddragon.leagueoflegends.com/cdn/14.10.1/img/profileicon/6296.png"
        );
        assert_eq!(p.level, 742);
    }
}
