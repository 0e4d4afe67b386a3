//! NFT rarity tiers.

use serde::{Deserialize, Serialize};

/// Rarity tier of an NFT.
///
/// Tiers are ordered: `Common < Rare < Epic < Legendary`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, in ascending order.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// The lowercase wire name of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rarity {
    type Err = UnknownRarity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(UnknownRarity(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown rarity name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown rarity: {0}")]
pub struct UnknownRarity(pub String);

/// Category predicate for catalogue filtering.
///
/// The wildcard `all` matches every tier; a named tier matches only itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RarityFilter {
    #[default]
    All,
    Only(Rarity),
}

impl RarityFilter {
    /// Whether an NFT with the given tier passes this filter.
    #[must_use]
    pub fn matches(&self, rarity: Rarity) -> bool {
        match self {
            Self::All => true,
            Self::Only(tier) => *tier == rarity,
        }
    }
}

impl TryFrom<String> for RarityFilter {
    type Error = UnknownRarity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_rarity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Rarity::Legendary).unwrap(), "\"legendary\"");
        let back: Rarity = serde_json::from_str("\"epic\"").unwrap();
        assert_eq!(back, Rarity::Epic);
    }

    #[test]
    fn test_filter_all_matches_everything() {
        for tier in Rarity::ALL {
            assert!(RarityFilter::All.matches(tier));
        }
    }

    #[test]
    fn test_filter_only_matches_one_tier() {
        let filter = RarityFilter::Only(Rarity::Rare);
        assert!(filter.matches(Rarity::Rare));
        assert!(!filter.matches(Rarity::Common));
        assert!(!filter.matches(Rarity::Legendary));
    }

    #[test]
    fn test_filter_parses_wildcard_and_tier() {
        assert_eq!(RarityFilter::try_from("all".to_string()).unwrap(), RarityFilter::All);
        assert_eq!(
            RarityFilter::try_from("epic".to_string()).unwrap(),
            RarityFilter::Only(Rarity::Epic)
        );
        assert!(RarityFilter::try_from("mythic".to_string()).is_err());
    }
}
