//! Static sample catalogue data.
//!
//! There is no backend; the catalogue is seeded with a fixed set of NFTs
//! around central Delhi, a handful of reward tasks, and the participating
//! shops.

use chrono::TimeZone;
use chrono::Utc;
use geomint_core::{Coordinate, Nft, NftId, Rarity, Shop, ShopId, Task, TaskId, TaskKind};

struct SampleLocation {
    lat: f64,
    lng: f64,
    name: &'static str,
}

const SAMPLE_LOCATIONS: [SampleLocation; 8] = [
    SampleLocation { lat: 28.4968497, lng: 77.244192, name: "India Gate Gallery" },
    SampleLocation { lat: 28.4996139, lng: 77.2457196, name: "National Gallery" },
    SampleLocation { lat: 28.5072521, lng: 77.2397517, name: "Children's Park Art Space" },
    SampleLocation { lat: 28.5083561, lng: 77.2317759, name: "Hyderabad House Collection" },
    SampleLocation { lat: 28.5015898, lng: 77.2373485, name: "National Stadium NFT Hub" },
    SampleLocation { lat: 28.5061144, lng: 77.2402497, name: "C-Hexagon Digital Gallery" },
    SampleLocation { lat: 28.5061144, lng: 77.2362497, name: "Central Vista Art Space" },
    SampleLocation { lat: 28.5051144, lng: 77.2382497, name: "India Gate NFT Market" },
];

fn nft(
    id: u32,
    name: &str,
    description: &str,
    image_url: &str,
    location_index: usize,
    rarity: Rarity,
) -> Nft {
    let location = SAMPLE_LOCATIONS
        .get(location_index)
        .unwrap_or(&SAMPLE_LOCATIONS[0]);
    Nft {
        id: NftId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
        shop_name: location.name.to_string(),
        rarity,
        location: Coordinate::new(location.lat, location.lng),
        distance_km: None,
    }
}

/// The seeded NFT catalogue.
pub fn nfts() -> Vec<Nft> {
    vec![
        nft(
            1,
            "India Gate Digital Art #1",
            "Exclusive digital collectible from the iconic India Gate. Limited edition design capturing the monument's majestic spirit.",
            "https://images.unsplash.com/photo-1500673922987-e212871fec22",
            0,
            Rarity::Rare,
        ),
        nft(
            2,
            "National Gallery View",
            "Iconic Delhi NFT featuring a unique perspective of the National Gallery. Collect this piece of architectural history.",
            "https://images.unsplash.com/photo-1465146344425-f00d5f5c8f07",
            1,
            Rarity::Legendary,
        ),
        nft(
            3,
            "Children's Park Collection",
            "Contemporary NFT art inspired by the vibrant Children's Park area. Each piece tells a unique story.",
            "https://images.unsplash.com/photo-1472396961693-142e6e269027",
            2,
            Rarity::Epic,
        ),
        nft(
            4,
            "Hyderabad House Series",
            "Sophisticated digital art collection from the Hyderabad House area. Limited availability.",
            "https://images.unsplash.com/photo-1501084817091-a4f3d1d19e07",
            3,
            Rarity::Rare,
        ),
        nft(
            5,
            "Stadium Masterpiece",
            "Dynamic NFT artwork capturing the energy of National Stadium area. A must-have for digital art collectors.",
            "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df",
            4,
            Rarity::Epic,
        ),
        nft(
            6,
            "C-Hexagon Collection",
            "Premium digital collectible from the prestigious C-Hexagon area. Exclusive to this location.",
            "https://images.unsplash.com/photo-1493246507139-91e8fad9978e",
            5,
            Rarity::Legendary,
        ),
        nft(
            7,
            "Central Vista Art",
            "Urban-inspired NFT collection from the artistic heart of Central Vista. Limited edition series.",
            "https://images.unsplash.com/photo-1460411794035-42aac080490a",
            6,
            Rarity::Epic,
        ),
        nft(
            8,
            "India Gate Pixels",
            "Contemporary pixel art NFT from India Gate area. A perfect blend of traditional and digital art.",
            "https://images.unsplash.com/photo-1496449903678-68ddcb189a24",
            7,
            Rarity::Common,
        ),
    ]
}

/// The seeded reward tasks.
pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId::new(1),
            title: "Visit Local Shop A".to_string(),
            description: "Visit Local Shop A and scan the QR code to claim an exclusive NFT"
                .to_string(),
            progress: 0,
            shop_name: "Local Shop A".to_string(),
            reward: "Exclusive Shop A NFT".to_string(),
            expires_at: None,
            kind: TaskKind::Shop,
        },
        Task {
            id: TaskId::new(2),
            title: "Purchase from Local Shop B".to_string(),
            description: "Make a purchase at Local Shop B and claim your reward".to_string(),
            progress: 50,
            shop_name: "Local Shop B".to_string(),
            reward: "10% Discount on Next Purchase".to_string(),
            expires_at: None,
            kind: TaskKind::Shop,
        },
        Task {
            id: TaskId::new(3),
            title: "Collect 5 NFTs".to_string(),
            description: "Collect 5 different NFTs from any shop".to_string(),
            progress: 20,
            shop_name: "Platform Challenge".to_string(),
            reward: "Rare Platform NFT".to_string(),
            expires_at: None,
            kind: TaskKind::Platform,
        },
        Task {
            id: TaskId::new(4),
            title: "Summer Festival NFT Hunt".to_string(),
            description: "Visit 3 shops participating in the summer festival".to_string(),
            progress: 33,
            shop_name: "Summer Festival".to_string(),
            reward: "Limited Edition Summer NFT".to_string(),
            expires_at: Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).single(),
            kind: TaskKind::Event,
        },
    ]
}

/// The seeded shop reference data.
pub fn shops() -> Vec<Shop> {
    vec![
        Shop {
            id: ShopId::new(1),
            name: "Local Shop A".to_string(),
            logo: "https://via.placeholder.com/50".to_string(),
            location: Coordinate::new(40.7128, -74.006),
        },
        Shop {
            id: ShopId::new(2),
            name: "Local Shop B".to_string(),
            logo: "https://via.placeholder.com/50".to_string(),
            location: Coordinate::new(40.758, -73.9855),
        },
        Shop {
            id: ShopId::new(3),
            name: "Local Shop C".to_string(),
            logo: "https://via.placeholder.com/50".to_string(),
            location: Coordinate::new(40.7328, -73.986),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_counts() {
        assert_eq!(nfts().len(), 8);
        assert_eq!(tasks().len(), 4);
        assert_eq!(shops().len(), 3);
    }

    #[test]
    fn test_nft_ids_are_unique() {
        let seeded = nfts();
        let mut ids: Vec<_> = seeded.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seeded.len());
    }

    #[test]
    fn test_exactly_one_collect_challenge() {
        let collect: Vec<_> = tasks().into_iter().filter(Task::is_collect_challenge).collect();
        assert_eq!(collect.len(), 1);
        assert_eq!(collect.first().map(|t| t.id), Some(TaskId::new(3)));
    }
}
