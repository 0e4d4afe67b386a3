//! Core types for GeoMint.
//!
//! This module provides the domain model shared by every component.

pub mod id;
pub mod nft;
pub mod rarity;
pub mod shop;
pub mod task;

pub use id::*;
pub use nft::{ClaimedNft, Nft};
pub use rarity::{Rarity, RarityFilter};
pub use shop::Shop;
pub use task::{Task, TaskKind};
