//! Shop reference data.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::types::id::ShopId;

/// A physical shop participating in the platform. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub logo: String,
    pub location: Coordinate,
}
