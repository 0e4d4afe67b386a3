//! Wire and domain types for the Mapbox Directions API.

use geomint_core::Coordinate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Domain types
// =============================================================================

/// A walking route between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Ordered polyline of the route.
    pub geometry: Vec<Coordinate>,
    /// Ordered turn-by-turn instructions.
    pub steps: Vec<RouteStep>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Total duration in seconds.
    pub duration_s: f64,
}

/// One maneuver along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub distance_m: f64,
    pub duration_s: f64,
    /// Human instruction, e.g. "Turn left onto Rajpath".
    pub instruction: String,
    /// Maneuver type, e.g. "turn", "depart", "arrive".
    pub maneuver: String,
}

// =============================================================================
// Wire types
// =============================================================================

/// Top-level Directions API response.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRoute {
    pub geometry: WireGeometry,
    #[serde(default)]
    pub legs: Vec<WireLeg>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON line geometry; coordinates are `[lng, lat]` pairs.
#[derive(Debug, Deserialize)]
pub(crate) struct WireGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLeg {
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStep {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    pub maneuver: WireManeuver,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireManeuver {
    #[serde(default)]
    pub instruction: String,
    #[serde(rename = "type", default)]
    pub maneuver_type: String,
}

impl From<WireRoute> for Route {
    fn from(wire: WireRoute) -> Self {
        let geometry = wire
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::new(lat, lng))
            .collect();

        // Walking routes have a single leg; its steps are the itinerary.
        let steps = wire
            .legs
            .into_iter()
            .next()
            .map(|leg| {
                leg.steps
                    .into_iter()
                    .map(|step| RouteStep {
                        distance_m: step.distance,
                        duration_s: step.duration,
                        instruction: step.maneuver.instruction,
                        maneuver: step.maneuver.maneuver_type,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            geometry,
            steps,
            distance_m: wire.distance,
            duration_s: wire.duration,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "routes": [{
            "geometry": {
                "coordinates": [[77.2457196, 28.4996139], [77.244192, 28.4968497]]
            },
            "legs": [{
                "steps": [
                    {
                        "distance": 120.5,
                        "duration": 96.1,
                        "maneuver": {"instruction": "Head south on Rajpath", "type": "depart"}
                    },
                    {
                        "distance": 220.0,
                        "duration": 180.0,
                        "maneuver": {"instruction": "You have arrived", "type": "arrive"}
                    }
                ]
            }],
            "distance": 340.5,
            "duration": 276.1
        }]
    }"#;

    #[test]
    fn test_parse_and_convert_response() {
        let parsed: DirectionsResponse = serde_json::from_str(RESPONSE).unwrap();
        let route: Route = parsed.routes.into_iter().next().unwrap().into();

        // [lng, lat] pairs flip into lat/lng coordinates
        assert_eq!(route.geometry.len(), 2);
        assert_eq!(route.geometry[0], Coordinate::new(28.4996139, 77.2457196));

        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].maneuver, "depart");
        assert_eq!(route.steps[0].instruction, "Head south on Rajpath");
        assert!((route.distance_m - 340.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_routes_parse() {
        let parsed: DirectionsResponse = serde_json::from_str(r#"{"routes": []}"#).unwrap();
        assert!(parsed.routes.is_empty());
    }

    #[test]
    fn test_route_without_legs_converts() {
        let wire = WireRoute {
            geometry: WireGeometry { coordinates: vec![] },
            legs: vec![],
            distance: 0.0,
            duration: 0.0,
        };
        let route: Route = wire.into();
        assert!(route.steps.is_empty());
        assert!(route.geometry.is_empty());
    }
}
