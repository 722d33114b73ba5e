//! Real Beijing locations and a test waypoint type.

use nav_planner::Coordinate;
use nav_planner::traits::Waypoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn waypoint(&self) -> TestWaypoint {
        TestWaypoint::new(self.name).at(self.lat, self.lng)
    }
}

// ============================================================================
// Central Beijing landmarks
// ============================================================================

pub const TIANANMEN: Location = Location::new("Tiananmen Square", 39.9055, 116.3976);
pub const FORBIDDEN_CITY: Location = Location::new("Forbidden City", 39.9163, 116.3972);
pub const JINGSHAN_PARK: Location = Location::new("Jingshan Park", 39.9250, 116.3967);
pub const BEIHAI_PARK: Location = Location::new("Beihai Park", 39.9254, 116.3840);
pub const NANLUOGUXIANG: Location = Location::new("Nanluoguxiang", 39.9370, 116.4031);
pub const LAMA_TEMPLE: Location = Location::new("Lama Temple", 39.9472, 116.4172);
pub const TEMPLE_OF_HEAVEN: Location = Location::new("Temple of Heaven", 39.8822, 116.4066);
pub const SANLITUN: Location = Location::new("Sanlitun", 39.9339, 116.4551);

pub const DAY_TOUR: &[Location] = &[
    TIANANMEN,
    FORBIDDEN_CITY,
    JINGSHAN_PARK,
    BEIHAI_PARK,
    NANLUOGUXIANG,
    LAMA_TEMPLE,
];

/// City code the transit API expects for Beijing.
pub const BEIJING_CITY_CODE: &str = "010";

pub fn waypoints(locations: &[Location]) -> Vec<TestWaypoint> {
    locations.iter().map(Location::waypoint).collect()
}

/// Builder for test waypoints with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestWaypoint {
    id: String,
    name: String,
    coordinate: Option<Coordinate>,
}

impl TestWaypoint {
    pub fn new(name: &str) -> Self {
        Self {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            coordinate: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinate = Some(Coordinate::new(lat, lng));
        self
    }
}

impl Waypoint for TestWaypoint {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }
}
