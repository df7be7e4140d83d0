use serde::{Deserialize, Serialize};

/// Bohr radius in Angstrom
pub const BOHR: f64 = 0.52917721092;

/// Absolute tolerances for geometric equality tests
///
/// Distances are in bohr, angles in degrees. Passed explicitly into every
/// orientation, comparison and structure construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Distance tolerance in bohr
    pub distance: f64,
    /// Angle tolerance in degrees
    pub angle: f64,
}

impl Default for Tolerances {
    fn default() -> Tolerances {
        Tolerances {distance: 0.05, angle: 5.0}
    }
}

impl Tolerances {
    pub fn with_distance(mut self, distance: f64) -> Tolerances {
        self.distance = distance;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Tolerances {
        self.angle = angle;
        self
    }

    /// Whether two distances are equal within tolerance
    pub fn distances_equal(&self, a: f64, b: f64) -> bool {
        (b - a).abs() < self.distance
    }

    /// Whether two angles are equal within tolerance
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        (b - a).abs() < self.angle
    }
}

#[cfg(test)]
mod tests {
    use crate::tolerance::*;

    #[test]
    fn predicates() {
        let tolerances = Tolerances::default();
        assert!(tolerances.distances_equal(1.0, 1.049));
        assert!(!tolerances.distances_equal(1.0, 1.05));
        assert!(tolerances.angles_equal(180.0, 175.5));
        assert!(!tolerances.angles_equal(180.0, 174.0));

        let tight = tolerances.with_angle(0.5).with_distance(1e-3);
        assert!(!tight.angles_equal(180.0, 179.0));
        assert!(!tight.distances_equal(0.0, 0.01));
    }

    #[test]
    fn partial_deserialization() {
        let tolerances: Tolerances = serde_json::from_str(r#"{"angle": 2.5}"#).unwrap();
        assert_eq!(tolerances, Tolerances::default().with_angle(2.5));

        let json = serde_json::to_string(&tolerances).unwrap();
        assert_eq!(serde_json::from_str::<Tolerances>(&json).unwrap(), tolerances);
    }
}
