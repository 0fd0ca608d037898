//! Galaxy parameter set (parsed from TOML)

use nebula_core::{hex_color, Color, NebulaError, Result};
use serde::{Deserialize, Serialize};

/// Largest cloud that fits one 128 MiB storage binding of 32-byte instances
pub const MAX_POINT_COUNT: u32 = 4_194_304;

/// Parameters for one galaxy generation call.
///
/// Every key is optional in TOML; missing keys fall back to the built-in
/// galaxy. `inside_color` and `outside_color` are carried for configuration
/// compatibility only: generated points always use the fixed sky-blue color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalaxyParams {
    /// Number of points
    pub count: u32,
    /// Point size in world units
    pub size: f32,
    /// Outer radius of the spiral
    pub radius: f32,
    /// Number of spiral arms
    pub branches: u32,
    pub randomness: f32,
    pub randomness_power: f32,
    #[serde(with = "hex_color")]
    pub inside_color: Color,
    #[serde(with = "hex_color")]
    pub outside_color: Color,
    /// Sphere rotation added every frame, in radians
    pub rotation_speed: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 200_000,
            size: 0.02,
            radius: 3.0,
            branches: 4,
            randomness: 0.3,
            randomness_power: 0.0,
            inside_color: Color::from_hex(0xFF6030),
            outside_color: Color::from_hex(0x1B3984),
            rotation_speed: 4.0,
        }
    }
}

impl GalaxyParams {
    /// Parse a parameter set from a TOML `[galaxy]` table body
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    /// Check the invariants the generator relies on.
    ///
    /// `branches` is used as a modulus and `radius` as a divisor, so both
    /// must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(NebulaError::invalid("count", "must be greater than 0"));
        }
        if self.count > MAX_POINT_COUNT {
            return Err(NebulaError::invalid(
                "count",
                format!("must be at most {}, got {}", MAX_POINT_COUNT, self.count),
            ));
        }
        if !(self.size > 0.0 && self.size.is_finite()) {
            return Err(NebulaError::invalid("size", format!("must be > 0, got {}", self.size)));
        }
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(NebulaError::invalid(
                "radius",
                format!("must be > 0, got {}", self.radius),
            ));
        }
        if self.branches == 0 {
            return Err(NebulaError::invalid("branches", "must be at least 1"));
        }
        if !(self.randomness >= 0.0 && self.randomness.is_finite()) {
            return Err(NebulaError::invalid(
                "randomness",
                format!("must be >= 0, got {}", self.randomness),
            ));
        }
        if !(self.randomness_power >= 0.0 && self.randomness_power.is_finite()) {
            return Err(NebulaError::invalid(
                "randomness_power",
                format!("must be >= 0, got {}", self.randomness_power),
            ));
        }
        if !self.rotation_speed.is_finite() {
            return Err(NebulaError::invalid("rotation_speed", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_galaxy() {
        let p = GalaxyParams::default();
        assert_eq!(p.count, 200_000);
        assert_eq!(p.branches, 4);
        assert!((p.radius - 3.0).abs() < f32::EPSILON);
        assert_eq!(p.inside_color.to_hex_string(), "#ff6030");
        assert_eq!(p.outside_color.to_hex_string(), "#1b3984");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn parse_partial_table() {
        let p = GalaxyParams::from_toml_str(
            r##"
            count = 1000
            branches = 3
            inside_color = "#ffffff"
            "##,
        )
        .unwrap();
        assert_eq!(p.count, 1000);
        assert_eq!(p.branches, 3);
        assert_eq!(p.inside_color, Color::WHITE);
        // Untouched keys keep their defaults
        assert!((p.randomness - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn reject_zero_branches() {
        let err = GalaxyParams::from_toml_str("branches = 0").unwrap_err();
        assert!(matches!(err, NebulaError::InvalidParameter { ref field, .. } if field == "branches"));
    }

    #[test]
    fn count_is_bounded() {
        let at_limit = GalaxyParams {
            count: MAX_POINT_COUNT,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let err = GalaxyParams::from_toml_str("count = 5000000").unwrap_err();
        assert!(matches!(err, NebulaError::InvalidParameter { ref field, .. } if field == "count"));
    }

    #[test]
    fn reject_non_positive_radius() {
        let p = GalaxyParams {
            radius: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn reject_unknown_key() {
        let err = GalaxyParams::from_toml_str("brnaches = 4").unwrap_err();
        assert!(matches!(err, NebulaError::TomlParse(_)));
    }

    #[test]
    fn reject_bad_color() {
        assert!(GalaxyParams::from_toml_str(r##"outside_color = "blue""##).is_err());
    }
}
