use enum_map::macros::Enum;
use math::{Point, Probability};

use super::geometry::{Arena, Rect};

#[derive(
    Eq,
    Hash,
    Enum,
    Clone,
    Copy,
    PartialEq,
    Debug,
    Default,
    strum::Display,
    strum::IntoStaticStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Infected,
    Recovered,
    Dead,
}

/// How the infection trial is drawn for a pair of agents within range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransmissionDraw {
    /// One draw per pair gates both directions.
    #[default]
    Shared,
    /// Each direction whose source is infected draws on its own.
    PerDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodParams {
    pub count: usize,
    /// Only used by renderers.
    pub radius: f64,
    pub infection_probability: Probability,
    /// Food is placed at least this far from the arena edges.
    pub margin: f64,
    /// Per-tick chance that an agent without a target picks one.
    pub assign_probability: Probability,
}

impl Default for FoodParams {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 5.0,
            infection_probability: Probability::new_unchecked(0.15),
            margin: 50.0,
            assign_probability: Probability::new_unchecked(0.002),
        }
    }
}

impl FoodParams {
    pub fn region(&self, arena: &Arena) -> Rect {
        arena.bounds().inset(self.margin)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldParams {
    pub population: usize,
    pub initial_infected: usize,
    pub arena: Arena,
    pub infection_radius: f64,
    pub infection_rate: Probability,
    pub recovery_rate: Probability,
    pub mortality_rate: Probability,
    pub tick_rate: u32,
    pub stuck_time_seconds: f64,
    pub allow_reinfection: bool,
    pub food: FoodParams,
    pub transmission_draw: TransmissionDraw,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            population: 100,
            initial_infected: 5,
            arena: Arena::default(),
            infection_radius: 10.0,
            infection_rate: Probability::new_unchecked(0.9),
            recovery_rate: Probability::new_unchecked(0.01),
            mortality_rate: Probability::new_unchecked(0.002),
            tick_rate: 30,
            stuck_time_seconds: 1.5,
            allow_reinfection: true,
            food: FoodParams::default(),
            transmission_draw: TransmissionDraw::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("arena must have positive finite size, got {width}x{height}")]
    InvalidArena { width: f64, height: f64 },
    #[error("river band [{x}, {right}] must lie inside the arena and have positive width")]
    RiverOutOfArena { x: f64, right: f64 },
    #[error("bridge must have positive width and height")]
    DegenerateBridge,
    #[error("bridge must lie inside the river band and the arena")]
    BridgeOutsideRiver,
    #[error("initial infected count {initial} exceeds population {population}")]
    TooManyInitialInfected { initial: usize, population: usize },
    #[error("infection radius must be positive, got {0}")]
    InvalidInfectionRadius(f64),
    #[error("tick rate must be positive")]
    InvalidTickRate,
    #[error("stuck time must be a non-negative number of seconds, got {0}")]
    InvalidStuckTime(f64),
    #[error("food margin must be a non-negative distance, got {0}")]
    InvalidFoodMargin(f64),
    #[error("food margin {0} leaves no room outside the river for food")]
    NoFoodSite(f64),
    #[error("agent {index} at {position} is off the arena or in the river")]
    AgentOffGround { index: usize, position: Point },
    #[error("food point {index} at {position} is off the arena or in the river")]
    FoodOffGround { index: usize, position: Point },
}

impl WorldParams {
    /// Number of consecutive stationary ticks after which an agent respawns.
    pub fn stuck_ticks_threshold(&self) -> u32 {
        (self.tick_rate as f64 * self.stuck_time_seconds).round() as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !arena.is_well_formed() || arena.width <= 0.0 || arena.height <= 0.0 {
            return Err(ConfigError::InvalidArena {
                width: arena.width,
                height: arena.height,
            });
        }
        let river = arena.river_rect();
        if river.width <= 0.0 || !arena.bounds().contains_rect(&river) {
            return Err(ConfigError::RiverOutOfArena {
                x: river.x,
                right: river.right(),
            });
        }
        if !arena.bridge.has_area() {
            return Err(ConfigError::DegenerateBridge);
        }
        if !river.contains_rect(&arena.bridge) {
            return Err(ConfigError::BridgeOutsideRiver);
        }
        if self.initial_infected > self.population {
            return Err(ConfigError::TooManyInitialInfected {
                initial: self.initial_infected,
                population: self.population,
            });
        }
        if !(self.infection_radius.is_finite() && self.infection_radius > 0.0) {
            return Err(ConfigError::InvalidInfectionRadius(self.infection_radius));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        if !(self.stuck_time_seconds.is_finite() && self.stuck_time_seconds >= 0.0) {
            return Err(ConfigError::InvalidStuckTime(self.stuck_time_seconds));
        }
        if !(self.food.margin.is_finite() && self.food.margin >= 0.0) {
            return Err(ConfigError::InvalidFoodMargin(self.food.margin));
        }
        if self.food.count > 0 {
            let region = self.food.region(arena);
            // the region must reach past the river band on at least one side
            let has_site = region.has_area()
                && (region.x < river.x || region.right() > river.right());
            if !has_site {
                return Err(ConfigError::NoFoodSite(self.food.margin));
            }
        }
        Ok(())
    }
}

/// Values shared by every agent during one tick.
pub struct ParamsForStep<'a> {
    pub wp: &'a WorldParams,
    pub stuck_threshold: u32,
}

impl<'a> ParamsForStep<'a> {
    pub fn new(wp: &'a WorldParams) -> Self {
        Self {
            wp,
            stuck_threshold: wp.stuck_ticks_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, HealthStatus, TransmissionDraw, WorldParams};
    use crate::world::geometry::Rect;

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(WorldParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_stuck_threshold_from_tick_rate() {
        let wp = WorldParams::default();
        assert_eq!(wp.stuck_ticks_threshold(), 45);
    }

    #[test]
    fn test_zero_area_bridge_is_fatal() {
        let mut wp = WorldParams::default();
        wp.arena.bridge.height = 0.0;
        assert_eq!(wp.validate(), Err(ConfigError::DegenerateBridge));
    }

    #[test]
    fn test_bridge_must_sit_in_river() {
        let mut wp = WorldParams::default();
        wp.arena.bridge = Rect::new(300.0, 250.0, 100.0, 100.0);
        assert_eq!(wp.validate(), Err(ConfigError::BridgeOutsideRiver));
    }

    #[test]
    fn test_initial_infected_bounded_by_population() {
        let wp = WorldParams {
            population: 3,
            initial_infected: 4,
            ..Default::default()
        };
        assert!(matches!(
            wp.validate(),
            Err(ConfigError::TooManyInitialInfected { .. })
        ));
    }

    #[test]
    fn test_food_needs_a_site_outside_the_river() {
        let mut wp = WorldParams::default();
        wp.food.margin = 360.0;
        assert_eq!(wp.validate(), Err(ConfigError::NoFoodSite(360.0)));
        wp.food.count = 0;
        assert_eq!(wp.validate(), Ok(()));
    }

    #[test]
    fn test_negative_food_margin_is_rejected() {
        let mut wp = WorldParams::default();
        wp.food.margin = -200.0;
        assert_eq!(wp.validate(), Err(ConfigError::InvalidFoodMargin(-200.0)));
        wp.food.count = 0;
        assert_eq!(wp.validate(), Err(ConfigError::InvalidFoodMargin(-200.0)));
        wp.food.margin = 0.0;
        assert_eq!(wp.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let wp: WorldParams = serde_json::from_str(
            r#"{ "population": 2, "infectionRate": 1.0, "transmissionDraw": "perDirection" }"#,
        )
        .unwrap();
        assert_eq!(wp.population, 2);
        assert_eq!(wp.infection_rate.r(), 1.0);
        assert_eq!(wp.transmission_draw, TransmissionDraw::PerDirection);
        assert_eq!(wp.tick_rate, 30);
        assert_eq!(wp.arena.bridge.y, 250.0);
    }

    #[test]
    fn test_out_of_range_rate_is_rejected() {
        let r = serde_json::from_str::<WorldParams>(r#"{ "recoveryRate": 1.2 }"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(HealthStatus::Recovered.to_string(), "recovered");
        let name: &'static str = HealthStatus::Dead.into();
        assert_eq!(name, "dead");
    }
}
