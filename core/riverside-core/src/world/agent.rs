use super::{
    commons::{HealthStatus, ParamsForStep},
    food::{FoodField, FoodId},
    geometry::Arena,
};
use crate::{
    stat::HealthDiff,
    util::random::{self, hit},
};

use math::Point;
use rand::Rng;

/// Closer than this to the target counts as having reached the food.
const FOOD_ARRIVAL_DISTANCE: f64 = 2.0;
/// Distance covered per tick while walking towards food.
const FOOD_STEP: f64 = 1.5;
/// A tick moving less than this counts towards being stuck.
const STUCK_DISTANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfectionParam {
    /// Ticks spent infected since the last infection.
    pub ticks_infected: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HealthState {
    #[default]
    Healthy,
    Infected(InfectionParam),
    Recovered,
    Dead,
}

impl From<&HealthState> for HealthStatus {
    fn from(s: &HealthState) -> Self {
        match s {
            HealthState::Healthy => HealthStatus::Healthy,
            HealthState::Infected(_) => HealthStatus::Infected,
            HealthState::Recovered => HealthStatus::Recovered,
            HealthState::Dead => HealthStatus::Dead,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Body {
    pt: Point,
    v: Point,
}

impl Body {
    /// Flips the velocity component on the axis where the arena edge was
    /// reached, then pulls the position back into the arena.
    fn bounce(&mut self, arena: &Arena) {
        if self.pt.x <= 0.0 || self.pt.x >= arena.width {
            self.v.x = -self.v.x;
        }
        if self.pt.y <= 0.0 || self.pt.y >= arena.height {
            self.v.y = -self.v.y;
        }
        self.pt = arena.clamp(self.pt);
    }

    fn respawn<R: Rng + ?Sized>(&mut self, arena: &Arena, rng: &mut R) {
        self.pt = arena.random_spawn_point(rng);
        self.v = random::random_velocity(rng);
    }
}

/// What happened to an agent during [`Agent::advance`].
#[derive(Debug, Default, PartialEq)]
pub struct MoveInfo {
    pub health_diff: Option<HealthDiff>,
    pub respawned: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Agent {
    body: Body,
    health: HealthState,
    stuck_ticks: u32,
    food_target: Option<FoodId>,
}

impl Agent {
    /// A healthy agent at `pt` moving with `v`.
    pub fn new(pt: Point, v: Point) -> Self {
        Self {
            body: Body { pt, v },
            ..Default::default()
        }
    }

    pub fn spawn<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Self {
        let mut body = Body::default();
        body.respawn(arena, rng);
        Self {
            body,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Point {
        self.body.pt
    }

    pub fn velocity(&self) -> Point {
        self.body.v
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn status(&self) -> HealthStatus {
        (&self.health).into()
    }

    pub fn is_infected(&self) -> bool {
        matches!(self.health, HealthState::Infected(_))
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.health, HealthState::Dead)
    }

    /// Ticks since the current infection began; `None` unless infected.
    pub fn infection_duration(&self) -> Option<u32> {
        match &self.health {
            HealthState::Infected(ip) => Some(ip.ticks_infected),
            _ => None,
        }
    }

    pub fn stuck_ticks(&self) -> u32 {
        self.stuck_ticks
    }

    pub fn food_target(&self) -> Option<FoodId> {
        self.food_target
    }

    pub fn set_food_target(&mut self, target: Option<FoodId>) {
        self.food_target = target;
    }

    /// One tick of motion: food seeking or free walk, edge bounce, river
    /// collision, stuck detection and respawn. Dead agents stay put.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        foods: &FoodField,
        pfs: &ParamsForStep,
        rng: &mut R,
    ) -> MoveInfo {
        let mut info = MoveInfo::default();
        if self.is_dead() {
            return info;
        }
        let arena = &pfs.wp.arena;
        let old_pt = self.body.pt;

        match self.food_target.and_then(|id| foods.get(id)) {
            Some(target) => {
                let delta = target - old_pt;
                if delta.norm() < FOOD_ARRIVAL_DISTANCE {
                    self.food_target = None;
                    if matches!(self.health, HealthState::Healthy)
                        && hit(rng, pfs.wp.food.infection_probability)
                    {
                        info.health_diff = self.set_state(HealthState::Infected(Default::default()));
                    }
                } else if let Some(dir) = delta.normalized() {
                    self.body.pt += dir * FOOD_STEP;
                }
            }
            None => self.body.pt += self.body.v,
        }

        self.body.bounce(arena);

        if !arena.is_passable(&self.body.pt) {
            self.body.pt = old_pt;
            self.body.v = random::random_velocity(rng);
        }

        if old_pt.dist(&self.body.pt) < STUCK_DISTANCE {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }

        if self.stuck_ticks > pfs.stuck_threshold {
            tracing::debug!(
                from = %self.body.pt,
                ticks = self.stuck_ticks,
                "respawning stuck agent"
            );
            self.body.respawn(arena, rng);
            self.stuck_ticks = 0;
            info.respawned = true;
        }

        info
    }

    /// Recovery is tried first; death only when recovery did not happen.
    pub fn progress_disease<R: Rng + ?Sized>(
        &mut self,
        pfs: &ParamsForStep,
        rng: &mut R,
    ) -> Option<HealthDiff> {
        let HealthState::Infected(ip) = &mut self.health else {
            return None;
        };
        ip.ticks_infected += 1;
        let next = if hit(rng, pfs.wp.recovery_rate) {
            HealthState::Recovered
        } else if hit(rng, pfs.wp.mortality_rate) {
            HealthState::Dead
        } else {
            return None;
        };
        self.set_state(next)
    }

    /// Healthy agents always become infected; recovered ones only when
    /// reinfection is allowed. Anything else is left untouched.
    pub fn infect(&mut self, allow_reinfection: bool) -> Option<HealthDiff> {
        match self.health {
            HealthState::Healthy => {}
            HealthState::Recovered if allow_reinfection => {}
            HealthState::Recovered | HealthState::Infected(_) | HealthState::Dead => return None,
        }
        self.set_state(HealthState::Infected(InfectionParam::default()))
    }

    fn set_state(&mut self, new_state: HealthState) -> Option<HealthDiff> {
        let from: HealthStatus = (&self.health).into();
        self.health = new_state;
        let to: HealthStatus = (&self.health).into();
        if from == to {
            return None;
        }
        tracing::trace!(%from, %to, "health transition");
        Some(HealthDiff::new(from, to))
    }
}
