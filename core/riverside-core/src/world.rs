pub mod agent;
pub mod commons;
mod contact;
pub mod food;
pub mod geometry;

use math::Point;
use rand::SeedableRng;
use std::path::Path;

use self::{
    agent::Agent,
    commons::{ConfigError, HealthStatus, ParamsForStep, WorldParams},
    food::FoodField,
};
use crate::{
    stat::{HealthCount, HealthStat},
    util::random::{hit, WorldRng},
};

/// Position and status of one agent, as handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentView {
    pub position: Point,
    pub status: HealthStatus,
}

impl From<&Agent> for AgentView {
    fn from(a: &Agent) -> Self {
        Self {
            position: a.position(),
            status: a.status(),
        }
    }
}

/// Output of a tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: u64,
    pub counts: HealthCount,
    pub agents: Vec<AgentView>,
}

pub struct World {
    params: WorldParams,
    seed: u64,
    rng: WorldRng,
    agents: Vec<Agent>,
    food: FoodField,
    tick: u64,
    pub health_count: HealthCount,
    stat: HealthStat,
}

impl World {
    /// Builds a world with freshly spawned agents and food.
    pub fn new(params: WorldParams, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut rng = WorldRng::seed_from_u64(seed);
        let food = FoodField::generate(&params.food, &params.arena, &mut rng);
        let mut w = Self {
            agents: Vec::with_capacity(params.population),
            params,
            seed,
            rng,
            food,
            tick: 0,
            health_count: HealthCount::default(),
            stat: HealthStat::default(),
        };
        w.reset();
        Ok(w)
    }

    /// Builds a world around an existing population. `population` and
    /// `initial_infected` in `params` are overwritten to describe `agents`.
    /// Every agent and food point must stand on passable ground.
    pub fn with_agents(
        mut params: WorldParams,
        agents: Vec<Agent>,
        food: FoodField,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        params.population = agents.len();
        params.initial_infected = agents.iter().filter(|a| a.is_infected()).count();
        params.validate()?;
        let arena = params.arena;
        let on_ground =
            |pt: &Point| pt.is_finite() && arena.bounds().contains(pt) && arena.is_passable(pt);
        if let Some((index, a)) = agents
            .iter()
            .enumerate()
            .find(|(_, a)| !on_ground(&a.position()))
        {
            return Err(ConfigError::AgentOffGround {
                index,
                position: a.position(),
            });
        }
        if let Some((index, pt)) = food
            .points()
            .iter()
            .enumerate()
            .find(|(_, pt)| !on_ground(*pt))
        {
            return Err(ConfigError::FoodOffGround {
                index,
                position: *pt,
            });
        }
        let health_count = HealthCount::from_statuses(agents.iter().map(Agent::status));
        let mut stat = HealthStat::default();
        stat.push(&health_count);
        Ok(Self {
            params,
            seed,
            rng: WorldRng::seed_from_u64(seed),
            agents,
            food,
            tick: 0,
            health_count,
            stat,
        })
    }

    /// Respawns the population and seeds the initial infections. The food
    /// field is kept.
    pub fn reset(&mut self) {
        let arena = self.params.arena;
        self.agents.clear();
        for _ in 0..self.params.population {
            self.agents.push(Agent::spawn(&arena, &mut self.rng));
        }
        for a in self.agents.iter_mut().take(self.params.initial_infected) {
            a.infect(self.params.allow_reinfection);
        }
        self.tick = 0;
        self.health_count = HealthCount::from_statuses(self.agents.iter().map(Agent::status));
        self.stat.clear();
        self.stat.push(&self.health_count);
        tracing::debug!(
            population = self.params.population,
            infected = self.params.initial_infected,
            seed = self.seed,
            "world reset"
        );
    }

    pub fn step(&mut self) -> TickReport {
        let pfs = ParamsForStep::new(&self.params);

        for (idx, agent) in self.agents.iter_mut().enumerate() {
            let info = agent.advance(&self.food, &pfs, &mut self.rng);
            if let Some(hd) = info.health_diff {
                self.health_count.apply_difference(hd);
            }
            if info.respawned {
                tracing::debug!(agent = idx, tick = self.tick, "respawned");
            }
            if let Some(hd) = agent.progress_disease(&pfs, &mut self.rng) {
                self.health_count.apply_difference(hd);
            }
        }

        let assign = self.params.food.assign_probability;
        for agent in &mut self.agents {
            if agent.food_target().is_none() && hit(&mut self.rng, assign) {
                agent.set_food_target(self.food.random_target(&mut self.rng));
            }
        }

        let positions: Vec<Point> = self.agents.iter().map(Agent::position).collect();
        let pairs = contact::close_pairs(&positions, self.params.infection_radius);
        let n_new = contact::transmit(
            &mut self.agents,
            &pairs,
            &pfs,
            &mut self.rng,
            &mut self.health_count,
        );
        if n_new > 0 {
            tracing::trace!(tick = self.tick, n_new, "contact infections");
        }

        debug_assert_eq!(self.health_count.total() as usize, self.agents.len());
        self.tick += 1;
        self.stat.push(&self.health_count);
        self.snapshot()
    }

    pub fn snapshot(&self) -> TickReport {
        TickReport {
            tick: self.tick,
            counts: self.health_count.clone(),
            agents: self.agents.iter().map(AgentView::from).collect(),
        }
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.health_count.n_infected() == 0
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn food(&self) -> &FoodField {
        &self.food
    }

    pub fn food_points(&self) -> &[Point] {
        self.food.points()
    }

    /// Counts recorded so far; entry 0 is the state right after reset.
    /// One row is kept per tick until the next [`World::reset`].
    pub fn history(&self) -> &HealthStat {
        &self.stat
    }

    pub fn export(&self, path: &Path) -> anyhow::Result<()> {
        self.stat.export(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{agent::Agent, food::FoodField, World};
    use crate::{
        stat::HealthCount,
        world::commons::{ConfigError, HealthStatus, WorldParams},
    };
    use math::{Point, Probability};

    #[test]
    fn test_new_seeds_initial_infections() {
        let w = World::new(WorldParams::default(), 1).unwrap();
        assert_eq!(w.agents().len(), 100);
        assert_eq!(w.health_count[&HealthStatus::Infected], 5);
        assert_eq!(w.health_count[&HealthStatus::Healthy], 95);
        assert!(w.agents()[..5].iter().all(Agent::is_infected));
        assert_eq!(w.food_points().len(), 5);
        assert_eq!(w.history().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut wp = WorldParams::default();
        wp.arena.bridge.width = 0.0;
        assert_eq!(
            World::new(wp, 0).err(),
            Some(ConfigError::DegenerateBridge)
        );
    }

    #[test]
    fn test_step_report_matches_state() {
        let mut w = World::new(WorldParams::default(), 7).unwrap();
        let report = w.step();
        assert_eq!(report.tick, 1);
        assert_eq!(report.agents.len(), 100);
        assert_eq!(report.counts.total(), 100);
        let recount = HealthCount::from_statuses(report.agents.iter().map(|a| a.status));
        assert_eq!(recount, report.counts);
        assert_eq!(w.history().len(), 2);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = World::new(WorldParams::default(), 99).unwrap();
        let mut b = World::new(WorldParams::default(), 99).unwrap();
        for _ in 0..200 {
            let ra = a.step();
            let rb = b.step();
            assert_eq!(ra.agents, rb.agents);
        }
    }

    #[test]
    fn test_two_agent_certain_transmission() {
        let wp = WorldParams {
            infection_radius: 10.0,
            infection_rate: Probability::ONE,
            recovery_rate: Probability::ZERO,
            mortality_rate: Probability::ZERO,
            ..Default::default()
        };
        let mut sick = Agent::new(Point::new(0.0, 0.0), Point::ORIGIN);
        sick.infect(false);
        let well = Agent::new(Point::new(1.0, 0.0), Point::ORIGIN);
        let mut w = World::with_agents(wp, vec![sick, well], FoodField::default(), 0).unwrap();
        let report = w.step();
        assert_eq!(report.counts[&HealthStatus::Infected], 2);
        assert!(!w.is_ended());
    }

    #[test]
    fn test_reset_restores_initial_partition() {
        let mut w = World::new(WorldParams::default(), 3).unwrap();
        for _ in 0..50 {
            w.step();
        }
        let food_before = w.food_points().to_vec();
        w.reset();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.health_count[&HealthStatus::Infected], 5);
        assert_eq!(w.food_points(), &food_before[..]);
        assert_eq!(w.history().len(), 1);
    }

    #[test]
    fn test_idle_agents_take_targets_at_certain_assignment() {
        let mut wp = WorldParams::default();
        wp.food.assign_probability = Probability::ONE;
        let mut w = World::new(wp, 11).unwrap();
        assert!(w.agents().iter().all(|a| a.food_target().is_none()));
        w.step();
        assert!(w.agents().iter().all(|a| a.food_target().is_some()));
    }

    #[test]
    fn test_zero_assignment_never_sets_targets() {
        let mut wp = WorldParams::default();
        wp.food.assign_probability = Probability::ZERO;
        let mut w = World::new(wp, 12).unwrap();
        for _ in 0..200 {
            w.step();
            assert!(w.agents().iter().all(|a| a.food_target().is_none()));
        }
    }

    #[test]
    fn test_existing_target_is_kept() {
        let mut wp = WorldParams::default();
        wp.food.assign_probability = Probability::ONE;
        let food = FoodField::from_points(
            (0..10)
                .map(|i| Point::new(60.0 + i as f64 * 25.0, 500.0))
                .collect(),
        );
        let mut walker = Agent::new(Point::new(100.0, 100.0), Point::ORIGIN);
        walker.set_food_target(food.id_of(7));
        let mut w = World::with_agents(wp, vec![walker], food, 13).unwrap();
        for _ in 0..20 {
            w.step();
            assert_eq!(w.agents()[0].food_target(), w.food().id_of(7));
        }
    }

    #[test]
    fn test_empty_food_field_assigns_nothing() {
        let mut wp = WorldParams::default();
        wp.food.assign_probability = Probability::ONE;
        let agents = vec![
            Agent::new(Point::new(100.0, 100.0), Point::new(1.0, 0.0)),
            Agent::new(Point::new(600.0, 100.0), Point::new(0.0, 1.0)),
        ];
        let mut w = World::with_agents(wp, agents, FoodField::default(), 14).unwrap();
        for _ in 0..10 {
            w.step();
        }
        assert!(w.agents().iter().all(|a| a.food_target().is_none()));
    }

    #[test]
    fn test_agents_must_start_on_passable_ground() {
        let wp = WorldParams::default();
        let on_bridge = Agent::new(Point::new(400.0, 300.0), Point::ORIGIN);
        for (pt, ok) in [
            (Point::new(400.0, 100.0), false),
            (Point::new(-5.0, 10.0), false),
            (Point::new(100.0, 700.0), false),
            (Point::new(100.0, 100.0), true),
        ] {
            let agents = vec![on_bridge.clone(), Agent::new(pt, Point::ORIGIN)];
            let r = World::with_agents(wp.clone(), agents, FoodField::default(), 0);
            if ok {
                assert!(r.is_ok());
            } else {
                assert_eq!(
                    r.err(),
                    Some(ConfigError::AgentOffGround {
                        index: 1,
                        position: pt
                    })
                );
            }
        }
    }

    #[test]
    fn test_food_must_sit_on_passable_ground() {
        let food = FoodField::from_points(vec![Point::new(100.0, 100.0), Point::new(400.0, 50.0)]);
        let agents = vec![Agent::new(Point::new(100.0, 100.0), Point::ORIGIN)];
        assert_eq!(
            World::with_agents(WorldParams::default(), agents, food, 0).err(),
            Some(ConfigError::FoodOffGround {
                index: 1,
                position: Point::new(400.0, 50.0)
            })
        );
    }
}
