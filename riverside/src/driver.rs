use std::{
    thread,
    time::{Duration, Instant},
};

use riverside_core::{stat::HealthCount, HealthStatus, World};

#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub counts: HealthCount,
    pub ended: bool,
}

/// Steps a world repeatedly, optionally holding the configured tick rate.
pub struct TickDriver {
    world: World,
    period: Option<Duration>,
    report_every: u64,
}

impl TickDriver {
    pub fn new(world: World, realtime: bool, report_every: u64) -> Self {
        let period = realtime.then(|| Duration::from_secs_f64(1.0 / world.params().tick_rate as f64));
        Self {
            world,
            period,
            report_every,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Runs until `max_ticks` ticks have passed (0 means no limit) or no
    /// agent is infected any more.
    pub fn run(&mut self, max_ticks: u64) -> RunSummary {
        let mut last = Instant::now();
        loop {
            if self.world.is_ended() {
                tracing::info!(tick = self.world.tick(), "no infected agents left");
                break;
            }
            if max_ticks > 0 && self.world.tick() >= max_ticks {
                break;
            }
            let report = self.world.step();
            if self.report_every > 0 && report.tick % self.report_every == 0 {
                log_counts(report.tick, &report.counts);
            }
            if let Some(period) = self.period {
                let elapsed = last.elapsed();
                if elapsed < period {
                    thread::sleep(period - elapsed);
                }
                last = Instant::now();
            }
        }
        RunSummary {
            ticks: self.world.tick(),
            counts: self.world.health_count.clone(),
            ended: self.world.is_ended(),
        }
    }
}

pub fn log_counts(tick: u64, counts: &HealthCount) {
    tracing::info!(
        tick,
        healthy = counts[&HealthStatus::Healthy],
        infected = counts[&HealthStatus::Infected],
        recovered = counts[&HealthStatus::Recovered],
        dead = counts[&HealthStatus::Dead],
    );
}
