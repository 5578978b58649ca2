use super::{
    agent::Agent,
    commons::{ParamsForStep, TransmissionDraw},
};
use crate::{
    stat::{HealthCount, HealthDiff},
    util::random::hit,
};

use math::Point;
use rand::Rng;
use rayon::prelude::*;

/// Index pairs `(i, j)` with `i < j` closer than `radius`, ascending.
pub fn close_pairs(positions: &[Point], radius: f64) -> Vec<(usize, usize)> {
    let n = positions.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = positions[i];
            ((i + 1)..n)
                .filter(move |&j| a.dist(&positions[j]) < radius)
                .map(move |j| (i, j))
        })
        .collect()
}

fn pair_mut(agents: &mut [Agent], i: usize, j: usize) -> (&mut Agent, &mut Agent) {
    debug_assert!(i < j);
    let (left, right) = agents.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

/// Runs the infection trials over `pairs` in order. Statuses are read live,
/// so an agent infected earlier in the pass can pass it on later in it.
/// Returns the number of new infections.
pub fn transmit<R: Rng + ?Sized>(
    agents: &mut [Agent],
    pairs: &[(usize, usize)],
    pfs: &ParamsForStep,
    rng: &mut R,
    health_count: &mut HealthCount,
) -> u32 {
    let wp = pfs.wp;
    let mut n_new = 0;
    let mut record = |hd: Option<HealthDiff>| {
        if let Some(hd) = hd {
            health_count.apply_difference(hd);
            n_new += 1;
        }
    };
    for &(i, j) in pairs {
        let (a, b) = pair_mut(agents, i, j);
        match wp.transmission_draw {
            TransmissionDraw::Shared => {
                if !hit(rng, wp.infection_rate) {
                    continue;
                }
                if a.is_infected() {
                    record(b.infect(wp.allow_reinfection));
                }
                if b.is_infected() {
                    record(a.infect(wp.allow_reinfection));
                }
            }
            TransmissionDraw::PerDirection => {
                if a.is_infected() && hit(rng, wp.infection_rate) {
                    record(b.infect(wp.allow_reinfection));
                }
                if b.is_infected() && hit(rng, wp.infection_rate) {
                    record(a.infect(wp.allow_reinfection));
                }
            }
        }
    }
    n_new
}
