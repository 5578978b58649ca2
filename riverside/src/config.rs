use std::path::Path;

use anyhow::Context;
use riverside_core::WorldParams;

/// Reads world parameters from a JSON file; missing fields take their defaults.
pub fn load_params(path: &Path) -> anyhow::Result<WorldParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse config {}", path.display()))
}

/// Replaces the population size, lowering the initial infected count so it
/// still fits.
pub fn with_population(mut params: WorldParams, population: usize) -> WorldParams {
    params.population = population;
    params.initial_infected = params.initial_infected.min(population);
    params
}
