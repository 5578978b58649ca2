use math::{Point, Probability};
use rand::Rng;
use rand_distr::Uniform;

/// Generator owned by a world; seeding it fixes the whole trajectory.
pub type WorldRng = rand_chacha::ChaCha8Rng;

/// Per-axis bound of a freshly drawn velocity.
pub const MAX_SPEED: f64 = 2.0;

/// One Bernoulli trial: `p = 0` never hits, `p = 1` always does.
#[inline]
pub fn hit<R: Rng + ?Sized>(rng: &mut R, p: Probability) -> bool {
    rng.gen::<f64>() < p.r()
}

pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Point {
    let axis = Uniform::new_inclusive(-MAX_SPEED, MAX_SPEED);
    Point::new(rng.sample(&axis), rng.sample(&axis))
}

#[cfg(test)]
mod tests {
    use super::{hit, random_velocity, WorldRng, MAX_SPEED};
    use math::Probability;
    use rand::SeedableRng;

    #[test]
    fn test_hit_extremes() {
        let rng = &mut WorldRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(!hit(rng, Probability::ZERO));
            assert!(hit(rng, Probability::ONE));
        }
    }

    #[test]
    fn test_velocity_is_bounded() {
        let rng = &mut WorldRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = random_velocity(rng);
            assert!(v.x.abs() <= MAX_SPEED && v.y.abs() <= MAX_SPEED);
        }
    }
}
