use math::Point;
use rand::Rng;

use super::{commons::FoodParams, geometry::Arena};

/// Index of a point in a [`FoodField`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FoodId(usize);

impl FoodId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Static food locations, fixed for the lifetime of a world.
#[derive(Clone, Debug, Default)]
pub struct FoodField {
    points: Vec<Point>,
}

impl FoodField {
    pub fn generate<R: Rng + ?Sized>(params: &FoodParams, arena: &Arena, rng: &mut R) -> Self {
        let region = params.region(arena);
        let points = (0..params.count)
            .map(|_| arena.random_passable_point_in(&region, rng))
            .collect();
        Self { points }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, id: FoodId) -> Option<Point> {
        self.points.get(id.0).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<FoodId> {
        (index < self.points.len()).then_some(FoodId(index))
    }

    /// Uniform choice among the points; `None` when the field is empty.
    pub fn random_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<FoodId> {
        if self.points.is_empty() {
            None
        } else {
            Some(FoodId(rng.gen_range(0..self.points.len())))
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
