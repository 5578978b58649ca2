use math::Point;
use rand::Rng;

/// Axis-aligned rectangle; all containment tests include the edges.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, pt: &Point) -> bool {
        self.x <= pt.x && pt.x <= self.right() && self.y <= pt.y && pt.y <= self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x <= other.x
            && other.right() <= self.right()
            && self.y <= other.y
            && other.bottom() <= self.bottom()
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Shrinks the rectangle by `margin` on every side.
    pub fn inset(&self, margin: f64) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - margin * 2.0,
            self.height - margin * 2.0,
        )
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.gen_range(self.x..=self.right()),
            rng.gen_range(self.y..=self.bottom()),
        )
    }
}

/// The arena `[0,W]×[0,H]` split by a vertical river band, crossable only
/// over the bridge rectangle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub river_x: f64,
    pub river_width: f64,
    pub bridge: Rect,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            river_x: 350.0,
            river_width: 100.0,
            bridge: Rect::new(350.0, 250.0, 100.0, 100.0),
        }
    }
}

impl Arena {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn river_rect(&self) -> Rect {
        Rect::new(self.river_x, 0.0, self.river_width, self.height)
    }

    pub fn bridge_rect(&self) -> Rect {
        self.bridge
    }

    /// The river test looks at the x-coordinate only.
    #[inline]
    pub fn is_in_river(&self, x: f64) -> bool {
        self.river_x <= x && x <= self.river_x + self.river_width
    }

    #[inline]
    pub fn is_in_bridge(&self, pt: &Point) -> bool {
        self.bridge.contains(pt)
    }

    /// Whether an agent may stand at `pt`: outside the river, or on the bridge.
    #[inline]
    pub fn is_passable(&self, pt: &Point) -> bool {
        !self.is_in_river(pt.x) || self.is_in_bridge(pt)
    }

    pub fn clamp(&self, pt: Point) -> Point {
        Point::new(pt.x.clamp(0.0, self.width), pt.y.clamp(0.0, self.height))
    }

    /// Uniform point in the arena that is passable. Terminates with
    /// probability 1 as long as the bridge has area.
    pub fn random_spawn_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        self.random_passable_point_in(&self.bounds(), rng)
    }

    /// Rejection sampling of passable points inside `region`.
    pub fn random_passable_point_in<R: Rng + ?Sized>(&self, region: &Rect, rng: &mut R) -> Point {
        loop {
            let pt = region.random_point(rng);
            if self.is_passable(&pt) {
                return pt;
            }
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.river_x.is_finite()
            && self.river_width.is_finite()
            && self.bridge.is_finite()
    }
}
