use super::Vec3;

/// Direction reported for a degenerate (zero-length) path
pub const FALLBACK_DIRECTION: Vec3 = Vec3::RIGHT;

/// Polyline path with distance-based sampling.
///
/// Roots only ever use two control points, giving a straight line between the anchors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthPath {
    points: Vec<Vec3>,
    length: f32,
}

impl GrowthPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight path from `start` to `end`
    pub fn between(start: Vec3, end: Vec3) -> Self {
        let mut path = Self::new();
        path.build(start, end);
        path
    }

    /// Replace all points with exactly `[start, end]`
    pub fn build(&mut self, start: Vec3, end: Vec3) {
        self.set_points(&[start, end]);
    }

    /// Replace all points and recompute the cached length
    pub fn set_points(&mut self, points: &[Vec3]) {
        self.points.clear();
        self.points.extend_from_slice(points);
        self.length = self
            .points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum();
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn total_length(&self) -> f32 {
        self.length
    }

    /// Position at distance `d` from the start, clamped to the path
    pub fn point_at_distance(&self, d: f32) -> Vec3 {
        match self.points.len() {
            0 => Vec3::ZERO,
            1 => self.points[0],
            _ => {
                let (a, b, t) = self.locate(d);
                a.lerp(&b, t)
            }
        }
    }

    /// Unit tangent at distance `d` from the start
    pub fn direction_at_distance(&self, d: f32) -> Vec3 {
        if self.points.len() < 2 || self.length <= 0.0 {
            return FALLBACK_DIRECTION;
        }
        let (a, b, _) = self.locate(d);
        (b - a).try_normalize().unwrap_or(FALLBACK_DIRECTION)
    }

    /// Find the segment containing distance `d` and the local parameter within it.
    /// Zero-length segments are skipped so the returned segment has a usable direction.
    fn locate(&self, d: f32) -> (Vec3, Vec3, f32) {
        let first = self.points[0];
        if self.length <= 0.0 {
            return (first, first, 0.0);
        }

        let d = d.clamp(0.0, self.length);
        let mut travelled = 0.0;
        let mut last = (first, self.points[1], 0.0);

        for w in self.points.windows(2) {
            let seg = w[0].distance(&w[1]);
            if seg <= 0.0 {
                continue;
            }
            last = (w[0], w[1], 1.0);
            if d <= travelled + seg {
                return (w[0], w[1], ((d - travelled) / seg).clamp(0.0, 1.0));
            }
            travelled += seg;
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(&b) < 0.0001
    }

    #[test]
    fn test_length_is_euclidean_distance() {
        let path = GrowthPath::between(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 6.0, 3.0));
        assert!((path.total_length() - 5.0).abs() < 0.0001);
        assert_eq!(path.points().len(), 2);
    }

    #[test]
    fn test_endpoints() {
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(100.0, 0.0, 0.0);
        let path = GrowthPath::between(start, end);

        assert!(close(path.point_at_distance(0.0), start));
        assert!(close(path.point_at_distance(path.total_length()), end));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(0.0, 10.0, 0.0);
        let path = GrowthPath::between(start, end);

        assert!(close(path.point_at_distance(-5.0), start));
        assert!(close(path.point_at_distance(25.0), end));
    }

    #[test]
    fn test_monotonic_interpolation() {
        let path = GrowthPath::between(Vec3::ZERO, Vec3::new(30.0, 40.0, 0.0));
        let mut prev = -1.0;
        for i in 0..=50 {
            let d = i as f32;
            let p = path.point_at_distance(d);
            let from_start = p.distance(&Vec3::ZERO);
            assert!((from_start - d).abs() < 0.001);
            assert!(from_start > prev);
            prev = from_start;
        }
    }

    #[test]
    fn test_direction_is_constant_on_straight_path() {
        let path = GrowthPath::between(Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0));
        for d in [0.0, 4.0, 8.0, 12.0] {
            assert!(close(path.direction_at_distance(d), Vec3::new(0.0, 0.0, -1.0)));
        }
    }

    #[test]
    fn test_zero_length_path() {
        let p = Vec3::new(5.0, 5.0, 5.0);
        let path = GrowthPath::between(p, p);

        assert_eq!(path.total_length(), 0.0);
        assert!(close(path.point_at_distance(0.0), p));
        assert!(close(path.point_at_distance(10.0), p));
        assert_eq!(path.direction_at_distance(0.0), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_rebuild_replaces_points() {
        let mut path = GrowthPath::between(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        path.build(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(path.points().len(), 2);
        assert!((path.total_length() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_polyline_walk() {
        let mut path = GrowthPath::new();
        path.set_points(&[
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ]);

        assert!((path.total_length() - 20.0).abs() < 0.0001);
        assert!(close(path.point_at_distance(15.0), Vec3::new(10.0, 5.0, 0.0)));
        assert!(close(path.direction_at_distance(5.0), Vec3::RIGHT));
        assert!(close(path.direction_at_distance(15.0), Vec3::UP));
    }

    #[test]
    fn test_empty_path() {
        let path = GrowthPath::new();
        assert_eq!(path.total_length(), 0.0);
        assert_eq!(path.point_at_distance(3.0), Vec3::ZERO);
        assert_eq!(path.direction_at_distance(3.0), FALLBACK_DIRECTION);
    }
}
