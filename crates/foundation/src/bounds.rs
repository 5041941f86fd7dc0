/// Axis-aligned bounding box in 2D (diagram units or `[lng, lat]` degrees).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Smallest box containing every point; `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Aabb2::new(first, first);
        for p in iter {
            out.extend(p);
        }
        Some(out)
    }

    pub fn extend(&mut self, p: [f64; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn from_points_covers_all() {
        let b = Aabb2::from_points([[-8.0, 31.6], [-4.0, 34.0], [-3.0, 16.5]]).expect("bounds");
        assert_eq!(b.min, [-8.0, 16.5]);
        assert_eq!(b.max, [-3.0, 34.0]);
        assert_eq!(b.center(), [-5.5, 25.25]);
        assert!(b.contains([-5.0, 20.0]));
        assert!(!b.contains([0.0, 20.0]));
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(Aabb2::from_points(Vec::<[f64; 2]>::new()).is_none());
    }
}
