/// One segment of a filled outline, in label-local coordinates
/// (top-left origin, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    CubicTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// A closed-path shape filled with the nonzero winding rule. Glyph
/// runs are turned into outlines so every surface fills the same
/// geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    segments: Vec<PathSegment>,
}

impl Outline {
    pub fn new() -> Self {
        Outline::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Append an axis-aligned rectangle as a closed subpath.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.segments.extend([
            PathSegment::MoveTo(x, y),
            PathSegment::LineTo(x + width, y),
            PathSegment::LineTo(x + width, y + height),
            PathSegment::LineTo(x, y + height),
            PathSegment::Close,
        ]);
    }

    /// Bounding box of all points (control points included) as
    /// (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.segments.iter().flat_map(|seg| {
            let pts: Vec<(f64, f64)> = match *seg {
                PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => vec![(x, y)],
                PathSegment::QuadTo(x1, y1, x, y) => vec![(x1, y1), (x, y)],
                PathSegment::CubicTo(x1, y1, x2, y2, x, y) => {
                    vec![(x1, y1), (x2, y2), (x, y)]
                }
                PathSegment::Close => vec![],
            };
            pts
        });
        let (x, y) = points.next()?;
        Some(points.fold((x, y, x, y), |(x0, y0, x1, y1), (x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }
}
