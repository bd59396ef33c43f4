use crate::geometry::{Direction, Point};

/// One connection to route: two endpoints, optional mandatory waypoints,
/// and the computed polyline. A path is either a user path (may own child
/// sub-paths, one per leg between waypoints) or an internally created child
/// sub-path.
#[derive(Debug, Clone)]
pub struct OrthogonalPath {
    start: Point,
    end: Point,
    bend_points: Vec<Point>,
    forbidden_direction: Option<Direction>,
    points: Vec<Point>,
    dirty: bool,
    child: bool,
}

impl OrthogonalPath {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            bend_points: Vec::new(),
            forbidden_direction: None,
            points: Vec::new(),
            dirty: true,
            child: false,
        }
    }

    pub(crate) fn new_child(start: Point, end: Point) -> Self {
        Self {
            child: true,
            ..Self::new(start, end)
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn set_start(&mut self, start: Point) {
        if self.start != start {
            self.start = start;
            self.dirty = true;
        }
    }

    pub fn set_end(&mut self, end: Point) {
        if self.end != end {
            self.end = end;
            self.dirty = true;
        }
    }

    /// Mandatory interior waypoints, in order. A user path with k bend
    /// points is routed as k + 1 chained sub-paths.
    pub fn bend_points(&self) -> &[Point] {
        &self.bend_points
    }

    pub fn set_bend_points(&mut self, bend_points: Vec<Point>) {
        self.bend_points = bend_points;
        self.dirty = true;
    }

    pub fn forbidden_direction(&self) -> Option<Direction> {
        self.forbidden_direction
    }

    pub fn set_forbidden_direction(&mut self, direction: Option<Direction>) {
        self.forbidden_direction = direction;
        self.dirty = true;
    }

    /// The routed polyline; empty until the first successful solve.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.dirty = false;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Request a re-route on the next solve, e.g. after obstacles moved.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_child(&self) -> bool {
        self.child
    }

    /// Forbid spawning back toward the predecessor leg's origin. Used for
    /// the interior legs of a decomposed user path.
    pub(crate) fn update_forbidden_direction(&mut self, predecessor_origin: Point) {
        self.forbidden_direction = Direction::between(self.start, predecessor_origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_mutation_marks_dirty() {
        let mut path = OrthogonalPath::new(Point::new(0, 0), Point::new(10, 0));
        path.set_points(vec![Point::new(0, 0), Point::new(10, 0)]);
        assert!(!path.is_dirty());
        path.set_end(Point::new(10, 0));
        assert!(!path.is_dirty(), "unchanged endpoint must not dirty");
        path.set_end(Point::new(20, 0));
        assert!(path.is_dirty());
    }

    #[test]
    fn forbidden_direction_points_back_at_the_predecessor() {
        let mut leg = OrthogonalPath::new_child(Point::new(300, 300), Point::new(500, 300));
        leg.update_forbidden_direction(Point::new(300, 100));
        assert_eq!(leg.forbidden_direction(), Some(Direction::Up));
        leg.update_forbidden_direction(Point::new(100, 290));
        assert_eq!(leg.forbidden_direction(), Some(Direction::Left));
    }
}
