use std::collections::HashSet;

use crate::config::RouterConfig;
use crate::geometry::{path_length, polyline_contains_point, Direction, Point, Rect};

use super::trial::{CutCtx, TrialId, TrialLine};

/// Tolerance (grid units) for rejecting spawn positions that land on a
/// previously routed polyline.
const REUSE_TOLERANCE: i32 = 2;

pub(crate) struct SearchOutcome {
    /// `None` means the search ran dry without a candidate; the caller
    /// keeps whatever polyline the path had before.
    pub(crate) points: Option<Vec<Point>>,
    pub(crate) line_count: u32,
}

/// One Mikami-Tabuchi line search. Trial lines live in an arena indexed by
/// `TrialId`, grouped per iteration into the four polarity/orientation
/// buckets; parent links form a tree walked back at traceback time. The
/// whole arena is dropped when the search ends.
pub(crate) struct LineSearch<'a> {
    ctx: CutCtx<'a>,
    step_size: i32,
    max_line_count: u32,
    point_set: &'a mut HashSet<Point>,
    routed: &'a [&'a [Point]],
    arena: Vec<TrialLine>,
    layers: Vec<[Vec<TrialId>; 4]>,
    result: Option<(TrialId, TrialId)>,
    line_count: u32,
}

impl<'a> LineSearch<'a> {
    pub(crate) fn new(
        obstacles: &'a [Rect],
        bounds: Rect,
        config: &RouterConfig,
        point_set: &'a mut HashSet<Point>,
        routed: &'a [&'a [Point]],
    ) -> Self {
        Self {
            ctx: CutCtx {
                obstacles,
                spacing: config.spacing,
                bounds,
            },
            step_size: config.step_size.max(1),
            max_line_count: config.max_line_count,
            point_set,
            routed,
            arena: Vec::new(),
            layers: Vec::new(),
            result: None,
            line_count: 0,
        }
    }

    pub(crate) fn run(
        mut self,
        start: Point,
        end: Point,
        child: bool,
        forbidden: Option<Direction>,
    ) -> SearchOutcome {
        if start == end {
            return SearchOutcome {
                points: Some(vec![start, end]),
                line_count: 0,
            };
        }
        self.seed(start, end, child, forbidden);
        loop {
            let iter = self.layers.len() - 1;
            self.layers.push(Default::default());
            let mut spawned = false;
            for bucket in 0..4 {
                let parents = self.layers[iter][bucket].clone();
                for parent in parents {
                    if !self.spawn_children(parent, iter + 1, &mut spawned) {
                        // budget exhausted: keep a result found earlier in
                        // this sweep, otherwise fall back to a straight shot
                        let points = self
                            .commit_result()
                            .unwrap_or_else(|| vec![start, end]);
                        return SearchOutcome {
                            points: Some(points),
                            line_count: self.line_count,
                        };
                    }
                }
            }
            // Full sweep of the layer before returning: a later trial in the
            // same layer may have replaced the result with a shorter pair.
            if let Some(points) = self.commit_result() {
                return SearchOutcome {
                    points: Some(points),
                    line_count: self.line_count,
                };
            }
            if !spawned {
                return SearchOutcome {
                    points: None,
                    line_count: self.line_count,
                };
            }
        }
    }

    /// Non-child paths leave their attached figure horizontally; the legs
    /// between bend points are unanchored and may radiate both ways.
    fn seed(&mut self, start: Point, end: Point, child: bool, forbidden: Option<Direction>) {
        self.layers.push(Default::default());
        let src = TrialLine::seed(start, true, false, forbidden, &self.ctx);
        let tgt = TrialLine::seed(end, false, false, forbidden, &self.ctx);
        self.file(src);
        self.file(tgt);
        if child {
            let src_vertical = TrialLine::seed(start, true, true, forbidden, &self.ctx);
            let tgt_vertical = TrialLine::seed(end, false, true, forbidden, &self.ctx);
            self.file(src_vertical);
            self.file(tgt_vertical);
        }
    }

    fn file(&mut self, line: TrialLine) {
        let id = self.arena.len();
        let bucket = line.bucket();
        self.arena.push(line);
        let last = self.layers.len() - 1;
        self.layers[last][bucket].push(id);
    }

    /// Walk the parent's span in both directions, spawning a perpendicular
    /// child every `step_size` units. Returns false once the line budget is
    /// spent.
    fn spawn_children(&mut self, parent: TrialId, layer: usize, spawned: &mut bool) -> bool {
        let (from_coord, span_start, span_finish, forbidden) = {
            let line = &self.arena[parent];
            (
                line.from.axis(line.vertical),
                line.start,
                line.finish,
                line.forbidden_interval(),
            )
        };
        let inside_forbidden =
            |at: i32| matches!(forbidden, Some((lo, hi)) if at >= lo && at <= hi);

        // Descending sweep, anchored just below the forbidden interval when
        // the origin sits inside it.
        let mut at = match forbidden {
            Some((lo, hi)) if from_coord >= lo && from_coord <= hi => lo - 1,
            _ => from_coord,
        };
        while at >= span_start {
            if !inside_forbidden(at) {
                if self.line_count >= self.max_line_count {
                    return false;
                }
                self.line_count += 1;
                if self.create_trial(parent, layer, at, spawned) {
                    break;
                }
            }
            at -= self.step_size;
        }

        // Ascending sweep.
        let mut at = match forbidden {
            Some((lo, hi)) if from_coord >= lo && from_coord <= hi => hi + 1,
            _ => from_coord,
        };
        while at < span_finish {
            if !inside_forbidden(at) {
                if self.line_count >= self.max_line_count {
                    return false;
                }
                self.line_count += 1;
                if self.create_trial(parent, layer, at, spawned) {
                    break;
                }
            }
            at += self.step_size;
        }
        true
    }

    /// Try to create a child of `parent` at position `at` along its axis.
    /// Returns true when the sweep that called us should stop: the child
    /// completed the first source/target connection of this search.
    fn create_trial(&mut self, parent: TrialId, layer: usize, at: i32, spawned: &mut bool) -> bool {
        let parent_line = &self.arena[parent];
        let from = if parent_line.vertical {
            Point::new(parent_line.from.x, at)
        } else {
            Point::new(at, parent_line.from.y)
        };
        if self.point_set.contains(&from) || self.on_previous_route(from) {
            return false;
        }
        let child = TrialLine::child(from, parent, parent_line, &self.ctx);
        let id = self.arena.len();
        let bucket = child.bucket();
        self.arena.push(child);
        self.layers[layer][bucket].push(id);
        *spawned = true;

        if let Some(hit) = self.find_intersection(id) {
            let meet = interception_point(&self.arena[id], &self.arena[hit]);
            if self.point_set.contains(&meet) {
                return false;
            }
            match self.result {
                None => {
                    self.result = Some((id, hit));
                    return true;
                }
                Some((held_a, held_b)) => {
                    let held = path_length(&self.trace_route(held_a, held_b));
                    let candidate = path_length(&self.trace_route(id, hit));
                    if held >= candidate {
                        self.result = Some((id, hit));
                    }
                }
            }
        }
        false
    }

    /// Scan layers newest-first for a crossing line in the opposing bucket.
    /// Later layers first is a heuristic only; any candidate passing the
    /// geometric test is valid.
    fn find_intersection(&self, id: TrialId) -> Option<TrialId> {
        let line = &self.arena[id];
        let bucket = line.opposing_bucket();
        for layer in self.layers.iter().rev() {
            for &other in &layer[bucket] {
                if line.intersects(&self.arena[other]) {
                    return Some(other);
                }
            }
        }
        None
    }

    fn on_previous_route(&self, p: Point) -> bool {
        self.routed
            .iter()
            .any(|points| polyline_contains_point(points, p, REUSE_TOLERANCE))
    }

    /// Traceback of the held result; its vertices are committed to the
    /// point set so later paths in the same pass avoid them.
    fn commit_result(&mut self) -> Option<Vec<Point>> {
        let (a, b) = self.result?;
        let route = self.trace_route(a, b);
        for point in &route {
            self.point_set.insert(*point);
        }
        Some(route)
    }

    /// Pure traceback: seed-to-tip walk of the source chain, the
    /// interception point, then the target chain tip-to-seed. Consecutive
    /// duplicates collapse, so segments strictly alternate orientation.
    fn trace_route(&self, a: TrialId, b: TrialId) -> Vec<Point> {
        let (src, tgt) = if self.arena[a].from_source {
            (a, b)
        } else {
            (b, a)
        };
        let mut points: Vec<Point> = Vec::new();
        let mut cursor = Some(src);
        while let Some(id) = cursor {
            let line = &self.arena[id];
            push_dedup(&mut points, line.from);
            cursor = line.parent;
        }
        points.reverse();
        push_dedup(&mut points, interception_point(&self.arena[src], &self.arena[tgt]));
        let mut cursor = Some(tgt);
        while let Some(id) = cursor {
            let line = &self.arena[id];
            push_dedup(&mut points, line.from);
            cursor = line.parent;
        }
        points
    }
}

fn push_dedup(points: &mut Vec<Point>, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

/// Crossing point of two perpendicular lines.
fn interception_point(a: &TrialLine, b: &TrialLine) -> Point {
    if a.vertical {
        Point::new(a.from.x, b.from.y)
    } else {
        Point::new(b.from.x, a.from.y)
    }
}
