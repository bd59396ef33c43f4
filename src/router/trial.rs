use crate::geometry::{Direction, Point, Rect};

// ── Layer buckets ───────────────────────────────────────────────────
// Only perpendicular lines of opposite polarity can meet, so each layer
// keeps its lines in four buckets and intersection tests read exactly one.
pub(crate) const SOURCE_VERTICAL: usize = 0;
pub(crate) const SOURCE_HORIZONTAL: usize = 1;
pub(crate) const TARGET_VERTICAL: usize = 2;
pub(crate) const TARGET_HORIZONTAL: usize = 3;

/// Index of a trial line within the per-search arena.
pub(crate) type TrialId = usize;

/// Geometry borrowed from the router for span cutting.
pub(crate) struct CutCtx<'a> {
    pub(crate) obstacles: &'a [Rect],
    pub(crate) spacing: i32,
    pub(crate) bounds: Rect,
}

/// One axis-aligned candidate line of the search. The valid span along the
/// line's axis is the half-open `[start, finish)`; `forbidden_start` /
/// `forbidden_finish` delimit a sub-interval no child may be spawned from,
/// where a `None` side extends to the corresponding span end.
pub(crate) struct TrialLine {
    pub(crate) from: Point,
    pub(crate) vertical: bool,
    pub(crate) from_source: bool,
    pub(crate) start: i32,
    pub(crate) finish: i32,
    pub(crate) forbidden_start: Option<i32>,
    pub(crate) forbidden_finish: Option<i32>,
    pub(crate) parent: Option<TrialId>,
}

impl TrialLine {
    /// Seed line at a path endpoint. Obstacles containing the endpoint do
    /// not clip it (the endpoint sits inside its own figure); instead they
    /// contribute a forbidden range, as does the path's forbidden direction.
    pub(crate) fn seed(
        from: Point,
        from_source: bool,
        vertical: bool,
        forbidden: Option<Direction>,
        ctx: &CutCtx<'_>,
    ) -> Self {
        let mut line = TrialLine {
            from,
            vertical,
            from_source,
            start: 0,
            finish: 0,
            forbidden_start: None,
            forbidden_finish: None,
            parent: None,
        };
        line.cut_by_obstacles(true, ctx);
        line.compute_forbidden_range(forbidden, ctx);
        line
    }

    /// Child line perpendicular to its parent, sharing its polarity. Every
    /// obstacle clips it, including one containing the origin.
    pub(crate) fn child(
        from: Point,
        parent: TrialId,
        parent_line: &TrialLine,
        ctx: &CutCtx<'_>,
    ) -> Self {
        let mut line = TrialLine {
            from,
            vertical: !parent_line.vertical,
            from_source: parent_line.from_source,
            start: 0,
            finish: 0,
            forbidden_start: None,
            forbidden_finish: None,
            parent: Some(parent),
        };
        line.cut_by_obstacles(false, ctx);
        line
    }

    fn cut_by_obstacles(&mut self, starting_line: bool, ctx: &CutCtx<'_>) {
        let mut start: Option<i32> = None;
        let mut finish: Option<i32> = None;
        let at = self.from.axis(self.vertical);
        let transverse = self.from.axis(!self.vertical);
        for obstacle in ctx.obstacles {
            let (axis_lo, axis_hi) = self.axis_extent(obstacle);
            let (band_lo, band_hi) = self.transverse_extent(obstacle);
            if obstacle.contains_with_offset(self.from, ctx.spacing) {
                if starting_line {
                    continue;
                }
                cut_span(at, axis_lo, axis_hi, ctx.spacing, &mut start, &mut finish);
            }
            if band_lo - ctx.spacing <= transverse && transverse < band_hi + ctx.spacing {
                cut_span(at, axis_lo, axis_hi, ctx.spacing, &mut start, &mut finish);
            }
        }
        self.start = start.unwrap_or(if self.vertical {
            ctx.bounds.top()
        } else {
            ctx.bounds.left()
        });
        self.finish = finish.unwrap_or(if self.vertical {
            ctx.bounds.bottom()
        } else {
            ctx.bounds.right()
        });
    }

    /// Obstacle extent along the line's own axis.
    fn axis_extent(&self, obstacle: &Rect) -> (i32, i32) {
        if self.vertical {
            (obstacle.top(), obstacle.bottom())
        } else {
            (obstacle.left(), obstacle.right())
        }
    }

    /// Obstacle extent across the line.
    fn transverse_extent(&self, obstacle: &Rect) -> (i32, i32) {
        if self.vertical {
            (obstacle.left(), obstacle.right())
        } else {
            (obstacle.top(), obstacle.bottom())
        }
    }

    fn compute_forbidden_range(&mut self, forbidden: Option<Direction>, ctx: &CutCtx<'_>) {
        for obstacle in ctx.obstacles {
            if obstacle.contains(self.from) {
                let (lo, hi) = self.axis_extent(obstacle);
                self.forbidden_start = Some(lo - ctx.spacing);
                self.forbidden_finish = Some(hi + ctx.spacing);
            }
        }
        match forbidden {
            Some(Direction::Down) if self.vertical => {
                self.forbidden_start = Some(self.from.y + ctx.spacing);
            }
            Some(Direction::Up) if self.vertical => {
                self.forbidden_finish = Some(self.from.y - ctx.spacing);
            }
            Some(Direction::Right) if !self.vertical => {
                self.forbidden_start = Some(self.from.x + ctx.spacing);
            }
            Some(Direction::Left) if !self.vertical => {
                self.forbidden_finish = Some(self.from.x - ctx.spacing);
            }
            _ => {}
        }
    }

    /// Forbidden interval clamped into the span, inclusive on both ends.
    /// `None` when no range is set or the clamped interval is empty.
    pub(crate) fn forbidden_interval(&self) -> Option<(i32, i32)> {
        if self.forbidden_start.is_none() && self.forbidden_finish.is_none() {
            return None;
        }
        let lo = self.forbidden_start.unwrap_or(self.start);
        let hi = self.forbidden_finish.unwrap_or(self.finish - 1);
        if lo <= hi {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// Half-open perpendicular crossing test. Callers only pair lines of
    /// opposite polarity; parallel lines never meet.
    pub(crate) fn intersects(&self, other: &TrialLine) -> bool {
        if self.vertical == other.vertical {
            return false;
        }
        let own = self.from.axis(!self.vertical);
        let theirs = other.from.axis(!other.vertical);
        own >= other.start && own < other.finish && theirs >= self.start && theirs < self.finish
    }

    pub(crate) fn bucket(&self) -> usize {
        match (self.from_source, self.vertical) {
            (true, true) => SOURCE_VERTICAL,
            (true, false) => SOURCE_HORIZONTAL,
            (false, true) => TARGET_VERTICAL,
            (false, false) => TARGET_HORIZONTAL,
        }
    }

    /// Bucket holding the only lines this one can legally meet: opposite
    /// polarity, perpendicular orientation.
    pub(crate) fn opposing_bucket(&self) -> usize {
        match (self.from_source, self.vertical) {
            (true, true) => TARGET_HORIZONTAL,
            (true, false) => TARGET_VERTICAL,
            (false, true) => SOURCE_HORIZONTAL,
            (false, false) => SOURCE_VERTICAL,
        }
    }
}

/// Monotone span cut: an obstacle before the origin raises `start`, one
/// after it lowers `finish`. Repeated cuts by the same obstacle are no-ops.
fn cut_span(
    at: i32,
    obstacle_lo: i32,
    obstacle_hi: i32,
    spacing: i32,
    start: &mut Option<i32>,
    finish: &mut Option<i32>,
) {
    if at > obstacle_hi {
        let clipped = obstacle_hi + spacing;
        if start.map_or(true, |s| s < clipped) {
            *start = Some(clipped);
        }
    }
    if at <= obstacle_lo {
        let clipped = obstacle_lo - spacing;
        if finish.map_or(true, |f| f > clipped) {
            *finish = Some(clipped);
        }
    }
}
