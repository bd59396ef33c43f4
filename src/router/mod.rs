mod path;
mod search;
mod trial;

pub use path::OrthogonalPath;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::config::RouterConfig;
use crate::geometry::{Point, Rect};
use search::LineSearch;

/// Handle to an obstacle rectangle registered with the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObstacleId(u32);

/// Handle to a path registered with the router. Also identifies the
/// internally created child sub-paths of a user path with bend points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PathId(u32);

/// Supplies the rectangle trial lines must stay within, plus the advisory
/// hook fired when a path endpoint falls outside it at routing time.
pub trait Viewport {
    fn client_area(&self) -> Rect;

    /// Advisory: an endpoint was outside the client area. Routing proceeds
    /// regardless.
    fn request_update(&mut self) {}
}

/// Viewport with a fixed rectangle and no update hook.
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub Rect);

impl Viewport for FixedViewport {
    fn client_area(&self) -> Rect {
        self.0
    }
}

/// Client area used until a viewport is installed.
const DEFAULT_CLIENT_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 4096,
    height: 4096,
};

/// Orthogonal connection router. Obstacles and paths are long-lived and
/// mutated by the owning editor; `solve` recomputes every dirty path.
///
/// Single-threaded by design: `solve` is a blocking call and all state is
/// owned here. Routing order follows the working set, so earlier paths win
/// contested geometry; determinism holds for a fixed mutation order.
pub struct Router {
    config: RouterConfig,
    viewport: Box<dyn Viewport>,
    obstacles: BTreeMap<ObstacleId, Rect>,
    paths: BTreeMap<PathId, OrthogonalPath>,
    user_order: Vec<PathId>,
    working: Vec<PathId>,
    children: HashMap<PathId, Vec<PathId>>,
    point_set: HashSet<Point>,
    next_obstacle: u32,
    next_path: u32,
    last_line_count: u32,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config: RouterConfig {
                step_size: config.step_size.max(1),
                ..config
            },
            viewport: Box::new(FixedViewport(DEFAULT_CLIENT_AREA)),
            obstacles: BTreeMap::new(),
            paths: BTreeMap::new(),
            user_order: Vec::new(),
            working: Vec::new(),
            children: HashMap::new(),
            point_set: HashSet::new(),
            next_obstacle: 0,
            next_path: 0,
            last_line_count: 0,
        }
    }

    pub fn set_viewport(&mut self, viewport: Box<dyn Viewport>) {
        self.viewport = viewport;
    }

    pub fn set_client_area(&mut self, bounds: Rect) {
        self.viewport = Box::new(FixedViewport(bounds));
    }

    pub fn client_area(&self) -> Rect {
        self.viewport.client_area()
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    /// Clearance kept around every obstacle. Does not re-dirty paths; the
    /// editor marks affected paths itself.
    pub fn set_spacing(&mut self, spacing: i32) {
        self.config.spacing = spacing.max(0);
    }

    /// Register an obstacle. Does not implicitly dirty existing paths.
    pub fn add_obstacle(&mut self, bounds: Rect) -> ObstacleId {
        let id = ObstacleId(self.next_obstacle);
        self.next_obstacle += 1;
        self.obstacles.insert(id, bounds);
        id
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) -> bool {
        self.obstacles.remove(&id).is_some()
    }

    pub fn update_obstacle(&mut self, id: ObstacleId, bounds: Rect) -> bool {
        match self.obstacles.get_mut(&id) {
            Some(slot) => {
                *slot = bounds;
                true
            }
            None => false,
        }
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, Rect)> + '_ {
        self.obstacles.iter().map(|(id, bounds)| (*id, *bounds))
    }

    pub fn add_path(&mut self, path: OrthogonalPath) -> PathId {
        let id = self.alloc_path_id();
        self.paths.insert(id, path);
        self.user_order.push(id);
        self.working.push(id);
        id
    }

    pub fn remove_path(&mut self, id: PathId) -> bool {
        let existed = self.paths.remove(&id).is_some();
        self.user_order.retain(|path| *path != id);
        self.working.retain(|path| *path != id);
        if let Some(children) = self.children.remove(&id) {
            for child in children {
                self.working.retain(|path| *path != child);
                self.paths.remove(&child);
            }
        }
        existed
    }

    pub fn path(&self, id: PathId) -> Option<&OrthogonalPath> {
        self.paths.get(&id)
    }

    /// Mutable access for endpoint / bend-point / direction edits; setters
    /// mark the path dirty for the next solve.
    pub fn path_mut(&mut self, id: PathId) -> Option<&mut OrthogonalPath> {
        self.paths.get_mut(&id)
    }

    /// All registered paths, child sub-paths included.
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &OrthogonalPath)> + '_ {
        self.paths.iter().map(|(id, path)| (*id, path))
    }

    /// User paths in insertion order.
    pub fn user_paths(&self) -> impl Iterator<Item = (PathId, &OrthogonalPath)> + '_ {
        self.user_order
            .iter()
            .filter_map(|id| self.paths.get(id).map(|path| (*id, path)))
    }

    /// Trial positions examined by the most recent per-path search.
    pub fn last_line_count(&self) -> u32 {
        self.last_line_count
    }

    /// Route every dirty working path and return a snapshot of the user
    /// paths in insertion order, with recombined polylines.
    pub fn solve(&mut self) -> Vec<OrthogonalPath> {
        self.point_set.clear();
        self.update_child_paths();
        let bounds = self.viewport.client_area();
        let obstacles: Vec<Rect> = self.obstacles.values().copied().collect();
        let order: Vec<PathId> = self.working.clone();
        for id in order {
            let Some(path) = self.paths.get(&id) else {
                continue;
            };
            if !path.is_dirty() {
                continue;
            }
            let start = path.start();
            let end = path.end();
            let child = path.is_child();
            let forbidden = path.forbidden_direction();
            if !bounds.contains(start) || !bounds.contains(end) {
                self.viewport.request_update();
            }
            let outcome = {
                let routed: Vec<&[Point]> = self
                    .working
                    .iter()
                    .filter(|other| **other != id)
                    .filter_map(|other| self.paths.get(other))
                    .map(|other| other.points())
                    .filter(|points| !points.is_empty())
                    .collect();
                LineSearch::new(
                    &obstacles,
                    bounds,
                    &self.config,
                    &mut self.point_set,
                    &routed,
                )
                .run(start, end, child, forbidden)
            };
            self.last_line_count = outcome.line_count;
            match (outcome.points, self.paths.get_mut(&id)) {
                (Some(points), Some(path)) => path.set_points(points),
                // unrouted: keep the stale polyline
                (None, Some(path)) => path.mark_clean(),
                _ => {}
            }
        }
        self.recombine_children_paths();
        self.user_order
            .iter()
            .filter_map(|id| self.paths.get(id))
            .cloned()
            .collect()
    }

    fn alloc_path_id(&mut self) -> PathId {
        let id = PathId(self.next_path);
        self.next_path += 1;
        id
    }

    /// Rebuild the child decomposition of every dirty user path: k bend
    /// points need exactly k + 1 chained legs.
    fn update_child_paths(&mut self) {
        let user_ids: Vec<PathId> = self.user_order.clone();
        for id in user_ids {
            let Some(path) = self.paths.get(&id) else {
                continue;
            };
            if !path.is_dirty() {
                continue;
            }
            let placeholder = path.start();
            let new_count = path.bend_points().len() + 1;
            let previous = self.children.get(&id).map_or(1, |children| children.len());
            if previous != new_count {
                self.regenerate_child_paths(id, placeholder, previous, new_count);
            }
            self.refresh_children_endpoints(id);
        }
    }

    fn regenerate_child_paths(
        &mut self,
        id: PathId,
        placeholder: Point,
        previous: usize,
        new_count: usize,
    ) {
        let mut current = previous;
        if previous == 1 {
            // the user path leaves the working set; its legs take over
            self.working.retain(|path| *path != id);
            self.children.insert(id, Vec::new());
            current = 0;
        } else if new_count == 1 {
            if let Some(children) = self.children.remove(&id) {
                for child in children {
                    self.working.retain(|path| *path != child);
                    self.paths.remove(&child);
                }
            }
            self.working.push(id);
            return;
        }
        while current < new_count {
            let child_id = self.alloc_path_id();
            self.paths
                .insert(child_id, OrthogonalPath::new_child(placeholder, placeholder));
            self.working.push(child_id);
            self.children.entry(id).or_default().push(child_id);
            current += 1;
        }
        while current > new_count {
            let removed = self
                .children
                .get_mut(&id)
                .and_then(|children| children.pop());
            if let Some(child_id) = removed {
                self.working.retain(|path| *path != child_id);
                self.paths.remove(&child_id);
            }
            current -= 1;
        }
    }

    /// Chain the legs through the bend points, then forbid each interior
    /// leg from spawning straight back toward its predecessor's origin.
    fn refresh_children_endpoints(&mut self, id: PathId) {
        let Some(children) = self.children.get(&id).cloned() else {
            return;
        };
        let Some(parent) = self.paths.get(&id) else {
            return;
        };
        let bends = parent.bend_points().to_vec();
        let start = parent.start();
        let end = parent.end();

        let mut previous = start;
        for (index, child_id) in children.iter().enumerate() {
            let next = bends.get(index).copied().unwrap_or(end);
            if let Some(child) = self.paths.get_mut(child_id) {
                child.set_start(previous);
                child.set_end(next);
            }
            previous = next;
        }

        for index in 1..children.len().saturating_sub(1) {
            let predecessor_origin = self.paths.get(&children[index - 1]).map(|leg| leg.start());
            if let Some(origin) = predecessor_origin {
                if let Some(child) = self.paths.get_mut(&children[index]) {
                    child.update_forbidden_direction(origin);
                }
            }
        }
    }

    /// Stitch each user path's polyline from its legs, dropping the last
    /// point of every leg but the final one (it duplicates the next leg's
    /// first point). Parents with an unrouted leg keep their old polyline.
    fn recombine_children_paths(&mut self) {
        let order: Vec<PathId> = self.user_order.clone();
        for id in order {
            let Some(children) = self.children.get(&id) else {
                continue;
            };
            let mut combined: Vec<Point> = Vec::new();
            let mut complete = !children.is_empty();
            for (index, child_id) in children.iter().enumerate() {
                let points = match self.paths.get(child_id) {
                    Some(child) if !child.points().is_empty() => child.points(),
                    _ => {
                        complete = false;
                        break;
                    }
                };
                if index + 1 == children.len() {
                    combined.extend_from_slice(points);
                } else {
                    combined.extend_from_slice(&points[..points.len() - 1]);
                }
            }
            if complete {
                if let Some(parent) = self.paths.get_mut(&id) {
                    parent.set_points(combined);
                }
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}
