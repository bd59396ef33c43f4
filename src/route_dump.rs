use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::geometry::{Point, Rect};
use crate::router::{ObstacleId, PathId, Router};

/// Snapshot of router state for debugging and bug reports.
#[derive(Debug, Serialize)]
pub struct RouterDump {
    pub spacing: i32,
    pub step_size: i32,
    pub max_line_count: u32,
    pub client_area: Rect,
    pub last_line_count: u32,
    pub obstacles: Vec<ObstacleDump>,
    pub paths: Vec<PathDump>,
}

#[derive(Debug, Serialize)]
pub struct ObstacleDump {
    pub id: ObstacleId,
    pub bounds: Rect,
}

#[derive(Debug, Serialize)]
pub struct PathDump {
    pub id: PathId,
    pub start: Point,
    pub end: Point,
    pub bend_points: Vec<Point>,
    pub child: bool,
    pub dirty: bool,
    pub points: Vec<Point>,
}

impl RouterDump {
    pub fn from_router(router: &Router) -> Self {
        let config = router.config();
        let obstacles = router
            .obstacles()
            .map(|(id, bounds)| ObstacleDump { id, bounds })
            .collect();
        let paths = router
            .paths()
            .map(|(id, path)| PathDump {
                id,
                start: path.start(),
                end: path.end(),
                bend_points: path.bend_points().to_vec(),
                child: path.is_child(),
                dirty: path.is_dirty(),
                points: path.points().to_vec(),
            })
            .collect();
        Self {
            spacing: config.spacing,
            step_size: config.step_size,
            max_line_count: config.max_line_count,
            client_area: router.client_area(),
            last_line_count: router.last_line_count(),
            obstacles,
            paths,
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
