pub mod config;
pub mod geometry;
pub mod route_dump;
pub mod router;

pub use config::{load_config, RouterConfig};
pub use geometry::{Direction, Point, Rect};
pub use router::{FixedViewport, ObstacleId, OrthogonalPath, PathId, Router, Viewport};
