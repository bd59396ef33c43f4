use ortho_router::{OrthogonalPath, Point, Rect, Router, RouterConfig};

fn router_with(obstacles: &[Rect]) -> Router {
    let mut router = Router::new(RouterConfig::default());
    router.set_client_area(Rect::new(0, 0, 1000, 1000));
    for bounds in obstacles {
        router.add_obstacle(*bounds);
    }
    router
}

fn solve_single(router: &mut Router, start: (i32, i32), end: (i32, i32)) -> Vec<Point> {
    let id = router.add_path(OrthogonalPath::new(
        Point::new(start.0, start.1),
        Point::new(end.0, end.1),
    ));
    router.solve();
    router.path(id).unwrap().points().to_vec()
}

fn assert_orthogonal(points: &[Point]) {
    for pair in points.windows(2) {
        assert!(
            pair[0].x == pair[1].x || pair[0].y == pair[1].y,
            "diagonal segment {:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }
}

fn assert_endpoints(points: &[Point], start: Point, end: Point) {
    assert_eq!(points.first(), Some(&start));
    assert_eq!(points.last(), Some(&end));
}

/// No segment may cross the spacing-inflated interior of the obstacle,
/// `[left − s, right + s) × [top − s, bottom + s)`.
fn assert_clearance(points: &[Point], obstacle: Rect, spacing: i32) {
    let left = obstacle.left() - spacing;
    let right = obstacle.right() + spacing;
    let top = obstacle.top() - spacing;
    let bottom = obstacle.bottom() + spacing;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let violates = if a.y == b.y {
            a.y >= top && a.y < bottom && a.x.max(b.x) >= left && a.x.min(b.x) < right
        } else {
            a.x >= left && a.x < right && a.y.max(b.y) >= top && a.y.min(b.y) < bottom
        };
        assert!(!violates, "segment {:?} -> {:?} enters {:?} + {}", a, b, obstacle, spacing);
    }
}

#[test]
fn empty_board_straight_line() {
    let mut router = router_with(&[]);
    let points = solve_single(&mut router, (100, 100), (300, 100));
    assert_eq!(points, vec![Point::new(100, 100), Point::new(300, 100)]);
}

#[test]
fn empty_board_vertical_straight_line() {
    let mut router = router_with(&[]);
    let points = solve_single(&mut router, (200, 400), (200, 100));
    assert_eq!(points, vec![Point::new(200, 400), Point::new(200, 100)]);
}

#[test]
fn empty_board_l_route() {
    let mut router = router_with(&[]);
    let points = solve_single(&mut router, (100, 100), (300, 200));
    assert_eq!(points.len(), 3);
    assert_endpoints(&points, Point::new(100, 100), Point::new(300, 200));
    assert!(
        points[1] == Point::new(300, 100) || points[1] == Point::new(100, 200),
        "unexpected corner {:?}",
        points[1]
    );
    assert_orthogonal(&points);
}

#[test]
fn single_obstacle_detour() {
    let obstacle = Rect::new(150, 50, 100, 100);
    let mut router = router_with(&[obstacle]);
    let points = solve_single(&mut router, (100, 100), (300, 100));
    assert!(points.len() >= 3, "expected a bend, got {:?}", points);
    assert_endpoints(&points, Point::new(100, 100), Point::new(300, 100));
    assert_orthogonal(&points);
    assert_clearance(&points, obstacle, 15);
    assert!(router.last_line_count() <= RouterConfig::default().max_line_count);
}

#[test]
fn coincident_endpoints_stay_degenerate() {
    let mut router = router_with(&[]);
    let points = solve_single(&mut router, (200, 200), (200, 200));
    assert_eq!(points, vec![Point::new(200, 200), Point::new(200, 200)]);
}

#[test]
fn enclosed_start_exhausts_the_budget_and_falls_back() {
    // Four walls around the start leave a clearance-sized pocket the search
    // can never leave, so the line budget runs dry.
    let walls = [
        Rect::new(440, 440, 120, 20),
        Rect::new(440, 540, 120, 20),
        Rect::new(440, 440, 20, 120),
        Rect::new(540, 440, 20, 120),
    ];
    let mut router = Router::new(RouterConfig {
        max_line_count: 3_000,
        ..RouterConfig::default()
    });
    router.set_client_area(Rect::new(0, 0, 1000, 1000));
    for bounds in &walls {
        router.add_obstacle(*bounds);
    }
    let points = solve_single(&mut router, (500, 500), (800, 500));
    assert_eq!(points, vec![Point::new(500, 500), Point::new(800, 500)]);
    assert_eq!(router.last_line_count(), 3_000);
}

#[test]
fn two_paths_sharing_geometry_spread_apart() {
    let mut router = router_with(&[]);
    let first_id = router.add_path(OrthogonalPath::new(
        Point::new(100, 100),
        Point::new(300, 300),
    ));
    let second_id = router.add_path(OrthogonalPath::new(
        Point::new(100, 100),
        Point::new(300, 300),
    ));
    router.solve();
    let first = router.path(first_id).unwrap().points().to_vec();
    let second = router.path(second_id).unwrap().points().to_vec();

    assert_endpoints(&first, Point::new(100, 100), Point::new(300, 300));
    assert_endpoints(&second, Point::new(100, 100), Point::new(300, 300));
    assert_orthogonal(&first);
    assert_orthogonal(&second);
    assert_ne!(first, second, "identical paths must not collapse onto one route");
    // the second route keeps off the first route's corner
    for corner in &first[1..first.len() - 1] {
        assert!(
            !second.contains(corner),
            "second route reuses corner {:?}",
            corner
        );
    }
}

#[test]
fn bend_points_appear_as_interior_vertices() {
    let mut router = router_with(&[]);
    let id = router.add_path(OrthogonalPath::new(
        Point::new(100, 100),
        Point::new(500, 100),
    ));
    router
        .path_mut(id)
        .unwrap()
        .set_bend_points(vec![Point::new(300, 300)]);
    router.solve();

    let points = router.path(id).unwrap().points().to_vec();
    assert_endpoints(&points, Point::new(100, 100), Point::new(500, 100));
    assert_orthogonal(&points);
    let bend_at = points
        .iter()
        .position(|p| *p == Point::new(300, 300))
        .expect("bend point missing from recombined polyline");
    assert!(bend_at > 0 && bend_at < points.len() - 1);
}

#[test]
fn clean_solve_is_idempotent() {
    let obstacle = Rect::new(150, 50, 100, 100);
    let mut router = router_with(&[obstacle]);
    let a = router.add_path(OrthogonalPath::new(
        Point::new(100, 100),
        Point::new(300, 100),
    ));
    let b = router.add_path(OrthogonalPath::new(
        Point::new(100, 300),
        Point::new(400, 300),
    ));
    router.solve();
    let first_a = router.path(a).unwrap().points().to_vec();
    let first_b = router.path(b).unwrap().points().to_vec();
    assert!(!router.path(a).unwrap().is_dirty());
    assert!(!router.path(b).unwrap().is_dirty());

    router.solve();
    assert_eq!(router.path(a).unwrap().points(), first_a.as_slice());
    assert_eq!(router.path(b).unwrap().points(), first_b.as_slice());
}

#[test]
fn moving_an_endpoint_dirties_and_re_routes() {
    let mut router = router_with(&[]);
    let id = router.add_path(OrthogonalPath::new(
        Point::new(100, 100),
        Point::new(300, 100),
    ));
    router.solve();
    router.path_mut(id).unwrap().set_end(Point::new(300, 250));
    assert!(router.path(id).unwrap().is_dirty());
    router.solve();
    let points = router.path(id).unwrap().points().to_vec();
    assert_endpoints(&points, Point::new(100, 100), Point::new(300, 250));
    assert_orthogonal(&points);
}

#[test]
fn routes_stay_inside_the_client_area() {
    let obstacle = Rect::new(150, 50, 100, 100);
    let mut router = router_with(&[obstacle]);
    let points = solve_single(&mut router, (100, 100), (300, 100));
    for point in &points {
        assert!(point.x >= 0 && point.x < 1000, "x out of bounds: {:?}", point);
        assert!(point.y >= 0 && point.y < 1000, "y out of bounds: {:?}", point);
    }
}
