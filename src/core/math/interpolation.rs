use nalgebra::{Point2, Vector2, Vector3};

/// Twice the signed area below which a triangle counts as degenerate.
pub const DEGENERATE_AREA: f32 = 1e-6;

/// Edge function: twice the signed area of (a, b, p).
/// Positive when p lies to the left of a→b.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Twice the signed area of triangle (v0, v1, v2); positive for counter-clockwise order.
#[inline(always)]
pub fn signed_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v0, v1, v2)
}

/// Calculates the barycentric coordinates (u, v, w) of point p
/// with respect to triangle (v0, v1, v2); u + v + w = 1.
///
/// Each weight is its own edge function over the area, so a weight is exactly
/// zero only when p lies on the opposite edge.
/// Returns `None` if the triangle is degenerate (area is near zero).
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let area = signed_area_x2(v0, v1, v2);
    if !area.is_finite() || area.abs() < DEGENERATE_AREA {
        return None;
    }
    let inv_area = 1.0 / area;
    Some(Vector3::new(
        edge_function(v1, v2, p) * inv_area,
        edge_function(v2, v0, p) * inv_area,
        edge_function(v0, v1, p) * inv_area,
    ))
}

/// Fixed tie-break for pixels whose center lies exactly on an edge.
///
/// `edge` is the edge direction taken in the triangle's positive (counter-clockwise)
/// orientation. An edge is owned when it points up, or points left when horizontal.
/// Two triangles sharing an edge walk it in opposite directions, so exactly one owns it.
#[inline(always)]
pub fn is_owned_edge(edge: Vector2<f32>) -> bool {
    edge.y > 0.0 || (edge.y == 0.0 && edge.x < 0.0)
}

/// Coverage of pixel sample `p` by triangle (v0, v1, v2).
///
/// Returns the barycentric weights (in the caller's vertex order) when the sample
/// is covered: all weights non-negative, with zero weights accepted only on owned edges.
pub fn coverage(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let bar = barycentric_coordinates(p, v0, v1, v2)?;
    // Edges in positive orientation, opposite to weights 0, 1, 2.
    let sign = signed_area_x2(v0, v1, v2).signum();
    let edges = [(v1, v2), (v2, v0), (v0, v1)];

    for (weight, (a, b)) in bar.iter().zip(edges.iter()) {
        if *weight < 0.0 {
            return None;
        }
        if *weight == 0.0 && !is_owned_edge((b - a) * sign) {
            return None;
        }
    }
    Some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_and_hit_vertices() {
        let (a, b, c) = (
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        );
        let bary = barycentric_coordinates(Point2::new(1.0, 1.0), a, b, c).unwrap();
        assert!((bary.sum() - 1.0).abs() < 1e-6);
        assert_eq!(barycentric_coordinates(a, a, b, c).unwrap(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(barycentric_coordinates(b, a, b, c).unwrap(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(barycentric_coordinates(c, a, b, c).unwrap(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let p = Point2::new(1.0, 1.0);
        let line = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(3.0, 3.0)];
        assert!(barycentric_coordinates(p, line[0], line[1], line[2]).is_none());
        assert!(coverage(p, line[0], line[1], line[2]).is_none());
        let same = Point2::new(5.0, 5.0);
        assert!(coverage(same, same, same, same).is_none());
    }

    #[test]
    fn coverage_does_not_depend_on_winding() {
        let (a, b, c) = (
            Point2::new(0.0, 0.0),
            Point2::new(8.0, 0.0),
            Point2::new(0.0, 8.0),
        );
        let p = Point2::new(2.5, 2.5);
        let ccw = coverage(p, a, b, c).unwrap();
        let cw = coverage(p, a, c, b).unwrap();
        assert!((ccw.x - cw.x).abs() < 1e-6);
        assert!((ccw.y - cw.z).abs() < 1e-6);
        assert!((ccw.z - cw.y).abs() < 1e-6);
    }

    #[test]
    fn covered_samples_carry_their_barycentric_weights() {
        let (a, b, c) = (
            Point2::new(1.0, 2.0),
            Point2::new(9.0, 3.0),
            Point2::new(4.0, 11.0),
        );
        for p in [Point2::new(4.5, 5.5), Point2::new(3.5, 4.5), Point2::new(7.5, 4.5)] {
            assert_eq!(coverage(p, a, b, c), barycentric_coordinates(p, a, b, c));
            assert_eq!(coverage(p, a, c, b), barycentric_coordinates(p, a, c, b));
        }
        // Outside: weights exist but the sample is not covered.
        let outside = Point2::new(0.5, 0.5);
        assert!(barycentric_coordinates(outside, a, b, c).unwrap().min() < 0.0);
        assert!(coverage(outside, a, b, c).is_none());
    }

    #[test]
    fn shared_edge_is_claimed_exactly_once() {
        // Quad split along its diagonal; sample points exactly on the diagonal.
        let (a, b, c, d) = (
            Point2::new(0.0, 0.0),
            Point2::new(8.0, 0.0),
            Point2::new(8.0, 8.0),
            Point2::new(0.0, 8.0),
        );
        for t in 1..8 {
            let p = Point2::new(t as f32, t as f32);
            let first = coverage(p, a, b, c).is_some();
            let second = coverage(p, a, c, d).is_some();
            assert!(first ^ second, "diagonal sample {t} claimed {first}/{second}");
        }
    }

    #[test]
    fn owned_edge_rule_is_antisymmetric() {
        for edge in [
            Vector2::new(1.0, 2.0),
            Vector2::new(-3.0, 0.0),
            Vector2::new(2.0, -1.0),
            Vector2::new(0.0, 5.0),
        ] {
            assert_ne!(is_owned_edge(edge), is_owned_edge(-edge));
        }
    }
}
