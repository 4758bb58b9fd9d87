// Host-side tests for the reticle ring mesh.

mod common;

use common::constants::{RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS};
use common::geometry::ring;

#[test]
fn ring_is_flat_annulus_facing_up() {
    let p = ring(RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS);
    assert_eq!(p.vertices.len(), (RETICLE_SEGMENTS as usize + 1) * 2);
    assert_eq!(p.indices.len(), RETICLE_SEGMENTS as usize * 6);
    for v in &p.vertices {
        assert_eq!(v.position[1], 0.0);
        assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        let r = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
        let near_inner = (r - RETICLE_INNER_RADIUS).abs() < 1e-5;
        let near_outer = (r - RETICLE_OUTER_RADIUS).abs() < 1e-5;
        assert!(near_inner || near_outer, "radius {r}");
    }
    assert!(p.indices.iter().all(|&i| (i as usize) < p.vertices.len()));
    assert!(p.material.double_sided);
}

#[test]
fn ring_winding_faces_up() {
    let p = ring(1.0, 2.0, 8);
    for tri in p.indices.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(p.vertices[i as usize].position));
        let n = (b - a).cross(c - a);
        assert!(n.y > 0.0, "triangle {tri:?} faces down");
    }
}

#[test]
fn ring_enforces_minimum_segments() {
    let p = ring(1.0, 2.0, 1);
    assert_eq!(p.indices.len(), 3 * 6);
}
