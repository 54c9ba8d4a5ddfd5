//! Unit primitives for the floating shapes

use std::f32::consts::{PI, TAU};

use super::{Mesh, Vertex};
use crate::fields::GeometryKind;
use crate::math::Vec3;

const SPHERE_SEGMENTS: usize = 16;
const TORUS_RADIUS: f32 = 1.0;
const TORUS_TUBE: f32 = 0.4;
const TORUS_RADIAL_SEGMENTS: usize = 8;
const TORUS_TUBULAR_SEGMENTS: usize = 16;

/// Geometry for a swarm instance's kind, built once per kind
pub fn mesh_for_kind(kind: GeometryKind) -> Mesh {
    match kind {
        GeometryKind::Box => box_mesh(1.0),
        GeometryKind::Sphere => sphere_mesh(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        GeometryKind::Torus => torus_mesh(
            TORUS_RADIUS,
            TORUS_TUBE,
            TORUS_RADIAL_SEGMENTS,
            TORUS_TUBULAR_SEGMENTS,
        ),
    }
}

/// Axis-aligned cube centered on the origin, four vertices per face
pub fn box_mesh(size: f32) -> Mesh {
    let h = size / 2.0;
    let mut mesh = Mesh::new();

    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::UP),
        (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
    ];

    for (normal, u, v) in faces {
        let center = normal.scale(h);
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .map(|(su, sv): (f32, f32)| Vertex::new(center + u.scale(su * h) + v.scale(sv * h), normal));
        let start = mesh.add_vertices(corners);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }

    mesh
}

/// UV sphere; pole rows emit single triangles
pub fn sphere_mesh(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let row = width_segments as u32 + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.add_vertices([Vertex::new(normal.scale(radius), normal)]);
        }
    }

    for iy in 0..height_segments as u32 {
        for ix in 0..width_segments as u32 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != height_segments as u32 - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Torus lying in the XY plane
pub fn torus_mesh(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let row = tubular_segments as u32 + 1;

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;

            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.add_vertices([Vertex::new(position, (position - center).normalize())]);
        }
    }

    for j in 1..=radial_segments as u32 {
        for i in 1..=tubular_segments as u32 {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box() {
        let mesh = box_mesh(1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            assert!((v.position.x.abs() - 0.5).abs() < 1e-6
                || (v.position.y.abs() - 0.5).abs() < 1e-6
                || (v.position.z.abs() - 0.5).abs() < 1e-6);
            // Every corner of a unit cube sits at half-extent on all axes
            assert!((v.position.length() - 0.75f32.sqrt()).abs() < 1e-5);
            assert!((v.normal.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere() {
        let mesh = sphere_mesh(1.0, 16, 16);
        assert_eq!(mesh.vertices.len(), 17 * 17);
        // Poles drop one triangle per segment
        assert_eq!(mesh.triangle_count(), 16 * 16 * 2 - 2 * 16);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus() {
        let mesh = torus_mesh(1.0, 0.4, 8, 16);
        assert_eq!(mesh.vertices.len(), 9 * 17);
        assert_eq!(mesh.triangle_count(), 8 * 16 * 2);
        for v in &mesh.vertices {
            let planar = (v.position.x * v.position.x + v.position.y * v.position.y).sqrt();
            let tube_offset = ((planar - 1.0).powi(2) + v.position.z.powi(2)).sqrt();
            assert!((tube_offset - 0.4).abs() < 1e-5);
        }
    }

    #[test]
    fn test_mesh_for_kind() {
        for kind in GeometryKind::ALL {
            let mesh = mesh_for_kind(kind);
            assert!(!mesh.indices.is_empty());
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
            assert!(!mesh.wireframe_indices().is_empty());
        }
    }
}
