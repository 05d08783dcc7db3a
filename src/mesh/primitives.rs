//! Ornament primitives: UV spheres for balls and stars, a unit box for gifts

use std::f32::consts::{PI, TAU};
use crate::config::OrnamentPrimitive;
use crate::math::Vec3;
use super::geometry::{Mesh, Vertex};

impl Mesh {
    /// Unit-radius sphere, outward CCW winding, no degenerate pole triangles
    pub fn uv_sphere(segments: u32, rings: u32) -> Self {
        let mut mesh = Mesh::new();
        let row = segments + 1;

        for iy in 0..=rings {
            let theta = iy as f32 / rings as f32 * PI;
            let (sin_t, cos_t) = theta.sin_cos();
            let verts = (0..=segments).map(|ix| {
                let phi = ix as f32 / segments as f32 * TAU;
                let p = Vec3::new(-phi.cos() * sin_t, cos_t, phi.sin() * sin_t);
                Vertex::new(p, p.normalize())
            });
            mesh.add_vertices(verts);
        }

        for iy in 0..rings {
            for ix in 0..segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    mesh.add_triangle(a, b, d);
                }
                if iy != rings - 1 {
                    mesh.add_triangle(b, c, d);
                }
            }
        }

        mesh
    }

    /// Axis-aligned cube of side 1 centred on the origin, flat-shaded
    pub fn unit_box() -> Self {
        let mut mesh = Mesh::new();
        // (normal, u, v) with u x v = normal
        let faces = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::UP),
            (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
        ];

        for (normal, u, v) in faces {
            let center = normal * 0.5;
            let corner = |su: f32, sv: f32| Vertex::new(center + u * (0.5 * su) + v * (0.5 * sv), normal);
            let start = mesh.add_vertices([
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ]);
            mesh.add_quad(start, start + 1, start + 2, start + 3);
        }

        mesh
    }

    pub fn for_primitive(primitive: OrnamentPrimitive) -> Self {
        match primitive {
            OrnamentPrimitive::Sphere { segments, rings } => Mesh::uv_sphere(segments, rings),
            OrnamentPrimitive::Box => Mesh::unit_box(),
        }
    }
}
