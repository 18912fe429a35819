use crate::MeshData;

/// Axis-aligned box centred on the origin with the given half extents,
/// 12 outward-facing counter-clockwise triangles.
pub fn cuboid(hx: f32, hy: f32, hz: f32) -> MeshData {
    let half = [hx, hy, hz];
    let mut mesh = MeshData::default();
    for axis in 0..3 {
        for sign in [1.0f32, -1.0] {
            let (mut u, mut v) = ((axis + 1) % 3, (axis + 2) % 3);
            if sign < 0.0 {
                std::mem::swap(&mut u, &mut v);
            }
            let corner = |su: f32, sv: f32| {
                let mut p = [0.0; 3];
                p[axis] = sign * half[axis];
                p[u] = su * half[u];
                p[v] = sv * half[v];
                p
            };
            let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
            let mut normal = [0.0; 3];
            normal[axis] = sign;
            for i in [0, 1, 2, 0, 2, 3] {
                mesh.positions.extend_from_slice(&quad[i]);
                mesh.normals.extend_from_slice(&normal);
            }
        }
    }
    mesh
}

/// Cube spanning `[-1, 1]` on every axis.
pub fn unit_cube() -> MeshData {
    cuboid(1.0, 1.0, 1.0)
}
