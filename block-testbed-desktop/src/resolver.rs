//! A stand-in material appearance system: a small palette of solid, textured cubes.

use block_testbed_base::math::{Axis, Face6, FreeCoordinate, FreePoint, Rgba};
use block_testbed_base::raycast::Ray;
use block_testbed_render::{Material, MaterialResolver, SurfaceHit};

/// Material id that draws nothing.
pub const AIR: u32 = 0;
#[allow(missing_docs)]
pub const STONE: u32 = 1;
/// Grass on top, dirt below; the default material.
pub const GRASS: u32 = 2;
#[allow(missing_docs)]
pub const DIRT: u32 = 3;
/// A log whose grain runs along the axis selected by `data % 3` (Y, X, Z).
pub const LOG: u32 = 17;

/// [`MaterialResolver`] which draws every nonzero material id as a full cube.
///
/// The ids listed as constants in this module have recognizable textures; all other ids get
/// a flat color derived from the id, so that any id can be inspected.
#[derive(Clone, Copy, Debug, Default)]
#[expect(clippy::module_name_repetitions)]
pub struct PaletteResolver;

impl MaterialResolver for PaletteResolver {
    fn intersect(
        &self,
        ray: &Ray,
        material: Material,
        t_limit: FreeCoordinate,
    ) -> Option<SurfaceHit> {
        if material.id == AIR {
            return None;
        }
        let (t, face) = entry_face(ray)?;
        if t >= t_limit {
            return None;
        }
        let point = ray.point_at(t);
        Some(SurfaceHit {
            t,
            normal: face.normal_vector(),
            color: surface_color(material, face, point),
        })
    }
}

/// Finds where `ray` enters the unit cube and through which face.
///
/// Returns [`None`] if the ray misses, or starts inside the cube.
fn entry_face(ray: &Ray) -> Option<(FreeCoordinate, Face6)> {
    let mut entry: Option<(FreeCoordinate, Face6)> = None;
    let mut exit = FreeCoordinate::INFINITY;
    for axis in Axis::ALL {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let Some(face) = Face6::from_axis_sign(axis, -direction) else {
            if !(0.0..=1.0).contains(&origin) {
                return None;
            }
            continue;
        };
        let near_plane = if face.is_positive() { 1.0 } else { 0.0 };
        let t_near = (near_plane - origin) / direction;
        let t_far = (1.0 - near_plane - origin) / direction;
        exit = exit.min(t_far);
        if entry.is_none_or(|(t, _)| t_near > t) {
            entry = Some((t_near, face));
        }
    }
    let (t, face) = entry?;
    (t <= exit && t >= -1e-9).then_some((t.max(0.0), face))
}

/// Color of `material` at `point` on `face`.
fn surface_color(material: Material, face: Face6, point: FreePoint) -> Rgba {
    let stone = Rgba::from_srgb8([0x7f, 0x7f, 0x7f, 0xff]);
    let grass = Rgba::from_srgb8([0x5d, 0x9b, 0x3a, 0xff]);
    let dirt = Rgba::from_srgb8([0x86, 0x60, 0x43, 0xff]);
    let bark = Rgba::from_srgb8([0x66, 0x51, 0x32, 0xff]);
    let wood = Rgba::from_srgb8([0xb0, 0x8d, 0x57, 0xff]);

    // Small, fixed variation per texel, so that orientation and scale are visible.
    let texel = |c: FreeCoordinate| ((c * 16.0).floor() as i64).rem_euclid(16);
    let speckle = {
        let [a, b, c] = [point.x, point.y, point.z].map(texel);
        let hash = (a * 7 + b * 13 + c * 5) % 4;
        1.0 - 0.06 * hash as f32
    };

    let base = match material.id {
        STONE => stone,
        DIRT => dirt,
        GRASS => match face {
            Face6::PY => grass,
            Face6::NY => dirt,
            // A fringe of grass along the top edge of each side.
            _ if point.y >= 13.0 / 16.0 => grass,
            _ => dirt,
        },
        LOG => {
            let grain = [Axis::Y, Axis::X, Axis::Z][(material.data % 3) as usize];
            if face.axis() == grain {
                let [u, v] = match grain {
                    Axis::X => [point.y, point.z],
                    Axis::Y => [point.x, point.z],
                    Axis::Z => [point.x, point.y],
                };
                let ring = ((u - 0.5).hypot(v - 0.5) * 8.0).floor() as i64;
                if ring >= 3 || ring % 2 == 1 { bark } else { wood }
            } else {
                bark
            }
        }
        id => {
            let hash = id.wrapping_mul(2_654_435_761);
            Rgba::from_srgb8([
                (hash >> 24) as u8,
                (hash >> 16) as u8,
                (hash >> 8) as u8,
                0xff,
            ])
        }
    };
    base.map_rgb(|c| c * speckle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::vec3;
    use rstest::rstest;

    fn resolve(origin: [f64; 3], direction: [f64; 3], id: u32) -> Option<SurfaceHit> {
        PaletteResolver.intersect(
            &Ray::new(origin, direction),
            Material::new(id, 0),
            f64::INFINITY,
        )
    }

    #[test]
    fn air_is_empty() {
        assert_eq!(resolve([0.5, 0.0, 0.5], [0.0, 1.0, 0.0], AIR), None);
    }

    #[rstest]
    #[case([0.5, 1.0, 0.5], [0.0, -1.0, 0.0], Face6::PY)]
    #[case([0.5, 0.0, 0.5], [0.0, 1.0, 0.0], Face6::NY)]
    #[case([0.0, 0.5, 0.5], [1.0, 0.0, 0.0], Face6::NX)]
    #[case([0.5, 0.5, 1.0], [0.1, 0.2, -1.0], Face6::PZ)]
    fn hit_at_entry(#[case] origin: [f64; 3], #[case] direction: [f64; 3], #[case] face: Face6) {
        let hit = resolve(origin, direction, STONE).unwrap();
        assert_eq!(hit.t, 0.0);
        assert_eq!(hit.normal, face.normal_vector());
    }

    #[test]
    fn hit_from_outside() {
        let hit = resolve([-1.0, 0.5, 0.5], [2.0, 0.0, 0.0], STONE).unwrap();
        assert_eq!(hit.t, 0.5);
        assert_eq!(hit.normal, vec3(-1.0, 0.0, 0.0));
    }

    #[test]
    fn miss_and_inside() {
        assert_eq!(resolve([-1.0, 1.5, 0.5], [1.0, 0.0, 0.0], STONE), None);
        assert_eq!(resolve([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], STONE), None);
    }

    #[test]
    fn t_limit_is_exclusive() {
        let ray = Ray::new([-1.0, 0.5, 0.5], [1.0, 0.0, 0.0]);
        assert_eq!(PaletteResolver.intersect(&ray, Material::new(STONE, 0), 1.0), None);
        assert!(PaletteResolver.intersect(&ray, Material::new(STONE, 0), 1.5).is_some());
    }

    #[test]
    fn grass_top_and_sides_differ() {
        let top = resolve([0.5, 1.0, 0.5], [0.0, -1.0, 0.0], GRASS).unwrap();
        let side_low = resolve([0.0, 0.2, 0.5], [1.0, 0.0, 0.0], GRASS).unwrap();
        let side_high = resolve([0.0, 0.95, 0.5], [1.0, 0.0, 0.0], GRASS).unwrap();
        assert!(top.color.green() > top.color.red());
        assert!(side_low.color.red() > side_low.color.green());
        assert!(side_high.color.green() > side_high.color.red());
    }

    #[test]
    fn every_id_is_opaque() {
        for id in 1..300 {
            let hit = resolve([0.5, 1.0, 0.5], [0.0, -1.0, 0.0], id).unwrap();
            assert_eq!(hit.color.alpha(), 1.0, "id {id}");
        }
    }
}
