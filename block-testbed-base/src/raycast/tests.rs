use super::*;
use crate::math::{Face6, FreeCoordinate, FreeVector, GridCoordinate, Texel, TexelPoint};
use euclid::{Size2D, point2, vec3};
use rand::{Rng, SeedableRng as _};
use rand_xoshiro::Xoshiro256Plus;
use rstest::rstest;
use std::vec::Vec;

// --- Helpers -------------------------------------------------------------------------------------

/// Mask defined by a predicate, restricted to its bounds.
struct FnMask<F> {
    size: Size2D<GridCoordinate, Texel>,
    f: F,
}

impl<F: Fn(TexelPoint) -> bool> OccupancyMask for FnMask<F> {
    fn size(&self) -> Size2D<GridCoordinate, Texel> {
        self.size
    }
    fn occupied(&self, cell: TexelPoint) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < self.size.width
            && cell.y < self.size.height
            && (self.f)(cell)
    }
}

fn mask_of_cells(
    width: GridCoordinate,
    height: GridCoordinate,
    cells: &[(GridCoordinate, GridCoordinate)],
) -> impl OccupancyMask + use<> {
    let cells: Vec<TexelPoint> = cells.iter().map(|&(x, z)| point2(x, z)).collect();
    FnMask {
        size: Size2D::new(width, height),
        f: move |cell| cells.contains(&cell),
    }
}

fn full_mask() -> impl OccupancyMask {
    FnMask {
        size: Size2D::new(16, 16),
        f: |_| true,
    }
}

fn empty_mask() -> impl OccupancyMask {
    FnMask {
        size: Size2D::new(16, 16),
        f: |_| false,
    }
}

/// One cell per unit, no offset, slab from y = 0 to 1; convenient for exact arithmetic.
const UNIT_GEOMETRY: SpriteGeometry = SpriteGeometry {
    lower_y: 0.0,
    upper_y: 1.0,
    cells_per_unit: 1.0,
    grid_offset: [0.0, 0.0],
};

fn random_direction(rng: &mut Xoshiro256Plus) -> FreeVector {
    let mut component = || {
        if rng.random_bool(0.25) {
            0.0
        } else {
            rng.random_range(-1.0..=1.0)
        }
    };
    vec3(component(), component(), component())
}

fn inside_unit_cube(p: crate::math::FreePoint, margin: FreeCoordinate) -> bool {
    [p.x, p.y, p.z]
        .into_iter()
        .all(|c| c > margin && c < 1.0 - margin)
}

// --- Unit cube entry -----------------------------------------------------------------------------

#[rstest]
#[case::from_west([-1.0, 0.5, 0.5], [1.0, 0.0, 0.0], 1.0, 2.0)]
#[case::from_above([0.25, 3.0, 0.75], [0.0, -1.0, 0.0], 2.0, 3.0)]
#[case::from_inside([0.5, 0.5, 0.5], [0.0, 0.0, 2.0], -0.25, 0.25)]
#[case::diagonal([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], 1.0, 2.0)]
fn unit_cube_interval_exact(
    #[case] origin: [FreeCoordinate; 3],
    #[case] direction: [FreeCoordinate; 3],
    #[case] near: FreeCoordinate,
    #[case] far: FreeCoordinate,
) {
    let interval = unit_cube_interval(&Ray::new(origin, direction));
    assert_eq!(interval, Interval { near, far });
    assert!(interval.is_hit());
}

#[test]
fn unit_cube_interval_behind() {
    let interval = unit_cube_interval(&Ray::new([2.0, 0.5, 0.5], [1.0, 0.0, 0.0]));
    assert_eq!(interval, Interval { near: -2.0, far: -1.0 });
    assert!(!interval.is_hit());
}

#[test]
fn unit_cube_interval_parallel_outside() {
    // Moving along X but at a Z outside the cube's slab.
    let interval = unit_cube_interval(&Ray::new([-1.0, 0.5, 1.5], [1.0, 0.0, 0.0]));
    assert_eq!(interval, Interval::EMPTY);
    assert!(!interval.is_hit());
}

#[test]
fn unit_cube_interval_zero_direction() {
    assert!(unit_cube_interval(&Ray::new([0.5, 0.5, 0.5], [0.0, 0.0, 0.0])).is_hit());
    assert!(!unit_cube_interval(&Ray::new([0.5, 1.5, 0.5], [0.0, 0.0, 0.0])).is_hit());
}

#[test]
fn unit_cube_interval_from_center_straddles_origin() {
    let mut rng = Xoshiro256Plus::seed_from_u64(0x6ea7_5ee7);
    for _ in 0..1000 {
        let direction = random_direction(&mut rng);
        let interval = unit_cube_interval(&Ray::new([0.5, 0.5, 0.5], direction));
        assert!(
            interval.near <= 0.0 && 0.0 <= interval.far,
            "{direction:?} → {interval:?}"
        );
    }
}

/// The interval is nonempty exactly when the line passes through the cube.
/// Checked against sampling points along the line.
#[test]
fn unit_cube_interval_agrees_with_sampling() {
    let mut rng = Xoshiro256Plus::seed_from_u64(0x5ab5);
    for _ in 0..300 {
        let origin = [
            rng.random_range(-2.0..3.0),
            rng.random_range(-2.0..3.0),
            rng.random_range(-2.0..3.0),
        ];
        let ray = Ray::new(origin, random_direction(&mut rng)).normalized();
        let interval = unit_cube_interval(&ray);
        if interval.near <= interval.far && interval.near.is_finite() {
            let mid = ray.point_at((interval.near + interval.far) / 2.0);
            assert!(inside_unit_cube(mid, -1e-9), "{ray:?} → {interval:?}, mid {mid:?}");
        } else if interval.near > interval.far {
            for step in -5000..5000 {
                let p = ray.point_at(FreeCoordinate::from(step) * 0.002);
                assert!(
                    !inside_unit_cube(p, 1e-9),
                    "{ray:?} → {interval:?} but {p:?} is inside"
                );
            }
        }
    }
}

// --- Sprite --------------------------------------------------------------------------------------

#[test]
fn sprite_straight_down_hits_top_face() {
    let hit = SpriteGeometry::STANDARD
        .intersect(
            &Ray::new([0.5, 2.0, 0.5], [0.0, -1.0, 0.0]),
            FreeCoordinate::INFINITY,
            &full_mask(),
        )
        .unwrap();
    assert_eq!(
        hit,
        SpriteHit {
            t: 2.0 - (0.5 + 1.0 / 16.0),
            face: Face6::PY,
            cell: point2(8, 8),
        }
    );
    assert_eq!(hit.face.normal_vector(), vec3(0.0, 1.0, 0.0));
}

#[test]
fn sprite_straight_up_hits_bottom_face() {
    let hit = SpriteGeometry::STANDARD
        .intersect(
            &Ray::new([0.5, -1.0, 0.5], [0.0, 1.0, 0.0]),
            FreeCoordinate::INFINITY,
            &full_mask(),
        )
        .unwrap();
    assert_eq!((hit.t, hit.face), (1.5, Face6::NY));
}

#[test]
fn sprite_moving_away() {
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(
            &Ray::new([0.5, 2.0, 0.5], [0.0, 1.0, 0.0]),
            FreeCoordinate::INFINITY,
            &full_mask(),
        ),
        None
    );
}

#[test]
fn sprite_embedded_origin_sees_nothing() {
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(
            &Ray::new([0.5, 0.53, 0.5], [1.0, -0.1, 0.2]),
            FreeCoordinate::INFINITY,
            &full_mask(),
        ),
        None
    );
}

#[test]
fn sprite_horizontal_ray_outside_slab() {
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(
            &Ray::new([-1.0, 0.75, 0.5], [1.0, 0.0, 0.0]),
            FreeCoordinate::INFINITY,
            &full_mask(),
        ),
        None
    );
}

#[test]
fn sprite_vertical_ray_inside_slab_has_no_side_hits() {
    let mask = mask_of_cells(16, 16, &[(9, 8), (8, 9), (7, 8), (8, 7)]);
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(
            &Ray::new([0.5, 0.53, 0.5], [0.0, -1.0, 0.0]),
            FreeCoordinate::INFINITY,
            &mask,
        ),
        None
    );
}

#[test]
fn sprite_horizontal_walk_terminates_without_hit() {
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(
            &Ray::new([0.5, 0.53, 0.5], [1.0, 0.0, 0.3]),
            FreeCoordinate::INFINITY,
            &empty_mask(),
        ),
        None
    );
}

#[test]
fn sprite_side_hit_from_inside() {
    let mask = mask_of_cells(16, 16, &[(10, 8)]);
    let ray = Ray::new([0.5, 0.53, 0.5], [1.0, 0.0, 0.0]);
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(&ray, FreeCoordinate::INFINITY, &mask),
        Some(SpriteHit {
            t: 1.5 / 16.0,
            face: Face6::NX,
            cell: point2(10, 8),
        })
    );
    // The same hit is not reported if something nearer was already found.
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(&ray, 0.05, &mask),
        None
    );
}

#[test]
fn sprite_side_hit_moving_negative() {
    let mask = mask_of_cells(16, 16, &[(8, 5)]);
    let ray = Ray::new([0.5, 0.53, 0.5], [0.0, 0.0, -1.0]);
    assert_eq!(
        SpriteGeometry::STANDARD.intersect(&ray, FreeCoordinate::INFINITY, &mask),
        Some(SpriteHit {
            t: 2.5 / 16.0,
            face: Face6::PZ,
            cell: point2(8, 5),
        })
    );
}

/// Ray enters through the top face into an empty cell, then walks sideways before
/// leaving through the bottom face a quarter unit later.
#[rstest]
#[case::near_cell(6, Some(1.75 + 1.5 / 16.0))]
#[case::last_cell(8, Some(1.75 + 3.5 / 16.0))]
#[case::beyond_exit(9, None)]
fn sprite_enter_top_then_walk(
    #[case] occupied_x: GridCoordinate,
    #[case] expected_t: Option<FreeCoordinate>,
) {
    let mask = mask_of_cells(16, 16, &[(occupied_x, 8)]);
    let ray = Ray::new([-1.5, 1.0, 0.5], [1.0, -0.25, 0.0]);
    let hit = SpriteGeometry::STANDARD.intersect(&ray, FreeCoordinate::INFINITY, &mask);
    assert_eq!(hit.map(|h| h.t), expected_t);
    if let Some(hit) = hit {
        assert_eq!(hit.face, Face6::NX);
        assert_eq!(hit.cell, point2(occupied_x, 8));
    }
}

/// When the ray passes exactly through a cell corner, the crossing on the non-dominant axis
/// is taken first. Mirroring the ray about the diagonal mirrors the result.
#[test]
fn sprite_corner_tie_prefers_minor_axis() {
    let mask = mask_of_cells(2, 2, &[(0, 1), (1, 0), (1, 1)]);

    let x_major = UNIT_GEOMETRY.intersect(
        &Ray::new([0.5, 0.5, 0.75], [2.0, 0.0, 1.0]),
        FreeCoordinate::INFINITY,
        &mask,
    );
    assert_eq!(
        x_major,
        Some(SpriteHit {
            t: 0.25,
            face: Face6::NZ,
            cell: point2(0, 1),
        })
    );

    let z_major = UNIT_GEOMETRY.intersect(
        &Ray::new([0.75, 0.5, 0.5], [1.0, 0.0, 2.0]),
        FreeCoordinate::INFINITY,
        &mask,
    );
    assert_eq!(
        z_major,
        Some(SpriteHit {
            t: 0.25,
            face: Face6::NX,
            cell: point2(1, 0),
        })
    );
}

/// Every reported side hit is on the boundary of the reported cell, which is occupied, and
/// no occupied cell is crossed earlier (checked by dense sampling of the path).
#[test]
fn sprite_walk_matches_sampling() {
    let mut rng = Xoshiro256Plus::seed_from_u64(0x5b71_7e);
    let mask = FnMask {
        size: Size2D::new(16, 16),
        f: |cell: TexelPoint| (cell.x * 7 + cell.y * 3) % 11 == 0,
    };
    for _ in 0..300 {
        let origin = [rng.random_range(0.0..1.0), 0.52, rng.random_range(0.0..1.0)];
        let angle: FreeCoordinate = rng.random_range(0.0..core::f64::consts::TAU);
        let ray = Ray::new(origin, [angle.cos(), 0.0, angle.sin()]);
        let geometry = UNIT_GEOMETRY_16;
        let start_cell = point2(
            (origin[0] * 16.0).floor() as GridCoordinate,
            (origin[2] * 16.0).floor() as GridCoordinate,
        );
        if mask.occupied(start_cell) {
            continue;
        }
        let hit = geometry.intersect(&ray, FreeCoordinate::INFINITY, &mask);

        // Sample up to the hit (exclusive) and make sure no occupied cell was skipped.
        let t_end = hit.map_or(2.0, |h| h.t);
        let samples = 4000;
        for s in 0..samples {
            let t = t_end * FreeCoordinate::from(s) / FreeCoordinate::from(samples);
            let p = ray.point_at(t);
            let cell = point2(
                (p.x * 16.0).floor() as GridCoordinate,
                (p.z * 16.0).floor() as GridCoordinate,
            );
            if t < t_end - 1e-9 {
                assert!(
                    !mask.occupied(cell) || cell == start_cell,
                    "{ray:?} skipped {cell:?} at t={t} before {hit:?}"
                );
            }
        }
        if let Some(hit) = hit {
            assert!(mask.occupied(hit.cell), "{hit:?}");
            let p = ray.point_at(hit.t);
            let axis = hit.face.axis();
            let grid_coord = p[axis] * 16.0;
            let boundary = if hit.face.is_positive() {
                FreeCoordinate::from(if axis == crate::math::Axis::X {
                    hit.cell.x
                } else {
                    hit.cell.y
                }) + 1.0
            } else {
                FreeCoordinate::from(if axis == crate::math::Axis::X {
                    hit.cell.x
                } else {
                    hit.cell.y
                })
            };
            assert!(
                (grid_coord - boundary).abs() < 1e-9,
                "{hit:?} at {p:?} is not on the cell boundary"
            );
        }
    }
}

/// Like [`SpriteGeometry::STANDARD`] but with no grid offset and a thick slab, so that
/// sampling can locate cells directly.
const UNIT_GEOMETRY_16: SpriteGeometry = SpriteGeometry {
    lower_y: 0.0,
    upper_y: 1.0,
    cells_per_unit: 16.0,
    grid_offset: [0.0, 0.0],
};
