use std::fmt;

use block_testbed_base::math::{FreeCoordinate, GridCoordinate, Rgba, Texel, TexelPoint};
use block_testbed_base::raycast::OccupancyMask;
use euclid::{Point2D, Size2D, UnknownUnit, point2};

/// Offset subtracted when converting texture coordinates to texel indices, so that a
/// coordinate of exactly 1 maps to the last texel.
const SAMPLE_EPSILON: FreeCoordinate = 0.000_000_05;

/// Source of texel colors for quads and sprites.
///
/// Texel `(0, 0)` is the top left corner of the image. Texture coordinate `v` increases
/// upward, so `v = 0` is the bottom row.
pub trait TextureSampler: Send + Sync {
    /// Size of the texture in texels.
    fn size(&self) -> Size2D<GridCoordinate, Texel>;

    /// Returns the color of the given texel, or [`None`] if it is out of bounds.
    fn get(&self, texel: TexelPoint) -> Option<Rgba>;

    /// Returns the color at the given texture coordinates, where `(0, 0)` is the bottom
    /// left corner and `(1, 1)` the top right. Coordinates outside that range are clamped
    /// to the edge texels.
    fn sample_uv(&self, uv: Point2D<FreeCoordinate, UnknownUnit>) -> Rgba {
        let size = self.size();
        let x = (uv.x * FreeCoordinate::from(size.width) - SAMPLE_EPSILON) as GridCoordinate;
        let y = ((1.0 - uv.y) * FreeCoordinate::from(size.height) - SAMPLE_EPSILON)
            as GridCoordinate;
        let texel = point2(
            x.clamp(0, (size.width - 1).max(0)),
            y.clamp(0, (size.height - 1).max(0)),
        );
        self.get(texel).unwrap_or(Rgba::TRANSPARENT)
    }
}

impl<T: TextureSampler + ?Sized> TextureSampler for std::sync::Arc<T> {
    fn size(&self) -> Size2D<GridCoordinate, Texel> {
        (**self).size()
    }
    fn get(&self, texel: TexelPoint) -> Option<Rgba> {
        (**self).get(texel)
    }
    fn sample_uv(&self, uv: Point2D<FreeCoordinate, UnknownUnit>) -> Rgba {
        (**self).sample_uv(uv)
    }
}

/// Views a texture as an [`OccupancyMask`] in which a texel is occupied if it is not fully
/// transparent.
#[derive(Clone, Copy)]
pub struct AlphaMask<'a, T: ?Sized>(pub &'a T);

impl<T: TextureSampler + ?Sized> OccupancyMask for AlphaMask<'_, T> {
    fn size(&self) -> Size2D<GridCoordinate, Texel> {
        self.0.size()
    }

    fn occupied(&self, cell: TexelPoint) -> bool {
        self.0
            .get(cell)
            .is_some_and(|color| !color.fully_transparent())
    }
}

impl<T: ?Sized> fmt::Debug for AlphaMask<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AlphaMask").finish_non_exhaustive()
    }
}

/// In-memory [`TextureSampler`] with linear colors, stored in row-major order.
#[derive(Clone, PartialEq)]
pub struct Texture {
    size: Size2D<GridCoordinate, Texel>,
    texels: Vec<Rgba>,
}

impl Texture {
    /// Constructs a texture by calling `f` for each texel.
    ///
    /// Negative sizes are treated as zero.
    pub fn from_fn(
        width: GridCoordinate,
        height: GridCoordinate,
        mut f: impl FnMut(TexelPoint) -> Rgba,
    ) -> Self {
        let size = Size2D::new(width.max(0), height.max(0));
        let mut texels = Vec::with_capacity((size.width * size.height) as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                texels.push(f(point2(x, y)));
            }
        }
        Self { size, texels }
    }

    /// Constructs a texture all of whose texels are `color`.
    pub fn uniform(width: GridCoordinate, height: GridCoordinate, color: Rgba) -> Self {
        Self::from_fn(width, height, |_| color)
    }

    fn index(&self, texel: TexelPoint) -> Option<usize> {
        let in_bounds = texel.x >= 0
            && texel.y >= 0
            && texel.x < self.size.width
            && texel.y < self.size.height;
        in_bounds.then(|| (texel.y * self.size.width + texel.x) as usize)
    }
}

impl TextureSampler for Texture {
    fn size(&self) -> Size2D<GridCoordinate, Texel> {
        self.size
    }

    fn get(&self, texel: TexelPoint) -> Option<Rgba> {
        self.index(texel).map(|i| self.texels[i])
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient() -> Texture {
        Texture::from_fn(4, 2, |p| {
            Rgba::new(p.x as f32 / 4.0, p.y as f32 / 2.0, 0.0, 1.0)
        })
    }

    #[test]
    fn get_bounds() {
        let t = gradient();
        assert_eq!(t.get(point2(3, 1)), Some(Rgba::new(0.75, 0.5, 0.0, 1.0)));
        assert_eq!(t.get(point2(4, 0)), None);
        assert_eq!(t.get(point2(0, -1)), None);
    }

    #[test]
    fn sample_uv_orientation() {
        let t = gradient();
        // v = 1 is the top row, v = 0 the bottom row.
        assert_eq!(t.sample_uv(point2(0.0, 1.0)), t.get(point2(0, 0)).unwrap());
        assert_eq!(t.sample_uv(point2(1.0, 0.0)), t.get(point2(3, 1)).unwrap());
        assert_eq!(t.sample_uv(point2(0.5, 0.5)), t.get(point2(1, 0)).unwrap());
    }

    #[test]
    fn sample_uv_clamps() {
        let t = gradient();
        assert_eq!(t.sample_uv(point2(-3.0, 7.0)), t.get(point2(0, 0)).unwrap());
        assert_eq!(t.sample_uv(point2(5.0, -2.0)), t.get(point2(3, 1)).unwrap());
    }

    #[test]
    fn sample_uv_of_empty_texture() {
        assert_eq!(
            Texture::uniform(0, 0, Rgba::WHITE).sample_uv(point2(0.5, 0.5)),
            Rgba::TRANSPARENT
        );
    }

    #[test]
    fn alpha_mask() {
        let t = Texture::from_fn(2, 2, |p| {
            if p.x == p.y {
                Rgba::WHITE
            } else {
                Rgba::TRANSPARENT
            }
        });
        let mask = AlphaMask(&t);
        assert!(mask.occupied(point2(0, 0)));
        assert!(!mask.occupied(point2(1, 0)));
        assert!(mask.occupied(point2(1, 1)));
        assert!(!mask.occupied(point2(2, 2)));
        assert_eq!(mask.size(), Size2D::new(2, 2));
    }
}
