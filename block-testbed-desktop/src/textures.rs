//! Procedurally generated stand-ins for the texture assets the scene is drawn with.

use std::sync::Arc;

use block_testbed_base::math::{Rgba, TexelPoint};
use block_testbed_render::{Compass, Scene, TestModel, Texture, TextureSampler};

use crate::resolver::PaletteResolver;

/// Width and height of every generated texture.
pub const TEXTURE_SIZE: i32 = 16;

/// 5×7 bitmaps for the letters used as labels.
const GLYPHS: [(char, [&str; 7]); 6] = [
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('W', ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"]),
    ('N', ["#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#", "#...#"]),
    ('S', [".####", "#....", "#....", ".###.", "....#", "....#", "####."]),
    ('F', ["#####", "#....", "#....", "####.", "#....", "#....", "#...."]),
    ('B', ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."]),
];

/// Returns whether `texel` is part of `letter`, drawn at double scale in the middle of a
/// [`TEXTURE_SIZE`]-sized texture.
///
/// Panics if there is no glyph for `letter`.
fn glyph_covers(letter: char, texel: TexelPoint) -> bool {
    let Some((_, rows)) = GLYPHS.iter().find(|(c, _)| *c == letter) else {
        panic!("no glyph for {letter:?}");
    };
    let x = texel.x - 3;
    let y = texel.y - 1;
    if x < 0 || y < 0 {
        return false;
    }
    let (column, row) = ((x / 2) as usize, (y / 2) as usize);
    rows.get(row)
        .and_then(|r| r.as_bytes().get(column))
        .is_some_and(|&b| b == b'#')
}

/// A letter in `ink` on a solid `paper` background, with a one-texel darker border.
fn label(letter: char, ink: Rgba, paper: Rgba) -> Texture {
    let border = paper.map_rgb(|c| c * 0.5);
    Texture::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |p| {
        if p.x == 0 || p.y == 0 || p.x == TEXTURE_SIZE - 1 || p.y == TEXTURE_SIZE - 1 {
            border
        } else if glyph_covers(letter, p) {
            ink
        } else {
            paper
        }
    })
}

/// Label textures for the east, west, north, and south walls of the [`Compass`].
pub fn compass_labels() -> [Texture; 4] {
    let ink = Rgba::WHITE;
    [
        label('E', ink, Rgba::from_srgb8([0xc0, 0x30, 0x30, 0xff])),
        label('W', ink, Rgba::from_srgb8([0x30, 0x90, 0x90, 0xff])),
        label('N', ink, Rgba::from_srgb8([0x30, 0x30, 0xc0, 0xff])),
        label('S', ink, Rgba::from_srgb8([0xc0, 0xa0, 0x30, 0xff])),
    ]
}

/// Side, front, and back textures for the [`TestModel`].
///
/// The front and back carry the letters F and B so that both orientation and mirroring
/// can be checked.
pub fn test_model_textures() -> [Texture; 3] {
    let gray = Rgba::from_srgb8([0x70, 0x70, 0x70, 0xff]);
    let side = Texture::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |p| {
        // An arrow pointing toward the top of the texture.
        let shaft = (7..=8).contains(&p.x) && p.y >= 4 && p.y <= 12;
        let head = p.y >= 2 && p.y < 6 && (p.x - 7).abs().min((p.x - 8).abs()) <= p.y - 2;
        if shaft || head {
            Rgba::from_srgb8([0xe0, 0xe0, 0xe0, 0xff])
        } else {
            gray
        }
    });
    [
        side,
        label('F', Rgba::BLACK, Rgba::from_srgb8([0xf0, 0x90, 0x20, 0xff])),
        label('B', Rgba::WHITE, Rgba::from_srgb8([0x40, 0x40, 0x40, 0xff])),
    ]
}

/// The sprite: a sword lying diagonally across the texture, with transparent surroundings.
pub fn sword_sprite() -> Texture {
    let blade = Rgba::from_srgb8([0xd8, 0xd8, 0xd8, 0xff]);
    let edge = Rgba::from_srgb8([0x9a, 0x9a, 0x9a, 0xff]);
    let guard = Rgba::from_srgb8([0x5a, 0x44, 0x26, 0xff]);
    let grip = Rgba::from_srgb8([0x3b, 0x2a, 0x14, 0xff]);
    Texture::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |p| {
        // Distance along the diagonal from bottom left (0) to top right (30),
        // and signed offset across it.
        let along = p.x + (TEXTURE_SIZE - 1 - p.y);
        let across = p.x - (TEXTURE_SIZE - 1 - p.y);
        match (along, across.abs()) {
            (0..=3, 0..=1) => grip,
            (4..=5, 0..=3) => guard,
            (6..=28, 0) => blade,
            (6..=28, 1) => edge,
            _ => Rgba::TRANSPARENT,
        }
    })
}

/// Assembles the [`Scene`] used by the desktop front end.
pub fn standard_scene() -> Scene {
    let [east, west, north, south] = compass_labels().map(shared);
    let [side, front, back] = test_model_textures().map(shared);
    Scene::new(
        Arc::new(PaletteResolver),
        shared(sword_sprite()),
        Compass::new(east, west, north, south),
        TestModel::new(side, front, back),
    )
}

fn shared(texture: Texture) -> Arc<dyn TextureSampler> {
    Arc::new(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_testbed_base::raycast::OccupancyMask;
    use block_testbed_render::AlphaMask;
    use euclid::point2;

    #[test]
    fn every_glyph_is_well_formed() {
        for (letter, rows) in GLYPHS {
            assert!(rows.iter().all(|r| r.len() == 5), "{letter}");
        }
    }

    #[test]
    fn label_shape() {
        let texture = label('E', Rgba::WHITE, Rgba::BLACK);
        // Top left of the E's top bar, and the gap to its right in the middle row.
        assert_eq!(texture.get(point2(3, 1)), Some(Rgba::WHITE));
        assert_eq!(texture.get(point2(12, 7)), Some(Rgba::BLACK));
        assert_eq!(texture.get(point2(11, 7)), Some(Rgba::BLACK));
        assert_eq!(texture.get(point2(9, 7)), Some(Rgba::WHITE));
    }

    #[test]
    fn sprite_is_sparse() {
        let sprite = sword_sprite();
        let mask = AlphaMask(&sprite);
        let occupied = (0..TEXTURE_SIZE)
            .flat_map(|y| (0..TEXTURE_SIZE).map(move |x| point2(x, y)))
            .filter(|&p| mask.occupied(p))
            .count();
        assert!(occupied > 16 && occupied < 128, "{occupied}");
        // Grip at the bottom left; top left corner empty.
        assert!(mask.occupied(point2(0, 15)));
        assert!(!mask.occupied(point2(0, 0)));
    }
}
