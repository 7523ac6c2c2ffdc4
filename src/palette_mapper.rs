//! Nearest-color remapping against a palette.

use palette::Srgb;

use crate::matrix::ChannelSet;
use crate::palette_builder::Palette;

#[inline]
fn squared_distance(a: Srgb<u8>, b: Srgb<u8>) -> i32 {
    let dr = i32::from(a.red) - i32::from(b.red);
    let dg = i32::from(a.green) - i32::from(b.green);
    let db = i32::from(a.blue) - i32::from(b.blue);
    dr * dr + dg * dg + db * db
}

/// The palette color closest to `color` in RGB space. The earliest entry wins
/// a tie. Returns `None` only for an empty palette.
pub fn find_nearest_color(color: Srgb<u8>, palette: &Palette) -> Option<Srgb<u8>> {
    let mut best = None;
    let mut best_dist = i32::MAX;
    for candidate in palette.colors() {
        let dist = squared_distance(color, candidate);
        if dist < best_dist {
            best_dist = dist;
            best = Some(candidate);
        }
    }
    best
}

/// Replace every pixel with its nearest palette color. An empty palette
/// leaves the pixels as they are.
pub fn apply_palette(channels: &ChannelSet, palette: &Palette) -> ChannelSet {
    let size = channels.size();
    let mut result = ChannelSet::new(size);
    for row in 0..size {
        for col in 0..size {
            let pixel = channels.pixel(row, col);
            let nearest = find_nearest_color(pixel, palette).unwrap_or(pixel);
            result.set_pixel(row, col, nearest);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette_builder::build_palette;
    use std::collections::HashSet;

    #[test]
    fn equal_distance_prefers_first_entry() {
        let palette = Palette::from_colors([Srgb::new(0, 0, 0), Srgb::new(10, 10, 10)]);
        assert_eq!(
            find_nearest_color(Srgb::new(5, 5, 5), &palette),
            Some(Srgb::new(0, 0, 0))
        );
    }

    #[test]
    fn picks_closest_color() {
        let palette = Palette::from_colors([
            Srgb::new(255, 0, 0),
            Srgb::new(0, 255, 0),
            Srgb::new(0, 0, 255),
        ]);
        assert_eq!(
            find_nearest_color(Srgb::new(30, 200, 60), &palette),
            Some(Srgb::new(0, 255, 0))
        );
        assert_eq!(find_nearest_color(Srgb::new(1, 2, 3), &Palette::default()), None);
    }

    #[test]
    fn output_only_uses_palette_colors() {
        let mut set = ChannelSet::new(4);
        for i in 0..16u8 {
            set.set_pixel((i / 4) as usize, (i % 4) as usize, Srgb::new(i * 16, 255 - i * 16, i));
        }
        let palette = build_palette(&set, 3);
        let mapped = apply_palette(&set, &palette);

        let allowed: HashSet<_> = palette.colors().map(|c| (c.red, c.green, c.blue)).collect();
        let used: HashSet<_> = mapped.pixels().map(|c| (c.red, c.green, c.blue)).collect();
        assert!(used.is_subset(&allowed));
        assert!(used.len() <= palette.len());
    }

    #[test]
    fn mapping_palette_colors_is_a_no_op() {
        let mut set = ChannelSet::new(2);
        set.set_pixel(0, 0, Srgb::new(255, 0, 0));
        set.set_pixel(1, 1, Srgb::new(0, 0, 255));
        let palette = build_palette(&set, 12);
        let mapped = apply_palette(&set, &palette);
        assert_eq!(mapped, set);
        assert_eq!(apply_palette(&mapped, &palette), mapped);
    }

    #[test]
    fn empty_palette_leaves_pixels() {
        let set = ChannelSet::filled(2, Srgb::new(7, 7, 7));
        assert_eq!(apply_palette(&set, &Palette::default()), set);
    }
}
