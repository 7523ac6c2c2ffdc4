//! Frequency-ranked palette construction.

use std::collections::HashMap;

use palette::Srgb;

use crate::matrix::ChannelSet;

pub const DEFAULT_MAX_PALETTE_SIZE: usize = 12;

/// One palette color and how many pixels carried it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Srgb<u8>,
    pub count: usize,
}

/// Colors ordered by descending pixel count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// A palette in the given order with zero counts.
    pub fn from_colors(colors: impl IntoIterator<Item = Srgb<u8>>) -> Self {
        Self {
            entries: colors
                .into_iter()
                .map(|color| PaletteEntry { color, count: 0 })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn colors(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        self.entries.iter().map(|e| e.color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `RRGGBB` strings in palette order.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors()
            .map(|c| format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue))
            .collect()
    }
}

/// Count every distinct color in `channels` and keep the `max_size` most
/// frequent. Equal counts keep the order in which the colors were first met
/// scanning rows top to bottom, left to right.
///
/// `max_size` below 1 is treated as 1. An empty set yields an empty palette.
pub fn build_palette(channels: &ChannelSet, max_size: usize) -> Palette {
    let mut slots: HashMap<(u8, u8, u8), usize> = HashMap::new();
    let mut entries: Vec<PaletteEntry> = Vec::new();

    for color in channels.pixels() {
        let key = (color.red, color.green, color.blue);
        match slots.get(&key) {
            Some(&slot) => entries[slot].count += 1,
            None => {
                slots.insert(key, entries.len());
                entries.push(PaletteEntry { color, count: 1 });
            }
        }
    }

    // sort_by is stable, so first-seen order survives among ties
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(max_size.max(1));

    log::debug!(
        "palette: {} of {} distinct colors kept",
        entries.len(),
        slots.len()
    );
    Palette { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_from_rows(rows: &[&[(u8, u8, u8)]]) -> ChannelSet {
        let mut set = ChannelSet::new(rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &(r, g, b)) in row.iter().enumerate() {
                set.set_pixel(y, x, Srgb::new(r, g, b));
            }
        }
        set
    }

    #[test]
    fn orders_by_descending_count() {
        let set = set_from_rows(&[
            &[(0, 0, 0), (32, 32, 32), (32, 32, 32)],
            &[(64, 0, 0), (32, 32, 32), (0, 0, 0)],
            &[(32, 32, 32), (255, 255, 255), (0, 0, 0)],
        ]);
        let palette = build_palette(&set, 12);
        let counts: Vec<_> = palette.entries().iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![4, 3, 1, 1]);
        assert_eq!(palette.entries()[0].color, Srgb::new(32, 32, 32));
        assert_eq!(palette.entries()[1].color, Srgb::new(0, 0, 0));
    }

    #[test]
    fn ties_keep_scan_order() {
        let set = set_from_rows(&[
            &[(96, 0, 0), (0, 96, 0)],
            &[(0, 0, 96), (0, 96, 0)],
        ]);
        let palette = build_palette(&set, 12);
        let colors: Vec<_> = palette.colors().collect();
        assert_eq!(
            colors,
            vec![Srgb::new(0, 96, 0), Srgb::new(96, 0, 0), Srgb::new(0, 0, 96)]
        );
    }

    #[test]
    fn truncates_to_max_size() {
        let mut set = ChannelSet::new(4);
        for i in 0..16u8 {
            set.set_pixel((i / 4) as usize, (i % 4) as usize, Srgb::new(i * 8, 0, 0));
        }
        let palette = build_palette(&set, 5);
        assert_eq!(palette.len(), 5);
        // All counts equal, so the first five scanned colors survive
        assert_eq!(palette.entries()[4].color, Srgb::new(32, 0, 0));

        assert_eq!(build_palette(&set, 0).len(), 1);
    }

    #[test]
    fn palette_colors_come_from_input() {
        let set = ChannelSet::filled(3, Srgb::new(64, 128, 192));
        let palette = build_palette(&set, 12);
        assert_eq!(palette.len(), 1);
        assert_eq!(
            palette.entries()[0],
            PaletteEntry {
                color: Srgb::new(64, 128, 192),
                count: 9
            }
        );
        assert_eq!(palette.to_hex(), vec!["4080C0".to_string()]);
    }

    #[test]
    fn empty_input_gives_empty_palette() {
        assert!(build_palette(&ChannelSet::new(0), 12).is_empty());
    }
}
