//! Square per-channel matrices and the shapes derived from them.

use palette::Srgb;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// An N×N grid of channel intensities stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ChannelMatrix {
    size: usize,
    values: Vec<u8>,
}

impl ChannelMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0; size * size],
        }
    }

    /// Build from row-major values. Returns `None` unless `values.len() == size²`.
    pub fn from_values(size: usize, values: Vec<u8>) -> Option<Self> {
        (size.checked_mul(size) == Some(values.len())).then_some(Self { size, values })
    }

    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            values: rows.concat(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.values[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.values[row * self.size + col] = value;
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks(0) panics, and an empty matrix has no rows anyway
        self.values.chunks(self.size.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            size: self.size,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl Serialize for ChannelMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// The R, G and B matrices of one image. All three always share one size.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ChannelSet {
    r: ChannelMatrix,
    g: ChannelMatrix,
    b: ChannelMatrix,
}

impl ChannelSet {
    pub fn new(size: usize) -> Self {
        Self {
            r: ChannelMatrix::new(size),
            g: ChannelMatrix::new(size),
            b: ChannelMatrix::new(size),
        }
    }

    /// Returns `None` unless all three channels have the same size.
    pub fn from_channels(r: ChannelMatrix, g: ChannelMatrix, b: ChannelMatrix) -> Option<Self> {
        (r.size() == g.size() && g.size() == b.size()).then_some(Self { r, g, b })
    }

    pub fn r(&self) -> &ChannelMatrix {
        &self.r
    }

    pub fn g(&self) -> &ChannelMatrix {
        &self.g
    }

    pub fn b(&self) -> &ChannelMatrix {
        &self.b
    }

    /// A set where every pixel is `color`.
    pub fn filled(size: usize, color: Srgb<u8>) -> Self {
        let mut set = Self::new(size);
        for row in 0..size {
            for col in 0..size {
                set.set_pixel(row, col, color);
            }
        }
        set
    }

    pub fn size(&self) -> usize {
        self.r.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn pixel(&self, row: usize, col: usize) -> Srgb<u8> {
        Srgb::new(
            self.r.get(row, col),
            self.g.get(row, col),
            self.b.get(row, col),
        )
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, color: Srgb<u8>) {
        self.r.set(row, col, color.red);
        self.g.set(row, col, color.green);
        self.b.set(row, col, color.blue);
    }

    /// Every pixel in row-major scan order.
    pub fn pixels(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        let size = self.size();
        (0..size * size).map(move |i| self.pixel(i / size, i % size))
    }

    // `f` must keep the matrix size
    pub(crate) fn map_channels(&self, f: impl Fn(&ChannelMatrix) -> ChannelMatrix) -> Self {
        Self {
            r: f(&self.r),
            g: f(&self.g),
            b: f(&self.b),
        }
    }
}

/// Wire payload for the map-set endpoints: `{"r": [[..]], "g": [[..]], "b": [[..]]}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MatrixPayload {
    pub r: Vec<Vec<u8>>,
    pub g: Vec<Vec<u8>>,
    pub b: Vec<Vec<u8>>,
}

pub fn build_matrix_payload(channels: &ChannelSet) -> MatrixPayload {
    MatrixPayload {
        r: channels.r.to_rows(),
        g: channels.g.to_rows(),
        b: channels.b.to_rows(),
    }
}

/// Display strings, one `rgb(r, g, b)` per cell.
pub type ColorMatrix = Vec<Vec<String>>;

pub fn css_rgb(color: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", color.red, color.green, color.blue)
}

pub fn create_color_matrix(channels: &ChannelSet) -> ColorMatrix {
    let size = channels.size();
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| css_rgb(channels.pixel(row, col)))
                .collect()
        })
        .collect()
}
