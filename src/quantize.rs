//! Channel quantization onto a fixed step grid.

use crate::matrix::{ChannelMatrix, ChannelSet};

pub const DEFAULT_QUANTIZATION_STEP: u16 = 32;

/// Round `value` to the nearest multiple of `step`, halves rounding up, then
/// saturate at 255. A step of 0 is treated as 1.
///
/// `255` with the default step rounds to `256` and saturates back to `255`,
/// so the brightest bucket is slightly narrower than the others.
#[inline]
pub fn quantize_value(value: u8, step: u16) -> u8 {
    let step = u32::from(step.max(1));
    let v = u32::from(value);
    let quantized = (2 * v + step) / (2 * step) * step;
    quantized.min(255) as u8
}

pub fn quantize_channel(channel: &ChannelMatrix, step: u16) -> ChannelMatrix {
    channel.map(|v| quantize_value(v, step))
}

pub fn quantize_channels(channels: &ChannelSet, step: u16) -> ChannelSet {
    channels.map_channels(|m| quantize_channel(m, step))
}
