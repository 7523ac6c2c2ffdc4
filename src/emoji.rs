//! Name resolution and the end-to-end emoji pipeline.
//!
//! Stages run in a fixed order:
//! 1. sample the decoded image onto an N×N grid,
//! 2. reorder each channel along the zigzag strip,
//! 3. quantize channels to the configured step,
//! 4. rank the surviving colors into a palette,
//! 5. snap every pixel to its nearest palette color.

use image::DynamicImage;

use crate::config::{EmojiConfig, MAX_SAMPLING_SIZE};
use crate::error::{EmojiError, LoadCause, Result};
use crate::matrix::{
    ChannelSet, ColorMatrix, MatrixPayload, build_matrix_payload, create_color_matrix,
};
use crate::palette_builder::{Palette, build_palette};
use crate::palette_mapper::apply_palette;
use crate::quantize::quantize_channels;
use crate::sampler::{NearestRasterizer, Rasterizer, to_channel_matrices};
use crate::source::EmojiSource;
use crate::zigzag::zigzag_channels;

/// Trim `name` and drop a trailing `.png` (any case).
pub fn ensure_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let clean = match trimmed.len().checked_sub(4) {
        Some(cut)
            if trimmed.is_char_boundary(cut) && trimmed[cut..].eq_ignore_ascii_case(".png") =>
        {
            &trimmed[..cut]
        }
        _ => trimmed,
    };

    if clean.is_empty() {
        return Err(EmojiError::invalid_name(name, "name is empty"));
    }
    if clean.contains(['/', '\\']) || clean.contains("..") {
        return Err(EmojiError::invalid_name(name, "name must be a single path segment"));
    }
    Ok(clean.to_string())
}

/// `{base_path}/{name}.png`. `name` must already be clean.
pub fn emoji_url(base_path: &str, name: &str) -> String {
    format!("{}/{name}.png", base_path.trim_end_matches('/'))
}

pub fn get_emoji_url_by_name(config: &EmojiConfig, name: &str) -> Result<String> {
    config.emoji_url(name)
}

/// Everything produced for one emoji.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmojiResult {
    pub name: String,
    pub url: String,
    /// Zigzag-ordered, quantized and palette-mapped channels.
    pub matrix: ChannelSet,
    pub colors: ColorMatrix,
    pub palette: Palette,
}

impl EmojiResult {
    pub fn payload(&self) -> MatrixPayload {
        build_matrix_payload(&self.matrix)
    }
}

pub struct EmojiProcessor<R = NearestRasterizer> {
    config: EmojiConfig,
    rasterizer: R,
}

impl EmojiProcessor<NearestRasterizer> {
    pub fn new(config: EmojiConfig) -> Result<Self> {
        Self::with_rasterizer(config, NearestRasterizer)
    }
}

impl<R: Rasterizer> EmojiProcessor<R> {
    pub fn with_rasterizer(config: EmojiConfig, rasterizer: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rasterizer })
    }

    pub fn config(&self) -> &EmojiConfig {
        &self.config
    }

    /// Clean `name` and resolve its URL. Pure; fails before any I/O.
    pub fn resolve(&self, name: &str) -> Result<(String, String)> {
        let clean = ensure_name(name)?;
        let url = emoji_url(&self.config.base_path, &clean);
        Ok((clean, url))
    }

    fn checked_size(&self, size: Option<u32>) -> Result<u32> {
        let size = size.unwrap_or(self.config.sampling_size);
        if size > MAX_SAMPLING_SIZE {
            return Err(EmojiError::InvalidConfig {
                field: "size",
                reason: format!("{size} exceeds {MAX_SAMPLING_SIZE}"),
            });
        }
        Ok(size)
    }

    /// Stages 2-5 on channels that have already been sampled.
    pub fn process_channels(&self, sampled: &ChannelSet) -> (ChannelSet, Palette) {
        let ordered = zigzag_channels(sampled);
        let quantized = quantize_channels(&ordered, self.config.quantization_step);
        let palette = build_palette(&quantized, self.config.max_palette_size);
        let mapped = apply_palette(&quantized, &palette);
        (mapped, palette)
    }

    pub fn process_image(&self, image: &DynamicImage, size: u32) -> (ChannelSet, Palette) {
        let sampled = to_channel_matrices(&self.rasterizer, image, size);
        log::debug!(
            "sampled {}x{} source onto {size}x{size}",
            image.width(),
            image.height()
        );
        self.process_channels(&sampled)
    }

    fn finish(&self, name: String, url: String, bytes: &[u8], size: u32) -> Result<EmojiResult> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| EmojiError::image_load(&url, LoadCause::Decode(e)))?;
        let (matrix, palette) = self.process_image(&image, size);
        let colors = create_color_matrix(&matrix);
        Ok(EmojiResult {
            name,
            url,
            matrix,
            colors,
            palette,
        })
    }

    /// Run the pipeline on already-fetched image bytes.
    pub fn process_bytes(
        &self,
        name: &str,
        bytes: &[u8],
        size: Option<u32>,
    ) -> Result<EmojiResult> {
        let size = self.checked_size(size)?;
        let (name, url) = self.resolve(name)?;
        self.finish(name, url, bytes, size)
    }

    /// Resolve `name`, fetch its image from `source` and run the pipeline.
    ///
    /// The fetch is the only suspension point. Nothing partial is returned on
    /// failure.
    pub async fn load_emoji_by_name<S: EmojiSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
        size: Option<u32>,
    ) -> Result<EmojiResult> {
        let size = self.checked_size(size)?;
        let (name, url) = self.resolve(name)?;
        let bytes = source.fetch(&url).await?;
        self.finish(name, url, &bytes, size)
    }
}
