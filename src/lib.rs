//! Convert small raster icons into palette-quantized, zigzag-ordered color
//! matrices for LED-matrix robot faces.
//!
//! The pipeline lives in plain Rust modules; the `#[wasm_bindgen]` exports at
//! the bottom of this file are the surface the browser front-end calls.

use std::cell::RefCell;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod emoji;
pub mod error;
pub mod matrix;
pub mod palette_builder;
pub mod palette_mapper;
pub mod quantize;
pub mod sampler;
pub mod source;
pub mod zigzag;

pub use catalog::EmojiCatalog;
pub use config::{EmojiConfig, PredefinedEmoji};
pub use emoji::{EmojiProcessor, EmojiResult, emoji_url, ensure_name, get_emoji_url_by_name};
pub use error::{EmojiError, LoadCause, Result};
pub use matrix::{
    ChannelMatrix, ChannelSet, ColorMatrix, MatrixPayload, build_matrix_payload,
    create_color_matrix,
};
pub use palette_builder::{Palette, PaletteEntry, build_palette};
pub use palette_mapper::{apply_palette, find_nearest_color};
pub use quantize::quantize_value;
pub use sampler::{NearestRasterizer, Rasterizer};
pub use source::EmojiSource;
pub use zigzag::{GridIndex, get_zigzag_indices, zigzag_to_matrix};

// ------------------------------------------------------------
// Browser bindings
// ------------------------------------------------------------

#[derive(Default)]
struct BindingState {
    config: EmojiConfig,
    manifest: Vec<String>,
}

impl BindingState {
    fn catalog(&self) -> Result<EmojiCatalog> {
        EmojiCatalog::from_names(&self.config, &self.manifest)
    }
}

thread_local! {
    // The page runs on a single thread; each worker gets its own copy.
    static STATE: RefCell<BindingState> = RefCell::new(BindingState::default());
}

impl From<EmojiError> for JsValue {
    fn from(err: EmojiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn rows_to_js(channel: &ChannelMatrix) -> Array {
    let rows = Array::new();
    for row in channel.rows() {
        let js_row = Array::new();
        for &value in row {
            js_row.push(&JsValue::from(value));
        }
        rows.push(&js_row);
    }
    rows
}

fn payload_to_js(channels: &ChannelSet) -> Result<Object, JsValue> {
    let payload = Object::new();
    Reflect::set(&payload, &JsValue::from_str("r"), &rows_to_js(channels.r()))?;
    Reflect::set(&payload, &JsValue::from_str("g"), &rows_to_js(channels.g()))?;
    Reflect::set(&payload, &JsValue::from_str("b"), &rows_to_js(channels.b()))?;
    Ok(payload)
}

fn strings_to_js<'a>(values: impl IntoIterator<Item = &'a String>) -> Array {
    let array = Array::new();
    for value in values {
        array.push(&JsValue::from_str(value));
    }
    array
}

fn result_to_js(result: &EmojiResult) -> Result<Object, JsValue> {
    let colors = Array::new();
    for row in &result.colors {
        colors.push(&strings_to_js(row));
    }

    let matrix = payload_to_js(&result.matrix)?;

    let out = Object::new();
    Reflect::set(&out, &JsValue::from_str("name"), &JsValue::from_str(&result.name))?;
    Reflect::set(&out, &JsValue::from_str("url"), &JsValue::from_str(&result.url))?;
    Reflect::set(&out, &JsValue::from_str("matrix"), &matrix)?;
    Reflect::set(&out, &JsValue::from_str("colors"), &colors)?;
    Reflect::set(
        &out,
        &JsValue::from_str("palette"),
        &strings_to_js(&result.palette.to_hex()),
    )?;
    Ok(out)
}

fn current_config() -> EmojiConfig {
    STATE.with(|state| state.borrow().config.clone())
}

/// Replace the pipeline configuration with the given JSON document.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = EmojiConfig::from_json(json)?;
    STATE.with(|state| state.borrow_mut().config = config);
    Ok(())
}

/// Register the image names available under the base path. Used when no
/// predefined list is configured.
#[wasm_bindgen(js_name = registerManifest)]
pub fn register_manifest(names: Array) -> Result<(), JsValue> {
    let mut manifest = Vec::new();
    for value in names.iter() {
        let name = value
            .as_string()
            .ok_or_else(|| JsValue::from_str("Manifest entries must be strings"))?;
        manifest.push(name);
    }
    // Validate before storing so a bad list never replaces a good one
    EmojiCatalog::from_names(&current_config(), &manifest)?;
    STATE.with(|state| state.borrow_mut().manifest = manifest);
    Ok(())
}

#[wasm_bindgen(js_name = listPredefinedEmojis)]
pub fn list_predefined_emojis() -> Result<Array, JsValue> {
    let catalog = STATE.with(|state| state.borrow().catalog())?;
    let list = Array::new();
    for entry in catalog.list_predefined_emojis() {
        let item = Object::new();
        Reflect::set(&item, &JsValue::from_str("name"), &JsValue::from_str(&entry.name))?;
        Reflect::set(&item, &JsValue::from_str("label"), &JsValue::from_str(&entry.label))?;
        Reflect::set(&item, &JsValue::from_str("url"), &JsValue::from_str(&entry.url))?;
        list.push(&item);
    }
    Ok(list)
}

#[wasm_bindgen(js_name = getEmojiUrlByName)]
pub fn get_emoji_url_by_name_js(name: &str) -> Result<String, JsValue> {
    Ok(get_emoji_url_by_name(&current_config(), name)?)
}

/// Run the pipeline on image bytes the caller already fetched.
#[wasm_bindgen(js_name = processEmoji)]
pub fn process_emoji(name: &str, input: Vec<u8>, size: Option<u32>) -> Result<Object, JsValue> {
    let processor = EmojiProcessor::new(current_config())?;
    let result = processor.process_bytes(name, &input, size)?;
    result_to_js(&result)
}

/// Fetch the emoji from the configured base path and run the pipeline.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = loadEmojiByName)]
pub async fn load_emoji_by_name(name: String, size: Option<u32>) -> Result<Object, JsValue> {
    let processor = EmojiProcessor::new(current_config())?;
    let result = processor
        .load_emoji_by_name(&source::BrowserSource, &name, size)
        .await?;
    result_to_js(&result)
}
