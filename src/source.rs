//! Where emoji image bytes come from.

use std::future::Future;

use crate::error::Result;

/// Fetches the raw bytes behind an emoji URL.
pub trait EmojiSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::DirectorySource;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Component, Path, PathBuf};

    use super::EmojiSource;
    use crate::config::PredefinedEmoji;
    use crate::emoji::ensure_name;
    use crate::error::{EmojiError, LoadCause, Result};

    /// Serves `{base_path}/...` URLs from a local directory.
    #[derive(Clone, Debug)]
    pub struct DirectorySource {
        root: PathBuf,
        base_path: String,
    }

    impl DirectorySource {
        pub fn new(root: impl Into<PathBuf>, base_path: impl Into<String>) -> Self {
            Self {
                root: root.into(),
                base_path: base_path.into(),
            }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        /// Map a URL under the base path onto a file below the root.
        pub fn path_for(&self, url: &str) -> Result<PathBuf> {
            let base = self.base_path.trim_end_matches('/');
            let relative = url
                .strip_prefix(base)
                .unwrap_or(url)
                .trim_start_matches('/');

            let relative = Path::new(relative);
            if relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
            {
                let reason = std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "url escapes the emoji directory",
                );
                return Err(EmojiError::image_load(url, reason));
            }
            Ok(self.root.join(relative))
        }

        pub fn read(&self, url: &str) -> Result<Vec<u8>> {
            let path = self.path_for(url)?;
            std::fs::read(&path).map_err(|e| EmojiError::image_load(url, LoadCause::Io(e)))
        }

        /// Every `*.png` below the root, sorted by name. Files whose stem is
        /// not a usable emoji name are skipped, as are symlinked directories.
        pub fn discover(&self) -> Result<Vec<PredefinedEmoji>> {
            let mut found = Vec::new();
            let mut pending = vec![self.root.clone()];
            let base = self.base_path.trim_end_matches('/');

            while let Some(dir) = pending.pop() {
                let entries = std::fs::read_dir(&dir)
                    .map_err(|e| EmojiError::image_load(&dir.display().to_string(), e))?;
                for entry in entries {
                    let entry =
                        entry.map_err(|e| EmojiError::image_load(&dir.display().to_string(), e))?;
                    let path = entry.path();
                    // Symlinked directories are not followed, so link cycles cannot loop
                    let file_type = entry
                        .file_type()
                        .map_err(|e| EmojiError::image_load(&path.display().to_string(), e))?;
                    if file_type.is_dir() {
                        pending.push(path);
                        continue;
                    }
                    let is_png = path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
                    if !is_png {
                        continue;
                    }

                    let file_name = entry.file_name();
                    let file_name = file_name.to_string_lossy();
                    let name = match ensure_name(&file_name) {
                        Ok(name) => name,
                        Err(e) => {
                            log::warn!("skipping {}: {e}", path.display());
                            continue;
                        }
                    };
                    let Ok(relative) = path.strip_prefix(&self.root) else {
                        continue;
                    };
                    let segments: Vec<_> = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect();

                    found.push(PredefinedEmoji {
                        label: name.clone(),
                        url: format!("{base}/{}", segments.join("/")),
                        name,
                    });
                }
            }

            found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.url.cmp(&b.url)));
            Ok(found)
        }
    }

    impl EmojiSource for DirectorySource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.read(url)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSource;

#[cfg(target_arch = "wasm32")]
mod browser {
    use js_sys::Uint8Array;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use super::EmojiSource;
    use crate::error::{EmojiError, LoadCause, Result};

    /// Fetches images through `window.fetch`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserSource;

    fn fetch_error(url: &str, what: &str, err: JsValue) -> EmojiError {
        let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
        EmojiError::image_load(url, LoadCause::Fetch(format!("{what}: {detail}")))
    }

    impl EmojiSource for BrowserSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            let window = web_sys::window().ok_or_else(|| {
                EmojiError::image_load(url, LoadCause::Fetch("no window available".to_string()))
            })?;

            let response = JsFuture::from(window.fetch_with_str(url))
                .await
                .map_err(|e| fetch_error(url, "request failed", e))?;
            let response: web_sys::Response = response
                .dyn_into()
                .map_err(|e| fetch_error(url, "unexpected fetch result", e))?;
            if !response.ok() {
                return Err(EmojiError::image_load(
                    url,
                    LoadCause::Fetch(format!("HTTP {}", response.status())),
                ));
            }

            let buffer = response
                .array_buffer()
                .map_err(|e| fetch_error(url, "unreadable body", e))?;
            let buffer = JsFuture::from(buffer)
                .await
                .map_err(|e| fetch_error(url, "unreadable body", e))?;
            Ok(Uint8Array::new(&buffer).to_vec())
        }
    }
}
