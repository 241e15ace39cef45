//! Auxiliary execute outputs: image fetching and texture caching
//!
//! Image items are fetched whole in the background; decoding into a
//! texture happens lazily on the render path, once, and is cached.

use eframe::egui;
use tracing::debug;

use super::App;
use crate::types::{BackendEvent, SpecialOutput};

/// Render-side state of one image block.
pub(crate) enum ImageSlot {
    Loading,
    Failed(String),
    Ready(egui::TextureHandle),
}

/// Resolves an item URL against the backend base. Already-absolute URLs
/// pass through.
pub(crate) fn absolute_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

impl App {
    /// Drops previously rendered auxiliary images and starts one fetch
    /// task per image item of the current execute response.
    pub(crate) fn refresh_special_images(&mut self, ctx: &egui::Context) {
        self.image_bytes.clear();
        self.image_textures.clear();
        self.image_errors.clear();

        for item in &self.session.special_outputs {
            let SpecialOutput::Image { url, title } = item else {
                continue;
            };
            debug!(title = %title, url = %url, "Fetching auxiliary image");

            let absolute = absolute_url(&self.backend_url, url);
            let key = url.clone();
            let client = self.client.clone();
            let events = self.events.clone();
            let ctx = ctx.clone();
            self.runtime.spawn(async move {
                let event = match fetch_bytes(&client, &absolute).await {
                    Ok(bytes) => BackendEvent::ImageLoaded { url: key, bytes },
                    Err(error) => BackendEvent::ImageFailed { url: key, error },
                };
                events.lock().unwrap().push(event);
                ctx.request_repaint();
            });
        }
    }

    /// Texture for an image block, decoding fetched bytes on first use.
    pub(crate) fn image_slot(&mut self, ctx: &egui::Context, url: &str) -> ImageSlot {
        if let Some(error) = self.image_errors.get(url) {
            return ImageSlot::Failed(error.clone());
        }
        if let Some(cached) = self.image_textures.get(url) {
            return match cached {
                Some(texture) => ImageSlot::Ready(texture.clone()),
                None => ImageSlot::Failed("Could not decode image".to_string()),
            };
        }

        let Some(bytes) = self.image_bytes.get(url) else {
            return ImageSlot::Loading;
        };

        let texture = image::load_from_memory(bytes).ok().map(|img| {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.into_raw();
            ctx.load_texture(
                url,
                egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                egui::TextureOptions::LINEAR,
            )
        });
        self.image_textures.insert(url.to_string(), texture.clone());
        match texture {
            Some(texture) => ImageSlot::Ready(texture),
            None => ImageSlot::Failed("Could not decode image".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::absolute_url;

    #[test]
    fn relative_urls_join_the_backend_base() {
        assert_eq!(
            absolute_url("http://127.0.0.1:5000", "/static/plot.png"),
            "http://127.0.0.1:5000/static/plot.png"
        );
        assert_eq!(
            absolute_url("http://127.0.0.1:5000/", "static/plot.png"),
            "http://127.0.0.1:5000/static/plot.png"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            absolute_url("http://127.0.0.1:5000", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
