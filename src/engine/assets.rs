use std::{
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, Sender, channel},
};

use image::{RgbaImage, imageops::FilterType};
use log::{info, warn};
use thiserror::Error;

use crate::engine::r#async::ThreadPool;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub fn decode_texture(path: &Path) -> Result<RgbaImage, TextureError> {
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Downscales `image` so neither side exceeds `max_dimension`, keeping the
/// aspect ratio. Images already within the limit are returned untouched.
pub fn fit_to_limit(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let max_dimension = max_dimension.max(1);
    if width <= max_dimension && height <= max_dimension {
        return image;
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let scaled_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let scaled_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
    image::imageops::resize(&image, scaled_width, scaled_height, FilterType::Triangle)
}

#[derive(Debug)]
pub struct LoadedTexture {
    /// Index of the scene surface the texture belongs to.
    pub surface: usize,
    pub image: RgbaImage,
}

pub struct TextureLoader {
    pool: ThreadPool,
    max_dimension: u32,
    sender: Sender<LoadedTexture>,
    receiver: Receiver<LoadedTexture>,
}

impl TextureLoader {
    /// `max_dimension` is the device's 2D texture size limit.
    pub fn new(workers: usize, max_dimension: u32) -> Self {
        let (sender, receiver) = channel();
        Self {
            pool: ThreadPool::new(workers),
            max_dimension,
            sender,
            receiver,
        }
    }

    pub fn load(&self, surface: usize, path: PathBuf) {
        let sender = self.sender.clone();
        let max_dimension = self.max_dimension;
        self.pool.submit(move || match decode_texture(&path) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let image = fit_to_limit(image, max_dimension);
                if image.dimensions() != (width, height) {
                    warn!(
                        "{} is {width}x{height}, downscaled to {}x{} (limit {max_dimension})",
                        path.display(),
                        image.width(),
                        image.height()
                    );
                } else {
                    info!("decoded {} ({width}x{height})", path.display());
                }
                let _ = sender.send(LoadedTexture { surface, image });
            }
            Err(err) => warn!("{err}"),
        });
    }

    /// Textures finished since the last poll; never blocks.
    pub fn poll(&self) -> Vec<LoadedTexture> {
        self.receiver.try_iter().collect()
    }

    #[cfg(test)]
    fn wait(&self, timeout: std::time::Duration) -> Option<LoadedTexture> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Waits for in-flight decodes, then returns everything delivered.
    pub fn finish(self) -> Vec<LoadedTexture> {
        let TextureLoader {
            pool,
            sender,
            receiver,
            ..
        } = self;
        pool.shutdown();
        drop(sender);
        receiver.into_iter().collect()
    }
}
