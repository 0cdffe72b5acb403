//! Texture loading

use std::path::Path;

use image::DynamicImage;
use thiserror::Error;

use crate::backend::{BackendResult, GraphicsBackend, TextureDescriptor, TextureFormat, TextureHandle};

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 image, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
    pub name: String,
}

impl TextureData {
    /// Load texture from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_image(img, &name))
    }

    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes).map_err(|source| TextureError::Load {
            path: name.to_string(),
            source,
        })?;
        Ok(Self::from_image(img, name))
    }

    // Texture coordinate v = 0 addresses the bottom of the image.
    fn from_image(img: DynamicImage, name: &str) -> Self {
        let rgba = img.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();

        Self {
            width,
            height,
            format: TextureFormat::Rgba8UnormSrgb,
            data: rgba.into_raw(),
            name: name.to_string(),
        }
    }

    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8UnormSrgb,
            data: color.to_vec(),
            name: name.to_string(),
        }
    }

    pub fn white() -> Self {
        Self::solid_color([255, 255, 255, 255], "white")
    }

    /// Load `path`, falling back to white when it cannot be decoded.
    pub fn from_file_or_white<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_else(|err| {
            log::error!("{err}");
            Self::white()
        })
    }

    pub fn upload<B: GraphicsBackend>(&self, backend: &mut B) -> BackendResult<TextureHandle> {
        backend.create_texture(&TextureDescriptor {
            label: Some(self.name.clone()),
            width: self.width,
            height: self.height,
            format: self.format,
            data: &self.data,
        })
    }
}
