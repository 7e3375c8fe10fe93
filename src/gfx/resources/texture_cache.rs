//! Texture cache keyed by file path or embedded-image identity.
//!
//! Decoding happens once per key on the CPU through the `image` crate; GPU
//! textures and their bind groups are created on first use by the renderer.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::assets::TextureSource;

use super::texture_resource::TextureResource;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture: {0}")]
    Image(#[from] image::ImageError),
    #[error("texture data for '{0}' does not match its size")]
    BadSize(String),
}

/// RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

#[derive(Default)]
pub struct TextureCache {
    /// `None` marks a key that failed to decode, so it is not retried every frame.
    decoded: HashMap<String, Option<DecodedTexture>>,
    bind_groups: HashMap<String, wgpu::BindGroup>,
    textures: Vec<TextureResource>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decoded_count(&self) -> usize {
        self.decoded.values().filter(|t| t.is_some()).count()
    }

    /// Decodes a texture, returning the cached copy on later calls.
    pub fn decode(&mut self, source: &TextureSource) -> Option<&DecodedTexture> {
        let key = source.key();
        if !self.decoded.contains_key(&key) {
            let result = decode_source(source);
            if let Err(err) = &result {
                log::warn!("Texture '{}' unavailable: {}", key, err);
            }
            self.decoded.insert(key.clone(), result.ok());
        }
        self.decoded.get(&key).and_then(Option::as_ref)
    }

    /// Bind group (texture view + sampler) for a source, uploading on first use.
    pub fn bind_group(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        source: &TextureSource,
    ) -> Option<wgpu::BindGroup> {
        let key = source.key();
        if let Some(bind_group) = self.bind_groups.get(&key) {
            return Some(bind_group.clone());
        }

        let decoded = self.decode(source)?.clone();
        let texture = TextureResource::create_from_rgba_data(
            device,
            queue,
            &decoded.rgba,
            decoded.width,
            decoded.height,
            &key,
        );
        let bind_group = create_texture_bind_group(device, layout, &texture, &key);

        self.textures.push(texture);
        self.bind_groups.insert(key, bind_group.clone());
        Some(bind_group)
    }

    /// Releases every GPU texture. Decoded pixels are kept.
    pub fn release_gpu(&mut self) {
        for texture in self.textures.drain(..) {
            texture.texture.destroy();
        }
        self.bind_groups.clear();
    }
}

pub fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResource,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

fn decode_source(source: &TextureSource) -> Result<DecodedTexture, TextureError> {
    match source {
        TextureSource::File(path) => {
            let image = image::open(path)?.to_rgba8();
            Ok(DecodedTexture {
                width: image.width(),
                height: image.height(),
                rgba: Arc::new(image.into_raw()),
            })
        }
        TextureSource::Embedded {
            key,
            width,
            height,
            rgba,
        } => {
            if rgba.len() != (*width as usize) * (*height as usize) * 4 {
                return Err(TextureError::BadSize(key.clone()));
            }
            Ok(DecodedTexture {
                width: *width,
                height: *height,
                rgba: Arc::clone(rgba),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_texture_is_decoded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut cache = TextureCache::new();
        let source = TextureSource::File(path.clone());
        let decoded = cache.decode(&source).cloned().unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);

        std::fs::remove_file(&path).unwrap();
        assert!(cache.decode(&source).is_some());
        assert_eq!(cache.decoded_count(), 1);
    }

    #[test]
    fn test_missing_file_is_remembered_as_failure() {
        let mut cache = TextureCache::new();
        let source = TextureSource::File("nowhere/none.png".into());
        assert!(cache.decode(&source).is_none());
        assert!(cache.decode(&source).is_none());
        assert_eq!(cache.decoded_count(), 0);
    }

    #[test]
    fn test_embedded_size_mismatch_is_rejected() {
        let mut cache = TextureCache::new();
        let source = TextureSource::Embedded {
            key: "model.glb#0".into(),
            width: 4,
            height: 4,
            rgba: Arc::new(vec![0; 3]),
        };
        assert!(cache.decode(&source).is_none());
    }
}
