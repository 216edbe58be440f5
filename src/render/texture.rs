//! Textures.
//!
//! Decoding goes through the `image` crate; everything is expanded to RGBA8
//! before upload so the device only ever sees one format. The 1x1 fallback
//! constructors exist so materials without maps can still bind both sampler
//! units.

use log::debug;
use thiserror::Error;

use crate::render::device::{DeviceError, RenderDevice, TextureDesc, TextureFormat, TextureHandle};

/// Errors from texture decode or upload.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The encoded image could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The device rejected the upload.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A device texture plus its dimensions.
pub struct Texture {
    handle: TextureHandle,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decode an encoded image (PNG, JPEG) and upload it.
    pub fn from_encoded(device: &dyn RenderDevice, bytes: &[u8]) -> Result<Self, TextureError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        debug!("decoded texture {width}x{height}");
        Self::from_pixels(device, width, height, image.as_raw()).map_err(TextureError::from)
    }

    /// Upload raw RGBA8 pixels.
    pub fn from_pixels(
        device: &dyn RenderDevice,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self, DeviceError> {
        let desc = TextureDesc {
            width,
            height,
            format: TextureFormat::Rgba8,
        };
        let handle = device.create_texture(&desc, rgba)?;
        Ok(Self {
            handle,
            width,
            height,
        })
    }

    /// 1x1 opaque white, the identity for color modulation.
    pub fn white(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Self::from_pixels(device, 1, 1, &[255, 255, 255, 255])
    }

    /// 1x1 "straight up" tangent-space normal.
    pub fn flat_normal(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Self::from_pixels(device, 1, 1, &[128, 128, 255, 255])
    }

    /// The device handle.
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Release the device texture.
    pub fn destroy(&self, device: &dyn RenderDevice) {
        device.destroy_texture(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessDevice;

    #[test]
    fn raw_pixels_upload_and_destroy() {
        let device = HeadlessDevice::new(4, 4);
        let texture = Texture::from_pixels(&device, 2, 2, &[0u8; 16]).unwrap();
        assert_eq!((texture.width(), texture.height()), (2, 2));
        assert_eq!(device.live_texture_count(), 1);
        texture.destroy(&device);
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let device = HeadlessDevice::new(4, 4);
        let result = Texture::from_encoded(&device, &[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(TextureError::Decode(_))));
    }

    #[test]
    fn fallback_textures_are_single_pixel() {
        let device = HeadlessDevice::new(4, 4);
        let white = Texture::white(&device).unwrap();
        let normal = Texture::flat_normal(&device).unwrap();
        assert_eq!((white.width(), white.height()), (1, 1));
        assert_eq!((normal.width(), normal.height()), (1, 1));
    }
}
