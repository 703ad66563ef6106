//! Image decoding and GPU texture upload.
//!
//! Decoding is CPU-only and testable; `upload` turns an `RgbaImage` into a
//! bindable [`Texture`] using the quad renderer's bind group layout.

use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, Rgba, RgbaImage};

/// Container format of a texture file. The decoder trusts it over the extension.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageHint {
    Png,
    Jpeg,
}

impl ImageHint {
    fn format(self) -> ImageFormat {
        match self {
            ImageHint::Png => ImageFormat::Png,
            ImageHint::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Errors that can occur while loading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// A GPU texture with a ready-to-bind bind group.
pub struct Texture {
    _texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
    size: (u32, u32),
    label: String,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Decodes an image file into straight-alpha RGBA8.
pub fn decode(path: &Path, hint: ImageHint) -> Result<RgbaImage, TextureError> {
    let mut reader = ImageReader::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    reader.set_format(hint.format());

    let img = reader.decode().map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.to_rgba8())
}

/// Shrinks `img` so neither side exceeds `max_dim`, keeping the aspect ratio.
pub fn fit_to_limit(img: RgbaImage, max_dim: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_dim && h <= max_dim {
        return img;
    }

    let scale = max_dim as f32 / w.max(h) as f32;
    let nw = ((w as f32 * scale) as u32).clamp(1, max_dim);
    let nh = ((h as f32 * scale) as u32).clamp(1, max_dim);
    log::warn!("texture {w}x{h} exceeds device limit {max_dim}; resizing to {nw}x{nh}");
    image::imageops::resize(&img, nw, nh, image::imageops::FilterType::Triangle)
}

/// A white disc on a transparent background, with a one-texel soft edge.
///
/// Tinted per draw, this stands in for planet and star artwork.
pub fn disc_image(size: u32) -> RgbaImage {
    let size = size.max(2);
    let r = size as f32 * 0.5;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        let d = (dx * dx + dy * dy).sqrt();
        let alpha = (r - d).clamp(0.0, 1.0);
        Rgba([255, 255, 255, (alpha * 255.0).round() as u8])
    })
}

/// A white wedge on a transparent background, tip at the right edge.
///
/// Points along +X like an unrotated ship sprite.
pub fn wedge_image(size: u32) -> RgbaImage {
    let size = size.max(2);
    let n = size as f32;
    RgbaImage::from_fn(size, size, |x, y| {
        let u = (x as f32 + 0.5) / n;
        let v = (y as f32 + 0.5) / n - 0.5;
        let inside = v.abs() <= 0.5 * (1.0 - u);
        Rgba([255, 255, 255, if inside { 255 } else { 0 }])
    })
}

/// A single fully transparent texel.
///
/// Substituted for textures that failed to load: draws using it cover nothing.
pub fn placeholder_image() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]))
}

/// Uploads an RGBA8 image as an sRGB texture and builds its bind group.
pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    img: &RgbaImage,
    label: &str,
) -> Result<Texture, TextureError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }

    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        extent,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    Ok(Texture {
        _texture: texture,
        bind_group,
        size: (width, height),
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stardrift-{}-{name}", std::process::id()))
    }

    #[test]
    fn decodes_png_with_alpha() {
        let path = temp_path("sprite.png");
        let src = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
        src.save_with_format(&path, ImageFormat::Png).unwrap();

        let img = decode(&path, ImageHint::Png).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1), &Rgba([10, 20, 30, 40]));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = decode(Path::new("/definitely/not/here.png"), ImageHint::Png).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let path = temp_path("garbage.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();

        let err = decode(&path, ImageHint::Jpeg).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn disc_is_opaque_in_centre_and_clear_in_corners() {
        let img = disc_image(32);
        assert_eq!(img.get_pixel(16, 16)[3], 255);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(31, 31)[3], 0);
    }

    #[test]
    fn wedge_points_right() {
        let img = wedge_image(32);
        // Wide at the back, a sliver at the tip, empty above and below the tip.
        assert_eq!(img.get_pixel(1, 16)[3], 255);
        assert_eq!(img.get_pixel(30, 16)[3], 255);
        assert_eq!(img.get_pixel(30, 2)[3], 0);
        assert_eq!(img.get_pixel(30, 29)[3], 0);
    }

    #[test]
    fn placeholder_is_transparent() {
        let img = placeholder_image();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn fit_to_limit_preserves_aspect() {
        let img = RgbaImage::new(400, 100);
        let out = fit_to_limit(img, 200);
        assert_eq!(out.dimensions(), (200, 50));

        let small = RgbaImage::new(10, 10);
        assert_eq!(fit_to_limit(small, 200).dimensions(), (10, 10));
    }
}
