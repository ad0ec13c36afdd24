//! GPU-backed image resources.
//!
//! Images are decoded on the CPU, negotiated into a [`PixelFormat`] from
//! their channel count, uploaded into a wgpu texture, and identified by a
//! process-unique [`TextureId`]. The [`ImageCache`] owns every image for the
//! process lifetime; everything else refers to them by filename.

mod cache;

pub use cache::ImageCache;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{bail, Context, Result};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one GPU texture.
///
/// Allocated once per texture creation; image equality is defined as
/// `TextureId` equality, so two images decoded from the same file are still
/// distinct.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Negotiated internal/data pixel-format pair.
///
/// The pair is derived from the decoded channel count; other channel counts
/// fail the load explicitly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    /// 4 channels: RGBA8 internal format, RGBA data format.
    Rgba8,
    /// 3 channels: RGB8 internal format, RGB data format.
    Rgb8,
}

impl PixelFormat {
    pub fn from_channels(channels: u32) -> Result<Self> {
        match channels {
            4 => Ok(PixelFormat::Rgba8),
            3 => Ok(PixelFormat::Rgb8),
            n => bail!("unsupported image channel count: {n}"),
        }
    }

    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// One GPU-resident image.
///
/// The texture is released when the image drops; the cache keeps images alive
/// for the process lifetime.
#[derive(Debug)]
pub struct Image {
    name: String,
    path: Option<PathBuf>,
    width: u32,
    height: u32,
    format: PixelFormat,
    id: TextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Image {
    /// Decodes `path` and uploads it to the GPU.
    ///
    /// Fails on decode errors and on unsupported channel counts; the caller
    /// decides whether that is fatal (the cache logs and skips).
    pub fn from_path(path: &Path, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let name = base_name(path)
            .with_context(|| format!("image path has no file name: {}", path.display()))?;

        let decoded = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;

        let channels = decoded.color().channel_count() as u32;
        let format = PixelFormat::from_channels(channels)
            .with_context(|| format!("cannot load image {}", path.display()))?;

        // wgpu has no 3-channel texture format; RGB sources are expanded to
        // RGBA at upload while the negotiated format pair is kept as metadata.
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();

        let (texture, view) = create_texture(device, &name, width, height);
        upload_rgba(queue, &texture, &rgba, width, height);

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            width,
            height,
            format,
            id: TextureId::next(),
            texture,
            view,
        })
    }

    /// Uploads raw RGBA8 pixels supplied by the embedding application.
    ///
    /// A `data` length that does not match `width * height * 4` is reported
    /// and the buffer is padded/truncated to the expected size; the upload
    /// still proceeds.
    pub fn from_memory(
        name: impl Into<String>,
        data: &[u8],
        width: u32,
        height: u32,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Self {
        let name = name.into();
        let format = PixelFormat::Rgba8;

        let expected = (width * height * format.bytes_per_pixel()) as usize;
        if data.len() != expected {
            log::warn!(
                "image '{name}': data size {} does not match {width}x{height} RGBA ({expected} bytes)",
                data.len()
            );
        }
        let data = fit_to_len(data, expected);

        let (texture, view) = create_texture(device, &name, width, height);
        upload_rgba(queue, &texture, &data, width, height);

        Self {
            name,
            path: None,
            width,
            height,
            format,
            id: TextureId::next(),
            texture,
            view,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl PartialEq for Image {
    /// Images are equal iff their GPU texture identities are equal.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Image {}

/// Cache key for a path: the file base name, case preserved.
pub(crate) fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn fit_to_len(data: &[u8], expected: usize) -> Cow<'_, [u8]> {
    if data.len() == expected {
        return Cow::Borrowed(data);
    }

    let mut fixed = vec![0u8; expected];
    let n = data.len().min(expected);
    fixed[..n].copy_from_slice(&data[..n]);
    Cow::Owned(fixed)
}

fn create_texture(
    device: &wgpu::Device,
    name: &str,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("image:{name}")),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn upload_rgba(queue: &wgpu::Queue, texture: &wgpu::Texture, rgba: &[u8], width: u32, height: u32) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format negotiation ────────────────────────────────────────────────

    #[test]
    fn four_channels_negotiate_rgba8() {
        assert_eq!(PixelFormat::from_channels(4).unwrap(), PixelFormat::Rgba8);
    }

    #[test]
    fn three_channels_negotiate_rgb8() {
        assert_eq!(PixelFormat::from_channels(3).unwrap(), PixelFormat::Rgb8);
    }

    #[test]
    fn other_channel_counts_are_rejected() {
        for n in [0, 1, 2, 5] {
            assert!(PixelFormat::from_channels(n).is_err(), "channels = {n}");
        }
    }

    #[test]
    fn bytes_per_pixel_matches_the_pair() {
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn texture_ids_are_unique() {
        let a = TextureId::next();
        let b = TextureId::next();
        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    // ── keys and buffers ──────────────────────────────────────────────────

    #[test]
    fn base_name_discards_path_components_and_preserves_case() {
        assert_eq!(
            base_name(Path::new("res/icons/fav.PNG")).unwrap(),
            "fav.PNG"
        );
    }

    #[test]
    fn fit_to_len_passes_exact_buffers_through() {
        let data = [1u8, 2, 3, 4];
        assert!(matches!(fit_to_len(&data, 4), Cow::Borrowed(_)));
    }

    #[test]
    fn fit_to_len_pads_and_truncates() {
        assert_eq!(fit_to_len(&[1, 2], 4).as_ref(), &[1, 2, 0, 0]);
        assert_eq!(fit_to_len(&[1, 2, 3, 4, 5], 4).as_ref(), &[1, 2, 3, 4]);
    }
}
