//! Immediate-mode drawing surface.
//!
//! Scenes paint through a [`Canvas`] into a renderer-agnostic [`DrawList`];
//! the runtime flushes the list through the wgpu shape renderers at the end
//! of the frame. Ordering is deterministic: layer first, insertion order
//! within a layer.

mod list;
pub mod render;

pub use list::{DrawCmd, DrawItem, DrawList, ImageCmd, RectCmd, SortKey, ZIndex};

use crate::app::PointerSnapshot;
use crate::coords::{Rect, Vec2};
use crate::image::Image;

/// Linear premultiplied RGBA color.
///
/// `rgb` components are expected to be multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    #[inline]
    pub const fn transparent() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
        }
    }

    /// Creates a premultiplied color from straight components in `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a premultiplied color from straight sRGB bytes.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }
}

/// Full-window drawing surface handed to the active scene each frame.
///
/// Wraps the frame's [`DrawList`] with a high-level API and exposes the
/// runtime's pointer snapshot so scenes can express hover/press visuals and
/// simple buttons without their own input plumbing.
pub struct Canvas<'a> {
    list: &'a mut DrawList,
    size: Vec2,
    pointer: PointerSnapshot,
    z: i32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(list: &'a mut DrawList, size: Vec2, pointer: PointerSnapshot) -> Self {
        Self {
            list,
            size,
            pointer,
            z: 0,
        }
    }

    /// Canvas size in logical pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Sets the layer for subsequent draws. Higher layers paint on top.
    pub fn set_layer(&mut self, z: i32) {
        self.z = z;
    }

    // ── input queries ─────────────────────────────────────────────────────

    pub fn is_hovered(&self, rect: Rect) -> bool {
        match self.pointer.pos {
            Some(p) => rect.contains(p),
            None => false,
        }
    }

    pub fn is_pressed(&self, rect: Rect) -> bool {
        self.pointer.primary_down && self.is_hovered(rect)
    }

    /// True when the primary button was released over `rect` this frame.
    pub fn clicked(&self, rect: Rect) -> bool {
        self.pointer.primary_clicked && self.is_hovered(rect)
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Fills `rect` with `color`.
    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.list
            .push(ZIndex::new(self.z), DrawCmd::Rect(RectCmd { rect, color }));
    }

    /// Draws `image` stretched over `rect`.
    pub fn image(&mut self, rect: Rect, image: &Image) {
        self.image_tinted(rect, image, Color::WHITE);
    }

    /// Draws `image` over `rect`, modulated by `tint`.
    pub fn image_tinted(&mut self, rect: Rect, image: &Image, tint: Color) {
        self.list.push(
            ZIndex::new(self.z),
            DrawCmd::Image(ImageCmd {
                rect,
                texture: image.id(),
                view: image.view().clone(),
                tint,
            }),
        );
    }

    /// Draws an image-backed button; returns `true` when the primary button
    /// was released over it this frame.
    pub fn image_button(&mut self, rect: Rect, image: &Image) -> bool {
        let tint = if self.is_pressed(rect) {
            Color::from_straight(0.8, 0.8, 0.8, 1.0)
        } else {
            Color::WHITE
        };
        self.image_tinted(rect, image, tint);

        self.clicked(rect)
    }
}
