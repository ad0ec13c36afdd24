use core::cmp::Ordering;

use crate::coords::Rect;
use crate::image::TextureId;

use super::Color;

/// Z-ordering key for draw items. Higher values appear on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl Ord for ZIndex {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ZIndex {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable sort key: z-layer ascending, then insertion order ascending.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.z.cmp(&other.z) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Solid rectangle fill.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

/// Textured quad. Carries the texture view so the renderer does not need to
/// resolve ids against the cache mid-flush.
#[derive(Debug, Clone)]
pub struct ImageCmd {
    pub rect: Rect,
    pub texture: TextureId,
    pub view: wgpu::TextureView,
    pub tint: Color,
}

/// Renderer-agnostic draw command stream.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    Rect(RectCmd),
    Image(ImageCmd),
}

/// A single draw item: sort key + command.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// `push()` is O(1); paint-order iteration reuses an internal index buffer so
/// there is no per-frame allocation once warmed.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey { z, order },
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Iterates items in paint order (back-to-front).
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_cmd(x: f32) -> DrawCmd {
        DrawCmd::Rect(RectCmd {
            rect: Rect::new(x, 0.0, 1.0, 1.0),
            color: Color::WHITE,
        })
    }

    fn painted_xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Rect(r) => r.rect.origin.x,
                DrawCmd::Image(i) => i.rect.origin.x,
            })
            .collect()
    }

    #[test]
    fn equal_layers_paint_in_insertion_order() {
        let mut list = DrawList::new();
        list.push(ZIndex::new(0), rect_cmd(1.0));
        list.push(ZIndex::new(0), rect_cmd(2.0));
        list.push(ZIndex::new(0), rect_cmd(3.0));

        assert_eq!(painted_xs(&mut list), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn lower_layers_paint_first() {
        let mut list = DrawList::new();
        list.push(ZIndex::new(5), rect_cmd(1.0));
        list.push(ZIndex::new(-1), rect_cmd(2.0));
        list.push(ZIndex::new(0), rect_cmd(3.0));

        assert_eq!(painted_xs(&mut list), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn clear_resets_order_counter() {
        let mut list = DrawList::new();
        list.push(ZIndex::new(0), rect_cmd(1.0));
        list.clear();
        assert!(list.items().is_empty());

        list.push(ZIndex::new(0), rect_cmd(4.0));
        assert_eq!(list.items()[0].key.order, 0);
    }
}
