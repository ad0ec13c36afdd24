use std::sync::atomic::{AtomicBool, Ordering};

use crate::app::SceneCtx;
use crate::canvas::Color;
use crate::coords::Rect;

/// Fixed cache name of the title-bar icon.
pub const TITLE_BAR_ICON: &str = "fav.png";

const TITLE_BAR_HEIGHT: f32 = 32.0;

static MISSING_ICON_WARNED: AtomicBool = AtomicBool::new(false);

/// Default custom-title-bar painter: a branded strip across the top with the
/// icon button from the image cache.
///
/// A missing icon skips the button (reported once) rather than failing the
/// frame.
pub(crate) fn draw_default_title_bar(ctx: &mut SceneCtx<'_>) {
    let width = ctx.canvas.size().x;
    let strip = Rect::new(0.0, 0.0, width, TITLE_BAR_HEIGHT);
    ctx.canvas.rect(strip, Color::from_srgb_u8(24, 24, 28, 255));

    match ctx.image(TITLE_BAR_ICON) {
        Some(icon) => {
            let button_h = TITLE_BAR_HEIGHT * 0.8;
            let aspect = if icon.height() > 0 {
                icon.width() as f32 / icon.height() as f32
            } else {
                1.0
            };
            let button = Rect::new(
                4.0,
                (TITLE_BAR_HEIGHT - button_h) / 2.0,
                button_h * aspect,
                button_h,
            );
            ctx.canvas.image_button(button, icon);
        }
        None => {
            if !MISSING_ICON_WARNED.swap(true, Ordering::Relaxed) {
                log::warn!(
                    "title bar icon '{TITLE_BAR_ICON}' is not in the image cache; skipping it"
                );
            }
        }
    }
}
