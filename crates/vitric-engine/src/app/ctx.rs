use crate::canvas::Canvas;
use crate::image::{Image, ImageCache};
use crate::time::Timestep;

use super::AppSpec;

/// Runtime actions requested from scene code, buffered and applied after the
/// current frame callback returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuntimeCommand {
    ShowScene(String),
    Exit,
}

/// Per-frame context passed to the active scene.
pub struct SceneCtx<'a> {
    /// Full-window drawing surface for this frame.
    pub canvas: Canvas<'a>,

    /// Elapsed time since the previous frame.
    pub time: Timestep,

    pub(crate) images: &'a ImageCache,
    pub(crate) spec: &'a AppSpec,
    pub(crate) commands: &'a mut Vec<RuntimeCommand>,
}

impl<'a> SceneCtx<'a> {
    /// Cached image lookup by exact filename; `None` for unknown names.
    pub fn image(&self, name: &str) -> Option<&'a Image> {
        self.images.get(name)
    }

    pub fn app_spec(&self) -> &AppSpec {
        self.spec
    }

    /// Requests a switch to the named scene at the end of this frame.
    ///
    /// An unknown name is a silent no-op when applied.
    pub fn show_scene(&mut self, name: impl Into<String>) {
        self.commands.push(RuntimeCommand::ShowScene(name.into()));
    }

    /// Requests a clean shutdown after this frame.
    pub fn request_exit(&mut self) {
        self.commands.push(RuntimeCommand::Exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppFlags, PointerSnapshot};
    use crate::canvas::DrawList;
    use crate::coords::Vec2;
    use std::time::Instant;

    fn ctx_parts() -> (DrawList, ImageCache, AppSpec, Vec<RuntimeCommand>) {
        (
            DrawList::new(),
            ImageCache::new(),
            AppSpec::new("Demo", 640, 480, AppFlags::empty()),
            Vec::new(),
        )
    }

    #[test]
    fn scene_requests_are_buffered_in_order() {
        let (mut list, images, spec, mut commands) = ctx_parts();

        let mut ctx = SceneCtx {
            canvas: Canvas::new(
                &mut list,
                Vec2::new(640.0, 480.0),
                PointerSnapshot::default(),
            ),
            time: Timestep {
                seconds: 0.016,
                now: Instant::now(),
                frame_index: 0,
            },
            images: &images,
            spec: &spec,
            commands: &mut commands,
        };

        ctx.show_scene("Settings");
        ctx.request_exit();

        assert_eq!(
            commands,
            vec![
                RuntimeCommand::ShowScene("Settings".to_string()),
                RuntimeCommand::Exit,
            ]
        );
    }

    #[test]
    fn image_lookup_on_empty_cache_is_none() {
        let (mut list, images, spec, mut commands) = ctx_parts();

        let ctx = SceneCtx {
            canvas: Canvas::new(
                &mut list,
                Vec2::new(640.0, 480.0),
                PointerSnapshot::default(),
            ),
            time: Timestep {
                seconds: 0.016,
                now: Instant::now(),
                frame_index: 0,
            },
            images: &images,
            spec: &spec,
            commands: &mut commands,
        };

        assert!(ctx.image("fav.png").is_none());
    }
}
