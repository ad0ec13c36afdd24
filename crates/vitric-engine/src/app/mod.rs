//! Application runtime.
//!
//! Owns the window, the event queue, the scene registry, and the image
//! cache, and drives the frame loop that ties them together. There is no
//! global instance: the runtime is constructed explicitly and consumed by
//! [`Application::run`], which drives exactly one window and one event loop.

mod ctx;
mod pointer;
mod routing;
mod runtime;

pub use ctx::SceneCtx;
pub use pointer::PointerSnapshot;

pub(crate) use ctx::RuntimeCommand;
pub(crate) use pointer::PointerState;
pub(crate) use routing::route_event;

use anyhow::{Context, Result};
use bitflags::bitflags;
use winit::event_loop::EventLoop;

use crate::image::ImageCache;
use crate::scene::SceneRegistry;

use runtime::RuntimeState;

bitflags! {
    /// Construction flags for the application window.
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct AppFlags: u32 {
        const MINIMIZED        = 1 << 0;
        /// Create the window undecorated; scenes that opt in get the
        /// runtime-drawn title bar instead.
        const CUSTOM_TITLE_BAR = 1 << 1;
    }
}

/// Application construction parameters plus the live window size.
///
/// Width/height track the window: the resize handler keeps them current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub flags: AppFlags,
}

impl AppSpec {
    pub fn new(name: impl Into<String>, width: u32, height: u32, flags: AppFlags) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            flags,
        }
    }

    pub fn has_flag(&self, flag: AppFlags) -> bool {
        self.flags.contains(flag)
    }
}

pub(crate) type TitleBarFn = Box<dyn FnMut(&mut SceneCtx<'_>)>;

/// The windowed-application runtime.
///
/// Construct it, register scenes, then call [`run`](Self::run) to enter the
/// frame loop. Window and GPU resources are created lazily when the event
/// loop delivers its `resumed` signal.
pub struct Application {
    spec: AppSpec,
    scenes: SceneRegistry,
    images: ImageCache,
    title_bar: Option<TitleBarFn>,
}

impl Application {
    pub fn new(name: impl Into<String>, width: u32, height: u32, flags: AppFlags) -> Self {
        Self {
            spec: AppSpec::new(name, width, height, flags),
            scenes: SceneRegistry::new(),
            images: ImageCache::new(),
            title_bar: None,
        }
    }

    pub fn spec(&self) -> &AppSpec {
        &self.spec
    }

    /// Scene registration surface, used before `run`.
    pub fn scenes_mut(&mut self) -> &mut SceneRegistry {
        &mut self.scenes
    }

    /// Replaces the default custom-title-bar painter.
    pub fn set_custom_title_bar(&mut self, f: impl FnMut(&mut SceneCtx<'_>) + 'static) {
        self.title_bar = Some(Box::new(f));
    }

    /// Runs the frame loop until a close request or a scene asks to exit.
    ///
    /// Window, GPU, or resource-directory initialization failures abort
    /// startup and propagate from here; frame-loop errors never do.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit event loop")?;
        let mut state = RuntimeState::new(self.spec, self.scenes, self.images, self.title_bar);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_flags_are_queryable() {
        let spec = AppSpec::new("Demo", 1, 1, AppFlags::CUSTOM_TITLE_BAR);
        assert!(spec.has_flag(AppFlags::CUSTOM_TITLE_BAR));
        assert!(!spec.has_flag(AppFlags::MINIMIZED));
    }
}
