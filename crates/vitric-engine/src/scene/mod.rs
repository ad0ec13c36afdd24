//! Scenes and the active-scene registry.
//!
//! A scene is a named unit of per-frame UI content with its own sizing and
//! resizability policy. The registry owns every registered scene for the
//! process lifetime and tracks the single active one; switching scenes yields
//! buffered [`WindowDirectives`] that the runtime applies to the native
//! window.

mod registry;
mod title_bar;

pub use registry::{SceneRegistry, WindowDirectives};
pub use title_bar::TITLE_BAR_ICON;

pub(crate) use title_bar::draw_default_title_bar;

use crate::app::SceneCtx;

/// Static attributes of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSpec {
    name: String,
    width: u32,
    height: u32,
    resizable: bool,
    custom_title_bar: bool,
}

impl SceneSpec {
    /// A freely resizable scene. Preferred width/height are ignored.
    pub fn resizable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            resizable: true,
            custom_title_bar: false,
        }
    }

    /// A fixed-size scene; the window is locked to `width`×`height` while it
    /// is active.
    pub fn fixed(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            resizable: false,
            custom_title_bar: false,
        }
    }

    /// Opts this scene into the application's custom title bar.
    pub fn with_custom_title_bar(mut self) -> Self {
        self.custom_title_bar = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn wants_custom_title_bar(&self) -> bool {
        self.custom_title_bar
    }
}

/// Per-frame scene contract.
///
/// The runtime calls [`on_render`](Scene::on_render) once per frame for the
/// active scene only, after the title-bar protocol has run.
pub trait Scene {
    fn spec(&self) -> &SceneSpec;

    fn on_render(&mut self, ctx: &mut SceneCtx<'_>);
}
