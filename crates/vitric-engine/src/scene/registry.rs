use std::collections::HashMap;

use super::Scene;

/// Window side effects of a scene switch, buffered for the runtime to apply
/// after the current callback returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDirectives {
    /// Whether the native window should accept user resizing.
    pub resizable: bool,
    /// Requested inner size in logical pixels; set only for fixed-size scenes.
    pub size: Option<(u32, u32)>,
    /// New window title.
    pub title: String,
}

/// Name-keyed store of scenes plus the single active one.
///
/// Scenes are owned here for the process lifetime; everything else refers to
/// them by name.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, Box<dyn Scene>>,
    active: Option<String>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `scene` under its name.
    ///
    /// A duplicate name is a silent no-op, not an overwrite. The first scene
    /// ever added becomes the active scene automatically.
    pub fn add(&mut self, scene: Box<dyn Scene>) {
        let name = scene.spec().name().to_string();
        if self.scenes.contains_key(&name) {
            return;
        }

        self.scenes.insert(name.clone(), scene);
        if self.active.is_none() {
            self.active = Some(name);
        }
    }

    /// Makes `name` the active scene and returns the window side effects to
    /// apply: a resize lock plus stored size for fixed-size scenes, an unlock
    /// otherwise, and a `"{scene} - {app}"` title either way.
    ///
    /// An unregistered `name` is a no-op; the active scene is unchanged and
    /// `None` is returned.
    pub fn show(&mut self, name: &str, app_name: &str) -> Option<WindowDirectives> {
        let scene = self.scenes.get(name)?;
        self.active = Some(name.to_string());

        let spec = scene.spec();
        Some(WindowDirectives {
            resizable: spec.is_resizable(),
            size: if spec.is_resizable() {
                None
            } else {
                Some((spec.width(), spec.height()))
            },
            title: format!("{} - {}", spec.name(), app_name),
        })
    }

    pub fn active_scene(&self) -> Option<&dyn Scene> {
        let name = self.active.as_deref()?;
        self.scenes.get(name).map(|s| s.as_ref())
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        let name = self.active.as_deref()?;
        self.scenes.get_mut(name).map(|s| s.as_mut())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SceneCtx;
    use crate::scene::SceneSpec;

    struct Blank {
        spec: SceneSpec,
    }

    impl Blank {
        fn resizable(name: &str) -> Box<dyn Scene> {
            Box::new(Blank {
                spec: SceneSpec::resizable(name),
            })
        }

        fn fixed(name: &str, w: u32, h: u32) -> Box<dyn Scene> {
            Box::new(Blank {
                spec: SceneSpec::fixed(name, w, h),
            })
        }
    }

    impl Scene for Blank {
        fn spec(&self) -> &SceneSpec {
            &self.spec
        }

        fn on_render(&mut self, _ctx: &mut SceneCtx<'_>) {}
    }

    fn active_name(reg: &SceneRegistry) -> Option<&str> {
        reg.active_scene().map(|s| s.spec().name())
    }

    // ── add ───────────────────────────────────────────────────────────────

    #[test]
    fn first_add_becomes_active() {
        let mut reg = SceneRegistry::new();
        assert!(reg.active_scene().is_none());

        reg.add(Blank::resizable("Main"));
        assert_eq!(active_name(&reg), Some("Main"));
    }

    #[test]
    fn later_adds_never_change_the_active_scene() {
        let mut reg = SceneRegistry::new();
        reg.add(Blank::resizable("Main"));
        reg.add(Blank::resizable("Settings"));
        assert_eq!(active_name(&reg), Some("Main"));
    }

    #[test]
    fn duplicate_add_is_a_silent_noop() {
        let mut reg = SceneRegistry::new();
        reg.add(Blank::resizable("Main"));
        reg.add(Blank::fixed("Main", 1, 1));

        assert_eq!(reg.len(), 1);
        assert_eq!(active_name(&reg), Some("Main"));
        // The original registration survives; the duplicate did not overwrite.
        assert!(reg.active_scene().unwrap().spec().is_resizable());
    }

    // ── show ──────────────────────────────────────────────────────────────

    #[test]
    fn show_switches_the_active_scene() {
        let mut reg = SceneRegistry::new();
        reg.add(Blank::resizable("Main"));
        reg.add(Blank::fixed("Settings", 400, 300));

        let directives = reg.show("Settings", "Demo").unwrap();
        assert_eq!(active_name(&reg), Some("Settings"));
        assert_eq!(
            directives,
            WindowDirectives {
                resizable: false,
                size: Some((400, 300)),
                title: "Settings - Demo".to_string(),
            }
        );
    }

    #[test]
    fn show_resizable_scene_unlocks_resizing() {
        let mut reg = SceneRegistry::new();
        reg.add(Blank::fixed("Fixed", 640, 480));
        reg.add(Blank::resizable("Free"));

        let directives = reg.show("Free", "Demo").unwrap();
        assert!(directives.resizable);
        assert_eq!(directives.size, None);
        assert_eq!(directives.title, "Free - Demo");
    }

    #[test]
    fn show_unknown_name_is_a_noop() {
        let mut reg = SceneRegistry::new();
        reg.add(Blank::resizable("Main"));

        assert!(reg.show("Nope", "Demo").is_none());
        assert_eq!(active_name(&reg), Some("Main"));
    }

    #[test]
    fn show_on_empty_registry_is_a_noop() {
        let mut reg = SceneRegistry::new();
        assert!(reg.show("Main", "Demo").is_none());
        assert!(reg.active_scene().is_none());
    }
}
