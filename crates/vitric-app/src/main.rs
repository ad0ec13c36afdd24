use anyhow::Result;

use vitric_engine::app::{AppFlags, Application, SceneCtx};
use vitric_engine::canvas::Color;
use vitric_engine::coords::{Rect, Vec2};
use vitric_engine::scene::{Scene, SceneSpec};

const PANEL: Color = color(0.16, 0.17, 0.20);
const ACCENT: Color = color(0.26, 0.59, 0.98);

const fn color(r: f32, g: f32, b: f32) -> Color {
    Color { r, g, b, a: 1.0 }
}

/// Flat rectangle button with a hover highlight.
fn button(ctx: &mut SceneCtx<'_>, rect: Rect, base: Color) -> bool {
    let fill = if ctx.canvas.is_hovered(rect) {
        Color {
            r: base.r * 1.25,
            g: base.g * 1.25,
            b: base.b * 1.25,
            a: base.a,
        }
    } else {
        base
    };
    ctx.canvas.rect(rect, fill);
    ctx.canvas.clicked(rect)
}

struct MainScene {
    spec: SceneSpec,
    pulse: f32,
}

impl MainScene {
    fn new() -> Self {
        Self {
            spec: SceneSpec::resizable("Main").with_custom_title_bar(),
            pulse: 0.0,
        }
    }
}

impl Scene for MainScene {
    fn spec(&self) -> &SceneSpec {
        &self.spec
    }

    fn on_render(&mut self, ctx: &mut SceneCtx<'_>) {
        self.pulse = (self.pulse + ctx.time.seconds).rem_euclid(2.0);

        let size = ctx.canvas.size();
        ctx.canvas
            .rect(Rect::new(0.0, 40.0, size.x, size.y - 40.0), PANEL);

        // A strip of tiles that breathes with frame time.
        let glow = 0.5 + 0.5 * (1.0 - (self.pulse - 1.0).abs());
        for i in 0..5 {
            let x = 24.0 + i as f32 * 72.0;
            ctx.canvas.rect(
                Rect::new(x, 72.0, 56.0, 56.0),
                Color {
                    r: ACCENT.r * glow,
                    g: ACCENT.g * glow,
                    b: ACCENT.b * glow,
                    a: 1.0,
                },
            );
        }

        if let Some(logo) = ctx.image("logo.png") {
            let at = Vec2::new(24.0, 160.0);
            ctx.canvas.image(
                Rect::new(at.x, at.y, logo.width() as f32, logo.height() as f32),
                logo,
            );
        }

        if button(ctx, Rect::new(24.0, size.y - 72.0, 160.0, 40.0), ACCENT) {
            ctx.show_scene("Settings");
        }
    }
}

struct SettingsScene {
    spec: SceneSpec,
}

impl SettingsScene {
    fn new() -> Self {
        Self {
            spec: SceneSpec::fixed("Settings", 420, 320).with_custom_title_bar(),
        }
    }
}

impl Scene for SettingsScene {
    fn spec(&self) -> &SceneSpec {
        &self.spec
    }

    fn on_render(&mut self, ctx: &mut SceneCtx<'_>) {
        let size = ctx.canvas.size();
        ctx.canvas
            .rect(Rect::new(0.0, 40.0, size.x, size.y - 40.0), PANEL);

        // Setting rows.
        for i in 0..4 {
            let y = 64.0 + i as f32 * 48.0;
            ctx.canvas
                .rect(Rect::new(24.0, y, size.x - 48.0, 36.0), color(0.22, 0.23, 0.27));
        }

        if button(
            ctx,
            Rect::new(24.0, size.y - 64.0, 120.0, 36.0),
            color(0.35, 0.38, 0.42),
        ) {
            ctx.show_scene("Main");
        }
    }
}

fn main() -> Result<()> {
    vitric_engine::logging::init(None);

    let mut app = Application::new("Vitric Demo", 900, 600, AppFlags::CUSTOM_TITLE_BAR);

    let scenes = app.scenes_mut();
    scenes.add(Box::new(MainScene::new()));
    scenes.add(Box::new(SettingsScene::new()));

    log::info!("starting {}", app.spec().name);
    app.run()
}
