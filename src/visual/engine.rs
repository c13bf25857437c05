use crate::consts::{BASS_PLANE_SCALE, BASS_REST_Z};
use crate::controller::VisualOutput;
use crate::visual::{Color, SceneLayout};
use eframe::egui;
use glam::{Vec2, Vec3};

/// Camera depth used to turn the bass plane's z into an apparent size.
const CAMERA_Z: f32 = -30.0;
const PARTICLE_COUNT: usize = 120;

/// Everything the renderer needs for one frame.
pub struct Scene<'a> {
    pub layout: &'a SceneLayout,
    pub output: &'a VisualOutput,
    pub max_visual_scale: f32,
    pub elapsed: f32,
}

struct Particle {
    x: f32,
    phase: f32,
    speed: f32,
}

pub struct VisualEngine {
    particles: Vec<Particle>,
}

impl Default for VisualEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualEngine {
    pub fn new() -> Self {
        // Low-discrepancy spread, stable between runs
        let particles = (0..PARTICLE_COUNT)
            .map(|i| {
                let i = i as f32;
                Particle {
                    x: (i * 0.618_034).fract(),
                    phase: (i * 0.414_214).fract(),
                    speed: 0.15 + (i * 0.732_051).fract() * 0.35,
                }
            })
            .collect();

        Self { particles }
    }

    pub fn render(&mut self, ctx: &egui::Context, scene: Option<Scene<'_>>) {
        let fill = scene
            .as_ref()
            .map(|s| to_color32(s.output.background))
            .unwrap_or(egui::Color32::BLACK);

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(fill).inner_margin(0.0))
            .show(ctx, |ui| match scene {
                Some(scene) => self.paint(ui, &scene),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(
                            egui::Color32::WHITE,
                            egui::RichText::new("Visualizer disabled").heading(),
                        );
                    });
                }
            });

        ctx.request_repaint();
    }

    fn paint(&self, ui: &egui::Ui, scene: &Scene<'_>) {
        let rect = ui.max_rect();
        let painter = ui.painter();
        let view = Viewport::fit(rect, scene.layout, scene.max_visual_scale);

        if let Some(plane) = scene.output.bass_plane {
            let apparent = (BASS_REST_Z - CAMERA_Z) / (plane.z - CAMERA_Z).max(1.0);
            let radius = BASS_PLANE_SCALE[0] * 0.5 * apparent * view.pixels_per_unit;
            let tint = scene.output.background.lerp(Color::rgb(1.0, 1.0, 1.0), 0.15);
            painter.circle_filled(view.to_screen(plane.truncate()), radius, to_color32(tint));
        }

        let bar_color = egui::Color32::from_rgb(120, 220, 255);
        for (anchor, scale) in scene.layout.elements() {
            let center = anchor.position.truncate();
            let up = anchor.up().truncate() * scale.y * 0.5;
            let right = (anchor.rotation * Vec3::X).truncate() * scale.x * 0.5;

            let corners = [
                center - right - up,
                center + right - up,
                center + right + up,
                center - right + up,
            ]
            .map(|corner| view.to_screen(corner))
            .to_vec();

            painter.add(egui::Shape::convex_polygon(
                corners,
                bar_color,
                egui::Stroke::NONE,
            ));
        }

        if scene.output.highlight_visible == Some(true) {
            for particle in &self.particles {
                let y = (particle.phase + scene.elapsed * particle.speed).fract();
                let pos = egui::pos2(
                    rect.left() + particle.x * rect.width(),
                    rect.top() + y * rect.height(),
                );
                painter.circle_filled(pos, 2.0, egui::Color32::from_white_alpha(200));
            }
        }
    }
}

/// Maps the XY plane of the scene onto the panel, preserving aspect ratio.
struct Viewport {
    screen_center: egui::Pos2,
    world_center: Vec2,
    pixels_per_unit: f32,
}

impl Viewport {
    fn fit(rect: egui::Rect, layout: &SceneLayout, max_visual_scale: f32) -> Self {
        let reach = (1.0 + max_visual_scale) * 0.5;
        let (min, max) = layout.elements().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(min, max), (anchor, _)| {
                let p = anchor.position.truncate();
                (min.min(p), max.max(p))
            },
        );
        let (min, max) = if layout.is_empty() {
            (Vec2::ZERO, Vec2::ZERO)
        } else {
            (min, max)
        };

        let extent = (max - min) + Vec2::splat(reach * 2.0);
        let pixels_per_unit = (rect.width() / extent.x).min(rect.height() / extent.y);

        Self {
            screen_center: rect.center(),
            world_center: (min + max) * 0.5,
            pixels_per_unit,
        }
    }

    fn to_screen(&self, world: Vec2) -> egui::Pos2 {
        let offset = (world - self.world_center) * self.pixels_per_unit;
        egui::pos2(self.screen_center.x + offset.x, self.screen_center.y - offset.y)
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
