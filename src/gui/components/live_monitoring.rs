use crate::controller::VisualOutput;
use crate::visual::engine::to_color32;
use eframe::egui;

pub fn render_live_monitoring(
    ui: &mut egui::Ui,
    output: &VisualOutput,
    config_error: Option<&str>,
) {
    ui.label(egui::RichText::new("Live Monitoring").size(16.0));
    ui.add_space(8.0);

    if let Some(err) = config_error {
        ui.group(|ui| {
            ui.colored_label(egui::Color32::RED, "Scene disabled:");
            ui.label(err);
        });
        ui.add_space(8.0);
    }

    render_loudness(ui, output);
    ui.add_space(8.0);

    render_effects(ui, output);
    ui.add_space(12.0);
}

fn render_loudness(ui: &mut egui::Ui, output: &VisualOutput) {
    ui.group(|ui| {
        ui.colored_label(egui::Color32::LIGHT_BLUE, "Signal:");
        ui.horizontal(|ui| {
            ui.label("RMS:");
            ui.strong(format!("{:.4}", output.loudness.rms));

            ui.separator();

            ui.label("Level:");
            ui.strong(format!("{:.1} dB", output.loudness.db));

            ui.separator();

            ui.label("Peak height:");
            ui.strong(format!("{:.2}", output.peak_scale));
        });
    });
}

fn render_effects(ui: &mut egui::Ui, output: &VisualOutput) {
    ui.group(|ui| {
        ui.colored_label(egui::Color32::LIGHT_GREEN, "Effects:");
        ui.horizontal(|ui| {
            ui.label("Background:");
            ui.strong(format!("{:.2}", output.background_intensity));
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(swatch, 2.0, to_color32(output.background));

            ui.separator();

            match output.bass_plane {
                Some(plane) => {
                    ui.label("Bass plane z:");
                    ui.strong(format!("{:.2}", plane.z));
                }
                None => {
                    ui.colored_label(egui::Color32::GRAY, "Bass plane off");
                }
            }

            ui.separator();

            match output.highlight_visible {
                Some(true) => {
                    ui.colored_label(egui::Color32::YELLOW, "HIGHLIGHT");
                }
                Some(false) => {
                    ui.colored_label(egui::Color32::GRAY, "Highlight idle");
                }
                None => {}
            }
        });
    });
}
