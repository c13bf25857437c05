use eframe::egui;

use crate::config::VisualizerConfig;
use crate::visual::{Color, HighlightMode};

pub fn render_config_panel(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    ui.label(egui::RichText::new("Configuration").size(16.0));
    ui.add_space(8.0);

    render_elements(ui, config);
    ui.add_space(8.0);

    render_bass_kick(ui, config);
    ui.add_space(8.0);

    render_background(ui, config);
    ui.add_space(8.0);

    render_highlight(ui, config);
    ui.add_space(8.0);

    ui.checkbox(&mut config.debug_logging, "Log every frame")
        .on_hover_text("Trace loudness and effect state at debug level");

    ui.add_space(20.0);
}

fn render_elements(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    egui::CollapsingHeader::new("Elements")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("element_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Count:")
                        .on_hover_text("Number of boxes, applied on rebuild");
                    ui.add(egui::Slider::new(&mut config.amn_visual, 1..=512));
                    ui.end_row();

                    ui.label("Spectrum Kept:")
                        .on_hover_text("Low part of the spectrum spread over the boxes");
                    ui.add(egui::Slider::new(&mut config.keep_percentage, 0.01..=1.0));
                    ui.end_row();

                    ui.label("Height Multiplier:")
                        .on_hover_text("Higher = taller boxes for the same signal");
                    ui.add(egui::Slider::new(&mut config.visual_modifier, 1.0..=200.0));
                    ui.end_row();

                    ui.label("Max Height:");
                    ui.add(egui::Slider::new(&mut config.max_visual_scale, 0.0..=50.0));
                    ui.end_row();

                    ui.label("Falloff Speed:")
                        .on_hover_text("Higher = snappier falloff, lower = longer trails");
                    ui.add(egui::Slider::new(&mut config.smooth_speed, 0.1..=50.0));
                    ui.end_row();

                    ui.label("Circle Layout:");
                    ui.checkbox(&mut config.is_circle, "");
                    ui.end_row();

                    ui.label("Circle Radius:");
                    ui.add_enabled(
                        config.is_circle,
                        egui::Slider::new(&mut config.circle_radius, 1.0..=40.0),
                    );
                    ui.end_row();
                });
        });
}

fn render_bass_kick(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    egui::CollapsingHeader::new("Bass Kick")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("bass_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Threshold:")
                        .on_hover_text("Level above which the plane kicks");
                    ui.add(egui::Slider::new(&mut config.bass_min, -20.0..=40.0).suffix(" dB"));
                    ui.end_row();

                    ui.label("Depth per dB:");
                    ui.add(egui::Slider::new(
                        &mut config.circle_bass_percentage,
                        0.0..=1.0,
                    ));
                    ui.end_row();

                    ui.label("Offset:");
                    ui.add(egui::Slider::new(&mut config.circle_bass_control, -5.0..=5.0));
                    ui.end_row();

                    ui.label("Upper Level:")
                        .on_hover_text("Not used by the kick yet");
                    ui.add(egui::Slider::new(&mut config.bass_max, -20.0..=60.0).suffix(" dB"));
                    ui.end_row();
                });
        });
}

fn render_background(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    egui::CollapsingHeader::new("Background")
        .default_open(false)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("background_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Quiet Color:");
                    color_edit(ui, &mut config.max_color);
                    ui.end_row();

                    ui.label("Loud Color:");
                    color_edit(ui, &mut config.min_color);
                    ui.end_row();
                });
        });
}

fn render_highlight(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    egui::CollapsingHeader::new("Highlight Particles")
        .default_open(false)
        .show(ui, |ui| {
            ui.add_space(4.0);
            ui.checkbox(&mut config.turn_on_highlight_particle, "Enabled");
            egui::Grid::new("highlight_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Start:");
                    ui.add(
                        egui::DragValue::new(&mut config.high_start_time)
                            .speed(0.1)
                            .suffix(" s"),
                    );
                    ui.end_row();

                    ui.label("End:");
                    ui.add(
                        egui::DragValue::new(&mut config.high_end_time)
                            .speed(0.1)
                            .suffix(" s"),
                    );
                    ui.end_row();

                    ui.label("Mode:")
                        .on_hover_text("Latched shows the highlight at most once per run");
                    egui::ComboBox::from_id_salt("highlight_mode")
                        .selected_text(format!("{:?}", config.highlight_mode))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut config.highlight_mode,
                                HighlightMode::Window,
                                "Window",
                            );
                            ui.selectable_value(
                                &mut config.highlight_mode,
                                HighlightMode::Latched,
                                "Latched",
                            );
                        });
                    ui.end_row();
                });
        });
}

fn color_edit(ui: &mut egui::Ui, color: &mut Color) {
    let mut rgba = color.to_array();
    if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
        *color = Color::from_array(rgba);
    }
}
