use crate::audio::{AudioAnalyzer, AudioFrame, AudioStream, audio_stream};
use crate::config::{APP_VERSION, VisualizerConfig};
use crate::controller::{Controller, VisualOutput};
use crate::visual::{SceneLayout, VisualEngine, engine::Scene};
use eframe::egui;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::components::{
    render_config_panel, render_live_monitoring, render_spectrum, render_waveform,
};

/// Wall clock driving the pipeline: frame delta and time since the scene was (re)built.
struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Returns `(dt, elapsed)` in seconds.
    fn advance(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        (dt, now.duration_since(self.start).as_secs_f32())
    }
}

pub struct AppState {
    active_config: VisualizerConfig,
    pending_config: VisualizerConfig, // Local copy for sliders
    devices: Vec<String>,
    active_device_idx: usize,
    pending_device_idx: usize, // Local selection for device selector
    analyzer: Arc<Mutex<AudioAnalyzer>>,
    audio_stream: Option<AudioStream>,
    controller: Option<Controller<SceneLayout>>,
    config_error: Option<String>,
    frame: AudioFrame,
    output: VisualOutput,
    clock: FrameClock,
    visuals_window_open: bool,
    visuals_window: VisualEngine,
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        self.render_top_panel(ctx);
        self.render_bottom_panel(ctx);
        self.render_central_panel(ctx);
        self.render_visualizer_window(ctx);

        ctx.request_repaint();
    }
}

impl AppState {
    pub fn new(
        config: VisualizerConfig,
        preferred_device: Option<String>,
        analyzer: Arc<Mutex<AudioAnalyzer>>,
    ) -> Self {
        debug!("Initializing GUI state...");
        let devices = audio_stream::list_input_devices();
        debug!("Found {} audio input devices", devices.len());

        let selected_device_idx = preferred_device
            .as_ref()
            .and_then(|wanted| devices.iter().position(|name| name == wanted))
            .unwrap_or_else(|| {
                if let Some(wanted) = &preferred_device {
                    warn!("Input device '{wanted}' not found, using default");
                }
                audio_stream::default_input_device_index(&devices)
            });

        let selected_device = devices
            .get(selected_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("None");
        info!("Selected initial audio device: {selected_device}");

        let audio_stream = open_stream(selected_device_idx, &devices, &analyzer);

        debug!(
            "Initial config loaded: amn_visual={}, circle={}, smooth_speed={}",
            config.amn_visual, config.is_circle, config.smooth_speed
        );
        let (controller, config_error) = build_controller(&config);

        Self {
            active_config: config.clone(),
            pending_config: config,
            devices,
            pending_device_idx: selected_device_idx,
            active_device_idx: selected_device_idx,
            analyzer,
            audio_stream,
            controller,
            config_error,
            frame: AudioFrame::silent(),
            output: VisualOutput::default(),
            clock: FrameClock::new(),
            visuals_window_open: false,
            visuals_window: VisualEngine::new(),
        }
    }

    /// One pipeline step per repaint.
    fn tick(&mut self) {
        let (dt, elapsed) = self.clock.advance();
        self.analyzer.lock().unwrap().capture(&mut self.frame);

        if let Some(controller) = self.controller.as_mut() {
            self.output = controller.tick(dt, elapsed, &self.frame);
        }
    }

    fn apply_settings(&mut self) {
        let device_name = self
            .devices
            .get(self.pending_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("Unknown");

        debug!(
            "Applying settings - Device: {}, Config: {:?}",
            device_name, self.pending_config
        );

        if self.pending_device_idx != self.active_device_idx {
            debug!("Reloading audio stream with new device...");
            self.audio_stream =
                open_stream(self.pending_device_idx, &self.devices, &self.analyzer);
            self.active_device_idx = self.pending_device_idx;
        }

        self.active_config = self.pending_config.clone();
        let (controller, config_error) = build_controller(&self.active_config);
        self.controller = controller;
        self.config_error = config_error;
        self.output = VisualOutput::default();
        self.clock = FrameClock::new();

        info!("Settings applied successfully");
    }

    fn restart_run(&mut self) {
        info!("Restarting run clock");
        self.clock = FrameClock::new();
        if let Some(controller) = self.controller.as_mut() {
            controller.restart();
        }
    }

    fn reset_to_default(&mut self) {
        debug!("Resetting config to defaults");
        self.pending_config = VisualizerConfig::default();
    }

    fn disable_apply_button(&self) -> bool {
        let config_unchanged = self.pending_config == self.active_config;
        let device_unchanged = self.pending_device_idx == self.active_device_idx;

        config_unchanged && device_unchanged
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(format!("SoundVisual {APP_VERSION}"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.audio_stream.is_some() {
                        ui.colored_label(egui::Color32::GREEN, "Listening");
                    } else {
                        ui.colored_label(egui::Color32::RED, "No Audio Stream");
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Device Selection
            ui.horizontal(|ui| {
                ui.label("Audio Device:");
                egui::ComboBox::from_id_salt("device_selector")
                    .selected_text(
                        self.devices
                            .get(self.pending_device_idx)
                            .map(|name| name.as_str())
                            .unwrap_or("No devices"),
                    )
                    .show_ui(ui, |ui| {
                        for (idx, name) in self.devices.iter().enumerate() {
                            ui.selectable_value(&mut self.pending_device_idx, idx, name);
                        }
                    });
            });
            ui.add_space(4.0);
        });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_space(4.0);
                let apply_enabled = !self.disable_apply_button();

                if apply_enabled {
                    if ui.button("Apply Settings").clicked() {
                        self.apply_settings();
                    }
                } else {
                    ui.add_enabled(false, egui::Button::new("Apply Settings"));
                }

                if ui.button("↺ Reset to Default").clicked() {
                    self.reset_to_default();
                }

                if ui.button("⟲ Restart Run").clicked() {
                    self.restart_run();
                }

                ui.separator();

                ui.add_enabled_ui(!self.visuals_window_open, |ui| {
                    if ui.button("Open Visualizer").clicked() {
                        self.visuals_window_open = true;
                        info!("Visualizer window opened");
                    }
                });

                if self.visuals_window_open {
                    ui.colored_label(egui::Color32::GREEN, "● Visuals Active");
                }
            });
            ui.add_space(8.0);
        });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(8.0);

                    // Live Monitoring Section
                    render_live_monitoring(ui, &self.output, self.config_error.as_deref());

                    render_waveform(ui, self.frame.samples());
                    render_spectrum(
                        ui,
                        self.frame.spectrum(),
                        self.active_config.keep_percentage,
                    );

                    ui.add_space(20.0);

                    // Configuration Section
                    render_config_panel(ui, &mut self.pending_config);
                });
        });
    }

    fn render_visualizer_window(&mut self, ctx: &egui::Context) {
        if self.visuals_window_open {
            let visualizer_id = egui::ViewportId::from_hash_of("soundvisual_visualizer");
            let elapsed = self.clock.last.duration_since(self.clock.start).as_secs_f32();

            ctx.show_viewport_immediate(
                visualizer_id,
                egui::ViewportBuilder::default()
                    .with_title("SoundVisual Scene")
                    .with_inner_size([800.0, 600.0])
                    .with_resizable(true),
                |ctx, _class| {
                    if ctx.input(|i| i.viewport().close_requested()) {
                        self.visuals_window_open = false;
                    }
                    let scene = self.controller.as_ref().map(|controller| Scene {
                        layout: controller.layout(),
                        output: &self.output,
                        max_visual_scale: controller.config().max_visual_scale,
                        elapsed,
                    });
                    self.visuals_window.render(ctx, scene);
                },
            );
        }
    }
}

fn build_controller(
    config: &VisualizerConfig,
) -> (Option<Controller<SceneLayout>>, Option<String>) {
    match Controller::new(config.clone(), SceneLayout::new()) {
        Ok(controller) => (Some(controller), None),
        Err(err) => {
            error!("Invalid visualizer config, scene disabled: {err}");
            (None, Some(err.to_string()))
        }
    }
}

fn open_stream(
    device_idx: usize,
    devices: &[String],
    analyzer: &Arc<Mutex<AudioAnalyzer>>,
) -> Option<AudioStream> {
    match audio_stream::create_audio_stream(device_idx, devices, analyzer.clone()) {
        Ok(stream) => Some(stream),
        Err(err) => {
            error!("Could not open audio stream: {err:#}");
            None
        }
    }
}
