use eframe::egui;

const PLOT_HEIGHT: f32 = 120.0;

pub fn render_waveform(ui: &mut egui::Ui, samples: &[f32]) {
    ui.group(|ui| {
        ui.label("Waveform");

        let (rect, painter) = allocate_plot(ui);

        // Draw center line
        let center_y = rect.center().y;
        painter.line_segment(
            [
                egui::pos2(rect.left(), center_y),
                egui::pos2(rect.right(), center_y),
            ],
            egui::Stroke::new(0.5, egui::Color32::from_gray(80)),
        );

        if samples.len() > 1 {
            let width = rect.width();
            let height = rect.height();
            let num_samples = samples.len();

            let points: Vec<egui::Pos2> = samples
                .iter()
                .enumerate()
                .map(|(i, &sample)| {
                    let x = rect.left() + (i as f32 / num_samples as f32) * width;
                    // Map sample from [-1, 1] to screen coordinates
                    let y = center_y - (sample.clamp(-1.0, 1.0) * height * 0.45);
                    egui::pos2(x, y)
                })
                .collect();

            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 200, 255)),
            ));
        }
    });
}

/// Magnitude spectrum, with the part spread over the visual elements drawn brighter.
pub fn render_spectrum(ui: &mut egui::Ui, spectrum: &[f32], keep_percentage: f32) {
    ui.group(|ui| {
        ui.label("Spectrum");

        let (rect, painter) = allocate_plot(ui);
        if spectrum.is_empty() {
            return;
        }

        let kept = (spectrum.len() as f32 * keep_percentage.clamp(0.0, 1.0)) as usize;
        let bar_width = rect.width() / spectrum.len() as f32;

        for (i, &magnitude) in spectrum.iter().enumerate() {
            let height = magnitude.clamp(0.0, 1.0).sqrt() * rect.height();
            if height < 0.5 {
                continue;
            }
            let x = rect.left() + i as f32 * bar_width;
            let bar = egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - height),
                egui::pos2(x + bar_width.max(1.0), rect.bottom()),
            );
            let color = if i < kept {
                egui::Color32::from_rgb(255, 170, 60)
            } else {
                egui::Color32::from_gray(90)
            };
            painter.rect_filled(bar, 0.0, color);
        }
    });
}

fn allocate_plot(ui: &mut egui::Ui) -> (egui::Rect, egui::Painter) {
    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), PLOT_HEIGHT),
        egui::Sense::hover(),
    );
    let rect = response.rect;

    // Draw background
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(20));

    (rect, painter)
}
