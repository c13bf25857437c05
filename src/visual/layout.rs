use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::VisualizerConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arrangement {
    /// Evenly spaced on a circle in the XY plane, each element pointing outwards.
    Circle { radius: f32 },
    /// One unit apart along +X.
    Line,
}

impl Arrangement {
    pub fn from_config(config: &VisualizerConfig) -> Self {
        if config.is_circle {
            Arrangement::Circle {
                radius: config.circle_radius,
            }
        } else {
            Arrangement::Line
        }
    }
}

/// Where an element sits. Fixed once spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementAnchor {
    pub position: Vec3,
    pub rotation: Quat,
}

impl ElementAnchor {
    /// Local +Y, the axis the element grows along.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

pub fn anchors(count: usize, arrangement: Arrangement) -> Vec<ElementAnchor> {
    (0..count)
        .map(|i| match arrangement {
            Arrangement::Circle { radius } => {
                let angle = i as f32 / count as f32 * TAU;
                ElementAnchor {
                    position: Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0),
                    rotation: Quat::from_rotation_z(angle - FRAC_PI_2),
                }
            }
            Arrangement::Line => ElementAnchor {
                position: Vec3::X * i as f32,
                rotation: Quat::IDENTITY,
            },
        })
        .collect()
}

/// Scene-side collaborator that owns the visual elements. The pipeline spawns elements
/// through it once and pushes one scale per element every tick.
pub trait VisualLayoutProvider {
    type Handle: Copy;

    fn initialize(&mut self, count: usize, arrangement: Arrangement) -> Vec<Self::Handle>;

    fn apply_scale(&mut self, handle: Self::Handle, scale: f32);
}

/// In-memory layout read by the renderer.
#[derive(Default)]
pub struct SceneLayout {
    anchors: Vec<ElementAnchor>,
    scales: Vec<Vec3>,
}

impl SceneLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors paired with each element's current local scale.
    pub fn elements(&self) -> impl Iterator<Item = (&ElementAnchor, &Vec3)> {
        self.anchors.iter().zip(&self.scales)
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl VisualLayoutProvider for SceneLayout {
    type Handle = usize;

    fn initialize(&mut self, count: usize, arrangement: Arrangement) -> Vec<usize> {
        self.anchors = anchors(count, arrangement);
        self.scales = vec![Vec3::ONE; count];
        (0..count).collect()
    }

    fn apply_scale(&mut self, handle: usize, scale: f32) {
        if let Some(local) = self.scales.get_mut(handle) {
            *local = Vec3::ONE + Vec3::Y * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_anchors_point_outwards() {
        let radius = 10.0;
        let anchors = anchors(100, Arrangement::Circle { radius });
        assert_eq!(anchors.len(), 100);

        for anchor in &anchors {
            assert!((anchor.position.length() - radius).abs() < 1e-4);
            assert_eq!(anchor.position.z, 0.0);
            let outward = anchor.position.normalize();
            assert!(anchor.up().dot(outward) > 0.9999);
        }

        // First element on +X, quarter way round on +Y
        assert!((anchors[0].position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert!((anchors[25].position - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_line_anchors() {
        let anchors = anchors(4, Arrangement::Line);
        let xs: Vec<f32> = anchors.iter().map(|a| a.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(anchors.iter().all(|a| a.rotation == Quat::IDENTITY));
    }

    #[test]
    fn test_scene_layout_scales_along_local_up() {
        let mut layout = SceneLayout::new();
        let handles = layout.initialize(3, Arrangement::Line);
        assert_eq!(handles, vec![0, 1, 2]);

        layout.apply_scale(handles[1], 4.5);
        layout.apply_scale(99, 1.0);

        let scales: Vec<Vec3> = layout.elements().map(|(_, s)| *s).collect();
        assert_eq!(scales[0], Vec3::ONE);
        assert_eq!(scales[1], Vec3::new(1.0, 5.5, 1.0));
        assert_eq!(layout.elements().count(), 3);
    }
}
