use image::{Rgb, RgbImage};
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::draw;
use crate::error::Error;
use crate::math;

const SRC_QUAD_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const DST_QUAD_COLOR: Rgb<u8> = Rgb([0, 120, 255]);

/// Four corners of a planar region, in drawing order.
///
/// Calibration data: the source quad outlines the ground-plane region
/// of interest in camera pixels, the destination quad the same region
/// in the canonical overhead view. Values are camera-placement
/// specific and belong in the config file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Quad(pub [[f32; 2]; 4]);

impl Quad {
    #[inline]
    pub fn points(&self) -> [na::Point2<f32>; 4] {
        self.0.map(|[x, y]| na::Point2::new(x, y))
    }

    fn pixel_corners(&self) -> Vec<(i32, i32)> {
        self.0.iter().map(|[x, y]| (*x as i32, *y as i32)).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BevConfig {
    /// Classes projected onto the overhead view (person/vehicles).
    pub classes: Vec<i32>,
    /// Separate confidence gate for projection, usually stricter than
    /// the adapter threshold.
    pub confidence_threshold: f32,
    pub src_quad: Quad,
    pub dst_quad: Quad,
}

impl Default for BevConfig {
    fn default() -> Self {
        Self {
            classes: vec![0, 1, 2, 3, 5, 7],
            confidence_threshold: 0.5,
            src_quad: Quad([
                [480.0, 540.0],
                [1440.0, 540.0],
                [1920.0, 1080.0],
                [0.0, 1080.0],
            ]),
            dst_quad: Quad([
                [0.0, 0.0],
                [1920.0, 0.0],
                [1920.0, 1080.0],
                [0.0, 1080.0],
            ]),
        }
    }
}

/// Projects ground-contact points of detections into the canonical
/// overhead plane through a fixed homography.
///
/// The homography is computed once at construction; for the same pair
/// of quads every call projects identically.
pub struct BevProjector {
    config: BevConfig,
    matrix: na::Matrix3<f32>,
}

impl BevProjector {
    pub fn new(config: BevConfig) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&config.confidence_threshold)
            || !config.confidence_threshold.is_finite()
        {
            return Err(Error::InvalidThreshold(config.confidence_threshold));
        }

        let matrix = math::homography(&config.src_quad.points(), &config.dst_quad.points())
            .ok_or(Error::DegenerateQuad)?;

        Ok(Self { config, matrix })
    }

    #[inline]
    pub fn matrix(&self) -> &na::Matrix3<f32> {
        &self.matrix
    }

    /// Maps a camera-plane point into the overhead plane.
    #[inline]
    pub fn project(&self, p: na::Point2<f32>) -> na::Point2<f32> {
        math::apply_homography(&self.matrix, p)
    }

    #[inline]
    fn accepts(&self, det: &Detection) -> bool {
        self.config.classes.contains(&det.class)
            && det.confidence > self.config.confidence_threshold
    }

    /// Ground-contact points of the accepted detections, projected.
    pub fn project_detections(&self, detections: &[Detection]) -> Vec<na::Point2<f32>> {
        detections
            .iter()
            .filter(|det| self.accepts(det))
            .map(|det| {
                let (x, y) = det.bbox.bottom_center();
                self.project(na::Point2::new(x, y))
            })
            .collect()
    }

    /// Renders the overhead view on a blank canvas of the camera
    /// frame's size: a marker and label per accepted detection, plus
    /// both calibration quads as reference overlays.
    pub fn render(&self, width: u32, height: u32, detections: &[Detection]) -> RgbImage {
        let mut canvas = RgbImage::new(width, height);

        let src_corners = self.config.src_quad.pixel_corners();
        let dst_corners = self.config.dst_quad.pixel_corners();
        draw::draw_polygon(&mut canvas, &src_corners, SRC_QUAD_COLOR);
        draw::draw_polygon(&mut canvas, &dst_corners, DST_QUAD_COLOR);

        for det in detections.iter().filter(|det| self.accepts(det)) {
            let (x, y) = det.bbox.bottom_center();
            let p = self.project(na::Point2::new(x, y));
            let (px, py) = (draw::to_canvas(p.x), draw::to_canvas(p.y));

            draw::draw_marker(&mut canvas, px, py, 5, draw::class_color(det.class));
            draw::draw_text(
                &mut canvas,
                px + 10,
                py - draw::TEXT_HEIGHT / 2,
                det.label(),
                draw::WHITE,
            );
        }

        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn det(bbox: [f32; 4], class: i32, confidence: f32) -> Detection {
        let bbox = BBox::ltrb(bbox[0], bbox[1], bbox[2], bbox[3]);
        let center = bbox.as_xywh();

        Detection {
            x: center.cx(),
            y: center.cy(),
            bbox,
            confidence,
            class,
            track_id: 0,
        }
    }

    fn unit_projector() -> BevProjector {
        // Identity mapping over the frame, so projected points equal
        // the ground-contact points.
        BevProjector::new(BevConfig {
            src_quad: Quad([[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]),
            dst_quad: Quad([[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]),
            ..BevConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn projection_is_deterministic() {
        let proj = BevProjector::new(BevConfig::default()).unwrap();
        let dets = [det([100.0, 100.0, 200.0, 300.0], 0, 0.9)];

        let first = proj.project_detections(&dets);
        let second = proj.project_detections(&dets);

        assert_eq!(first, second);

        let a = proj.render(320, 240, &dets);
        let b = proj.render(320, 240, &dets);
        assert_eq!(a, b);
    }

    #[test]
    fn identity_quads_project_ground_contact_unchanged() {
        let proj = unit_projector();
        let pts = proj.project_detections(&[det([20.0, 10.0, 40.0, 80.0], 0, 0.9)]);

        assert_eq!(pts.len(), 1);
        assert!((pts[0].x - 30.0).abs() < 1e-3);
        assert!((pts[0].y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_class_outside_allowed_set_and_low_confidence() {
        let proj = unit_projector();
        let pts = proj.project_detections(&[
            det([0.0, 0.0, 10.0, 10.0], 14, 0.9),
            det([0.0, 0.0, 10.0, 10.0], 0, 0.3),
        ]);

        assert!(pts.is_empty());
    }

    #[test]
    fn near_horizon_detection_renders_without_panic() {
        // A box whose ground contact sits near the homography's
        // vanishing line projects to a huge magnitude; rendering must
        // clamp it off-canvas instead of overflowing.
        let proj = BevProjector::new(BevConfig::default()).unwrap();
        let dets = [det([900.0, -10.0, 1020.0, 1e-7], 0, 0.9)];

        let canvas = proj.render(1920, 1080, &dets);
        assert_eq!(canvas.dimensions(), (1920, 1080));
    }

    #[test]
    fn degenerate_quad_is_a_construction_error() {
        let result = BevProjector::new(BevConfig {
            src_quad: Quad([[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]),
            ..BevConfig::default()
        });

        assert!(matches!(result, Err(Error::DegenerateQuad)));
    }

    #[test]
    fn render_has_canvas_size_and_quad_overlays() {
        let proj = unit_projector();
        let canvas = proj.render(100, 100, &[]);

        assert_eq!(canvas.dimensions(), (100, 100));
        // Top edge of both quads runs along y = 0.
        assert_eq!(*canvas.get_pixel(50, 0), DST_QUAD_COLOR);
    }
}
