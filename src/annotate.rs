use image::RgbImage;

use crate::detection::Detection;
use crate::draw;

/// Renders detection overlays onto a copy of `frame`.
///
/// Per detection: the bounding box in its class color, the label
/// `"<class>: <confidence>"` above the box, a filled marker at the
/// (smoothed) center and the track id beside it. The input frame is
/// never mutated; an empty detection slice returns a plain copy.
pub fn annotate(frame: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut out = frame.clone();

    for det in detections {
        let color = draw::class_color(det.class);

        draw::draw_rect(&mut out, &det.bbox, color);

        let label = format!("{}: {:.2}", det.label(), det.confidence);
        let label_y = draw::to_canvas(det.bbox.top()) - draw::TEXT_HEIGHT - 2;
        draw::draw_text(
            &mut out,
            draw::to_canvas(det.bbox.left()),
            label_y.max(0),
            &label,
            color,
        );

        let (cx, cy) = (draw::to_canvas(det.x), draw::to_canvas(det.y));
        draw::draw_marker(&mut out, cx, cy, 4, draw::YELLOW);

        if det.is_tracked() {
            draw::draw_text(
                &mut out,
                cx + 8,
                cy - draw::TEXT_HEIGHT / 2,
                &det.track_id.to_string(),
                draw::WHITE,
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn det(track_id: u32) -> Detection {
        Detection {
            x: 40.0,
            y: 40.0,
            bbox: BBox::ltrb(20.0, 20.0, 60.0, 60.0),
            confidence: 0.9,
            class: 0,
            track_id,
        }
    }

    #[test]
    fn empty_detections_returns_unmodified_copy() {
        let frame = RgbImage::from_pixel(80, 80, image::Rgb([10, 20, 30]));
        let out = annotate(&frame, &[]);

        assert_eq!(out, frame);
    }

    #[test]
    fn input_frame_is_untouched() {
        let frame = RgbImage::from_pixel(80, 80, image::Rgb([10, 20, 30]));
        let before = frame.clone();

        let out = annotate(&frame, &[det(5)]);

        assert_eq!(frame, before);
        assert_ne!(out, frame);
    }

    #[test]
    fn draws_box_edge_and_center_marker() {
        let frame = RgbImage::new(80, 80);
        let out = annotate(&frame, &[det(5)]);

        assert_eq!(*out.get_pixel(20, 40), draw::class_color(0));
        assert_eq!(*out.get_pixel(40, 40), draw::YELLOW);
    }

    #[test]
    fn tolerates_far_off_frame_coordinates() {
        let frame = RgbImage::new(40, 40);
        let mut d = det(3);
        d.bbox = BBox::ltrb(-1e9, -1e9, 1e9, 1e9);
        d.x = 1e9;
        d.y = -1e9;

        annotate(&frame, &[d]);
    }

    #[test]
    fn tolerates_box_partially_off_frame() {
        let frame = RgbImage::new(40, 40);
        let mut d = det(1);
        d.bbox = BBox::ltrb(-10.0, -10.0, 100.0, 100.0);
        d.x = 45.0;
        d.y = 45.0;

        annotate(&frame, &[d]);
    }
}
