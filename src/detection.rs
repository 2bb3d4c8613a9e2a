use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};

/// COCO class names, indexed by model class id.
pub const CLASS_NAMES: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorbike",
    "aeroplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "sofa",
    "pottedplant",
    "bed",
    "diningtable",
    "toilet",
    "tvmonitor",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

#[inline]
pub fn class_label(class: i32) -> &'static str {
    usize::try_from(class)
        .ok()
        .and_then(|idx| CLASS_NAMES.get(idx).copied())
        .unwrap_or("unknown")
}

/// One object as emitted by the detection/tracking model for one frame,
/// before filtering. The track id is absent when the model ran without
/// a tracker attached or could not associate the box.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct RawDetection {
    pub bbox: BBox<Ltrb>,
    #[serde(rename = "c")]
    pub class: i32,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "id", default)]
    pub track_id: Option<u32>,
}

/// Track id sentinel for detections without temporal identity.
pub const UNTRACKED: u32 = 0;

/// Filtered, normalized detection. `(x, y)` is the box center; once the
/// position smoother has run it holds the stabilized center instead of
/// the raw one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub bbox: BBox<Ltrb>,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: i32,
    #[serde(rename = "id")]
    pub track_id: u32,
}

impl Detection {
    #[inline]
    pub fn label(&self) -> &'static str {
        class_label(self.class)
    }

    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.track_id != UNTRACKED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup() {
        assert_eq!(class_label(0), "person");
        assert_eq!(class_label(2), "car");
        assert_eq!(class_label(-1), "unknown");
        assert_eq!(class_label(80), "unknown");
    }

    #[test]
    fn raw_detection_roundtrip_without_track_id() {
        let json = r#"{"bbox":[10.0,20.0,30.0,40.0],"c":0,"p":0.9}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();

        assert_eq!(raw.track_id, None);
        assert_eq!(raw.class, 0);
        assert_eq!(raw.bbox.left(), 10.0);
    }
}
