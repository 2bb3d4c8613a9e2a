use image::RgbImage;

use crate::error::Error;

/// Capture boundary. `Ok(None)` is end-of-stream; a failed device read
/// is reported the same way by implementations that cannot recover, so
/// the frame loop simply stops producing.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Error>;
}

/// Fixed-size flat gray frames, for demos and tests where no camera or
/// decoder is wired in.
pub struct FlatSource {
    width: u32,
    height: u32,
    remaining: usize,
}

impl FlatSource {
    pub fn new(width: u32, height: u32, frames: usize) -> Self {
        Self {
            width,
            height,
            remaining: frames,
        }
    }
}

impl FrameSource for FlatSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Error> {
        if self.remaining == 0 {
            return Ok(None);
        }

        self.remaining -= 1;

        Ok(Some(RgbImage::from_pixel(
            self.width,
            self.height,
            image::Rgb([32, 32, 32]),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_source_ends_after_frame_count() {
        let mut source = FlatSource::new(8, 8, 2);

        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
    }
}
