use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::RenderError;
use crate::camera::{ImagePoint, ImageSize};

/// Fixed-size 8-bit RGB image produced by the renderer, tagged with the number of the
/// frame that was drawn into it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameBuffer {
    size: ImageSize,
    /// Row-major pixel data.
    data: Vec<[u8; 3]>,
    /// Zero if nothing has been drawn yet.
    frame_number: u64,
}

impl FrameBuffer {
    /// Creates a black image of the given size.
    ///
    /// Returns [`RenderError::EmptyImage`] if either dimension is zero.
    pub fn new(size: ImageSize) -> Result<Self, RenderError> {
        let area = usize::try_from(size.width)
            .ok()
            .zip(usize::try_from(size.height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|&area| area > 0)
            .ok_or(RenderError::EmptyImage {
                width: size.width,
                height: size.height,
            })?;
        Ok(Self {
            size,
            data: vec![[0; 3]; area],
            frame_number: 0,
        })
    }

    #[allow(missing_docs)]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Pixel data in row-major order, starting at the top left.
    pub fn data(&self) -> &[[u8; 3]] {
        &self.data
    }

    /// Number of the frame most recently drawn into this buffer, or zero if none.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub(crate) fn set_frame_number(&mut self, frame_number: u64) {
        self.frame_number = frame_number;
    }

    fn index(&self, pixel: ImagePoint) -> usize {
        assert!(
            pixel.x < self.size.width && pixel.y < self.size.height,
            "pixel {pixel:?} out of bounds of {size:?}",
            size = self.size
        );
        pixel.y as usize * self.size.width as usize + pixel.x as usize
    }

    /// Returns the color of the given pixel.
    ///
    /// Panics if the pixel is out of bounds.
    pub fn get(&self, pixel: ImagePoint) -> [u8; 3] {
        self.data[self.index(pixel)]
    }

    /// Sets the color of the given pixel.
    ///
    /// Panics if the pixel is out of bounds.
    pub fn set(&mut self, pixel: ImagePoint, color: [u8; 3]) {
        let index = self.index(pixel);
        self.data[index] = color;
    }

    /// Overwrites this buffer's contents with `other`'s, reusing the allocation when the
    /// sizes match.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        self.size = other.size;
        self.data.clone_from(&other.data);
        self.frame_number = other.frame_number;
    }
}

/// Timing information about a frame handed to a [`DisplaySink`](crate::DisplaySink).
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameInfo {
    /// Sequence number of the frame, counting from 1.
    pub frame_number: u64,
    /// Time taken to draw the frame, not including publishing.
    pub render_time: Duration,
}

/// The display-owned copy of the most recently completed frame.
///
/// The render thread overwrites the surface while holding its lock, so a reader holding the
/// lock never sees a partially updated frame.
#[derive(Debug)]
pub struct Surface {
    frame: Mutex<FrameBuffer>,
}

impl Surface {
    pub(crate) fn new(frame: FrameBuffer) -> Self {
        Self {
            frame: Mutex::new(frame),
        }
    }

    /// Locks the surface for reading.
    ///
    /// While the returned guard is held, the render thread cannot publish a new frame.
    pub fn lock(&self) -> MutexGuard<'_, FrameBuffer> {
        // The data is plain pixels and is always left complete, so a poisoned lock is harmless.
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current frame.
    pub fn snapshot(&self) -> FrameBuffer {
        self.lock().clone()
    }
}
