//! The render thread and its control handle.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Instant;

use block_testbed_base::math::FreeCoordinate;

use crate::camera::{ImageSize, OrbitCamera};
use crate::{
    FrameBuffer, FrameInfo, Material, RenderError, RenderMode, RenderParameters, Renderer, Scene,
    Surface,
};

#[cfg(test)]
mod tests;

// -------------------------------------------------------------------------------------------------

/// Receives each frame the [`RenderThread`] finishes.
///
/// [`present()`](Self::present) is called on the render thread, after the frame has been
/// copied into the [`Surface`]; the next frame does not start until it returns, so
/// implementations should do no more than copy or enqueue the image.
pub trait DisplaySink: Send {
    /// Called once per completed frame.
    fn present(&mut self, surface: &Surface, info: FrameInfo);
}

impl<F> DisplaySink for F
where
    F: FnMut(&Surface, FrameInfo) + Send,
{
    fn present(&mut self, surface: &Surface, info: FrameInfo) {
        self(surface, info)
    }
}

// -------------------------------------------------------------------------------------------------

/// Parameters waiting to be picked up by the render thread, and the signals that wake it.
#[derive(Debug)]
struct Mailbox {
    /// The most recently requested parameters. Only the latest value is kept.
    pending: RenderParameters,
    /// Whether a frame should be drawn the next time the render thread waits.
    refresh: bool,
    /// Whether the render thread should exit the next time it waits.
    cancelled: bool,
}

/// The pair of images the render thread alternates between.
#[derive(Debug)]
struct FrameBuffers {
    /// Most recently completed frame.
    front: FrameBuffer,
    /// Frame being drawn.
    back: FrameBuffer,
}

impl FrameBuffers {
    fn flip(&mut self) {
        core::mem::swap(&mut self.front, &mut self.back);
    }
}

#[derive(Debug)]
struct Shared {
    mailbox: Mutex<Mailbox>,
    /// Notified when `mailbox.refresh` or `mailbox.cancelled` is set.
    wake: Condvar,
    /// Held for the whole of drawing and flipping a frame.
    buffers: Mutex<FrameBuffers>,
    /// Held while a finished frame is copied in.
    surface: Arc<Surface>,
}

impl Shared {
    fn lock_mailbox(&self) -> MutexGuard<'_, Mailbox> {
        self.mailbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_buffers(&self) -> MutexGuard<'_, FrameBuffers> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a frame is wanted, then clears the refresh flag and returns the
    /// parameters to draw it with. Returns [`None`] once cancelled.
    fn wait_for_refresh(&self) -> Option<RenderParameters> {
        let mut mailbox = self.lock_mailbox();
        loop {
            if mailbox.cancelled {
                return None;
            }
            if mailbox.refresh {
                mailbox.refresh = false;
                return Some(mailbox.pending);
            }
            mailbox = self
                .wake
                .wait(mailbox)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A background thread which draws a frame whenever the [`RenderParameters`] change, and
/// hands each finished frame to a [`DisplaySink`].
///
/// Changes are made through a [`RenderControl`] obtained from [`Self::control()`]; they take
/// effect at the start of the next frame, never part-way through one.
///
/// Dropping the [`RenderThread`] cancels it and waits for any frame in progress to finish.
#[derive(Debug)]
pub struct RenderThread {
    control: RenderControl,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Starts a render thread drawing `size`-pixel frames of `scene`.
    ///
    /// The first frame, using `initial`, is drawn immediately.
    pub fn spawn(
        scene: Scene,
        initial: RenderParameters,
        size: ImageSize,
        sink: Box<dyn DisplaySink>,
    ) -> Result<Self, RenderError> {
        let blank = FrameBuffer::new(size)?;
        let shared = Arc::new(Shared {
            mailbox: Mutex::new(Mailbox {
                pending: initial,
                refresh: true,
                cancelled: false,
            }),
            wake: Condvar::new(),
            buffers: Mutex::new(FrameBuffers {
                front: blank.clone(),
                back: blank.clone(),
            }),
            surface: Arc::new(Surface::new(blank)),
        });

        let renderer = Renderer::new(scene);
        let handle = std::thread::Builder::new()
            .name("block-testbed render".to_string())
            .spawn({
                let shared = shared.clone();
                move || render_loop(&shared, &renderer, sink)
            })
            .map_err(RenderError::ThreadSpawn)?;

        Ok(Self {
            control: RenderControl { shared },
            handle: Some(handle),
        })
    }

    /// Returns a handle for changing what is drawn.
    pub fn control(&self) -> RenderControl {
        self.control.clone()
    }

    /// Returns the surface that each finished frame is copied into.
    pub fn surface(&self) -> Arc<Surface> {
        self.control.surface()
    }

    /// Cancels the thread and waits for it to exit.
    ///
    /// Returns [`RenderError::Panicked`] if rendering panicked.
    pub fn stop(mut self) -> Result<(), RenderError> {
        self.cancel_and_join()
    }

    fn cancel_and_join(&mut self) -> Result<(), RenderError> {
        self.control.cancel();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| RenderError::Panicked),
            None => Ok(()),
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        if let Err(e) = self.cancel_and_join() {
            log::error!("{e}");
        }
    }
}

fn render_loop(shared: &Shared, renderer: &Renderer, mut sink: Box<dyn DisplaySink>) {
    log::debug!("render thread started");
    let mut frame_number: u64 = 0;
    while let Some(parameters) = shared.wait_for_refresh() {
        frame_number += 1;

        let mut buffers = shared.lock_buffers();
        let start_time = Instant::now();
        renderer.draw_frame(&parameters, &mut buffers.back, frame_number);
        let render_time = start_time.elapsed();
        buffers.flip();
        shared.surface.lock().copy_from(&buffers.front);
        drop(buffers);

        log::trace!("frame {frame_number} drawn in {render_time:.2?}");
        sink.present(
            &shared.surface,
            FrameInfo {
                frame_number,
                render_time,
            },
        );
    }
    log::debug!("render thread stopped after {frame_number} frames");
}

// -------------------------------------------------------------------------------------------------

/// Handle for changing the parameters of a [`RenderThread`].
///
/// Every change is recorded immediately and picked up at the start of the next frame.
/// Changes which leave the parameters as they were do not cause a frame to be drawn.
#[derive(Clone, Debug)]
pub struct RenderControl {
    shared: Arc<Shared>,
}

impl RenderControl {
    /// Modifies the pending parameters with `f`, and requests a new frame if that changed
    /// them.
    ///
    /// Returns whether the parameters changed.
    pub fn update(&self, f: impl FnOnce(&mut RenderParameters)) -> bool {
        let mut mailbox = self.shared.lock_mailbox();
        let old = mailbox.pending;
        f(&mut mailbox.pending);
        let changed = mailbox.pending != old;
        if changed {
            log::trace!("render parameters changed to {:?}", mailbox.pending);
            mailbox.refresh = true;
            self.shared.wake.notify_all();
        }
        changed
    }

    /// Returns the parameters that the next frame will be drawn with.
    pub fn pending(&self) -> RenderParameters {
        self.shared.lock_mailbox().pending
    }

    /// Rotates the camera as for a drag of `dx`, `dy` pixels. See [`OrbitCamera::pan()`].
    pub fn pan(&self, dx: FreeCoordinate, dy: FreeCoordinate) -> bool {
        self.update(|p| p.camera.pan(dx, dy))
    }

    /// Zooms the camera. See [`OrbitCamera::move_forward()`].
    pub fn move_forward(&self, scale: FreeCoordinate) -> bool {
        self.update(|p| p.camera.move_forward(scale))
    }

    #[allow(missing_docs)]
    pub fn set_camera(&self, camera: OrbitCamera) -> bool {
        self.update(|p| p.camera = camera)
    }

    #[allow(missing_docs)]
    pub fn set_mode(&self, mode: RenderMode) -> bool {
        self.update(|p| p.mode = mode)
    }

    #[allow(missing_docs)]
    pub fn set_material(&self, material: Material) -> bool {
        self.update(|p| p.material = material)
    }

    /// Sets the material id, keeping the data value.
    pub fn set_material_id(&self, id: u32) -> bool {
        self.update(|p| p.material.id = id)
    }

    /// Sets the material data value, keeping the id.
    pub fn set_material_data(&self, data: u32) -> bool {
        self.update(|p| p.material.data = data)
    }

    /// Turns the compass on or off.
    pub fn set_compass(&self, compass: bool) -> bool {
        self.update(|p| p.compass = compass)
    }

    /// Requests a new frame even though nothing changed.
    pub fn refresh(&self) {
        self.shared.lock_mailbox().refresh = true;
        self.shared.wake.notify_all();
    }

    /// Asks the render thread to exit. Any frame in progress is finished first.
    pub fn cancel(&self) {
        let mut mailbox = self.shared.lock_mailbox();
        if !mailbox.cancelled {
            log::debug!("render thread cancellation requested");
            mailbox.cancelled = true;
        }
        self.shared.wake.notify_all();
    }

    /// Returns the number of the most recently completed frame, or zero if none is done yet.
    ///
    /// Blocks while a frame is being drawn.
    pub fn front_frame_number(&self) -> u64 {
        self.shared.lock_buffers().front.frame_number()
    }

    /// Returns the surface that each finished frame is copied into.
    pub fn surface(&self) -> Arc<Surface> {
        self.shared.surface.clone()
    }
}
