//! Headless operation: frames are copied out of the render thread, reported, and
//! optionally written to PNG files, while a script stands in for interactive input.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use block_testbed_render::{
    DisplaySink, FrameBuffer, FrameInfo, RenderControl, RenderThread, Surface,
};

use crate::Settings;
use crate::textures::standard_scene;

mod script;
pub use script::{Step, StepError, parse_script, parse_steps};
mod write_png;
pub use write_png::write_frame;

/// Frames which take longer than this to draw are reported with a warning.
pub const SLOW_FRAME: Duration = Duration::from_millis(50);

/// A completed frame as received from a [`ChannelSink`].
pub type Frame = (FrameInfo, FrameBuffer);

// -------------------------------------------------------------------------------------------------

/// [`DisplaySink`] which copies each frame and sends it over a channel, so that the render
/// thread never waits on encoding or file output.
#[derive(Debug)]
pub struct ChannelSink {
    sender: flume::Sender<Frame>,
}

impl ChannelSink {
    /// Creates a sink and the receiver for the frames it is given.
    pub fn channel() -> (Self, flume::Receiver<Frame>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }
}

impl DisplaySink for ChannelSink {
    fn present(&mut self, surface: &Surface, info: FrameInfo) {
        if info.render_time > SLOW_FRAME {
            log::warn!(
                "frame {n} took {t:.1?} to draw",
                n = info.frame_number,
                t = info.render_time
            );
        }
        // If the receiver is gone, nobody is watching and the frame can be dropped.
        let _ = self.sender.send((info, surface.snapshot()));
    }
}

// -------------------------------------------------------------------------------------------------

/// Options for [`record_main()`] beyond the [`Settings`].
#[derive(Clone, Debug)]
#[expect(clippy::module_name_repetitions)]
pub struct RecordOptions {
    /// Directory to write `frame-NNNN.png` files into, if any.
    pub output_dir: Option<PathBuf>,
    /// How long to wait for each frame before giving up.
    pub frame_timeout: Duration,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            frame_timeout: Duration::from_secs(60),
        }
    }
}

/// Runs a headless session: draws the initial frame described by `settings`, then performs
/// each of `steps`, waiting for the frame each one causes.
///
/// Returns information about every frame drawn, in order.
pub fn record_main(
    settings: &Settings,
    steps: &[Step],
    options: &RecordOptions,
) -> Result<Vec<FrameInfo>, anyhow::Error> {
    if let Some(dir) = &options.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let (sink, frames) = ChannelSink::channel();
    let thread = RenderThread::spawn(
        standard_scene(),
        settings.render_parameters(),
        settings.image_size(),
        Box::new(sink),
    )
    .context("failed to start rendering")?;
    let mut recorder = Recorder {
        control: thread.control(),
        frames,
        options,
        recorded: Vec::new(),
    };

    recorder.receive_frame()?;
    for &step in steps {
        log::debug!("script step: {step}");
        if step.apply(&recorder.control) {
            recorder.receive_frame()?;
        } else {
            log::info!("step {step} changed nothing; no frame drawn");
        }
    }

    thread.stop().context("rendering failed")?;
    Ok(recorder.recorded)
}

/// State of [`record_main()`] while it is consuming frames.
struct Recorder<'a> {
    control: RenderControl,
    frames: flume::Receiver<Frame>,
    options: &'a RecordOptions,
    recorded: Vec<FrameInfo>,
}

impl Recorder<'_> {
    fn receive_frame(&mut self) -> Result<(), anyhow::Error> {
        let (info, frame) = match self.frames.recv_timeout(self.options.frame_timeout) {
            Ok(frame) => frame,
            Err(flume::RecvTimeoutError::Timeout) => anyhow::bail!(
                "no frame was drawn within {:?} (after {} frames)",
                self.options.frame_timeout,
                self.recorded.len()
            ),
            Err(flume::RecvTimeoutError::Disconnected) => {
                anyhow::bail!("render thread stopped unexpectedly")
            }
        };
        log::info!(
            "frame {n} drawn in {t:.1?}",
            n = info.frame_number,
            t = info.render_time
        );

        if let Some(dir) = &self.options.output_dir {
            let path = dir.join(format!("frame-{:04}.png", info.frame_number));
            write_frame(&path, &frame)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        self.recorded.push(info);
        Ok(())
    }
}
