use std::sync::Arc;
use std::time::Duration;

use block_testbed_base::math::{FreeCoordinate, FreeVector, Rgba};
use block_testbed_base::raycast::Ray;
use euclid::size2;
use pretty_assertions::assert_eq;

use super::*;
use crate::{Compass, MaterialResolver, SurfaceHit, TestModel, Texture, TextureSampler, tone_map};

const TIMEOUT: Duration = Duration::from_secs(10);

/// Colors every ray by the material id, and panics on id 99.
#[derive(Debug)]
struct IdResolver;

impl IdResolver {
    fn color(id: u32) -> Rgba {
        Rgba::new((id % 16) as f32 / 16.0, 0.5, 0.0, 1.0)
    }
}

impl MaterialResolver for IdResolver {
    fn intersect(&self, _: &Ray, material: Material, t_limit: FreeCoordinate) -> Option<SurfaceHit> {
        assert_ne!(material.id, 99, "exploding material");
        (0.0 < t_limit).then(|| SurfaceHit {
            t: 0.0,
            normal: FreeVector::new(0.0, 1.0, 0.0),
            color: Self::color(material.id),
        })
    }
}

fn scene() -> Scene {
    let tex = || -> Arc<dyn TextureSampler> { Arc::new(Texture::uniform(4, 4, Rgba::BLACK)) };
    Scene::new(
        Arc::new(IdResolver),
        tex(),
        Compass::new(tex(), tex(), tex(), tex()),
        TestModel::new(tex(), tex(), tex()),
    )
}

/// Camera inside the voxel, so that every pixel sees the material.
fn inside() -> RenderParameters {
    RenderParameters::new(
        OrbitCamera::new(0.0, -2.0, 0.1, 70.0),
        Material::new(1, 0),
        RenderMode::SolidVoxel,
        false,
    )
}

fn spawn() -> (RenderThread, flume::Receiver<(FrameInfo, FrameBuffer)>) {
    let (sender, receiver) = flume::unbounded();
    let thread = RenderThread::spawn(
        scene(),
        inside(),
        size2(8, 6),
        Box::new(move |surface: &Surface, info: FrameInfo| {
            let _ = sender.send((info, surface.snapshot()));
        }),
    )
    .unwrap();
    (thread, receiver)
}

fn assert_uniform(frame: &FrameBuffer, id: u32) {
    let expected = tone_map(IdResolver::color(id));
    assert!(
        frame.data().iter().all(|&pixel| pixel == expected),
        "frame {} is not uniformly {expected:?}: {:?}",
        frame.frame_number(),
        frame.data()
    );
}

#[test]
fn first_frame_is_drawn_immediately() {
    let (thread, frames) = spawn();
    let (info, frame) = frames.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(info.frame_number, 1);
    assert_eq!(frame.frame_number(), 1);
    assert_eq!(frame.size(), size2(8, 6));
    assert_uniform(&frame, 1);
    assert_eq!(thread.control().front_frame_number(), 1);
    thread.stop().unwrap();
}

#[test]
fn unchanged_parameters_do_not_draw() {
    let (thread, frames) = spawn();
    let control = thread.control();
    frames.recv_timeout(TIMEOUT).unwrap();

    assert!(!control.set_mode(RenderMode::SolidVoxel));
    assert!(!control.set_material(Material::new(1, 0)));
    assert!(!control.update(|_| {}));
    assert!(!control.pan(FreeCoordinate::NAN, 0.0));
    assert!(
        frames.recv_timeout(Duration::from_millis(200)).is_err(),
        "no frame expected"
    );

    assert!(control.set_material_id(2));
    let (info, frame) = frames.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(info.frame_number, 2);
    assert_uniform(&frame, 2);
    thread.stop().unwrap();
}

#[test]
fn refresh_draws_without_change() {
    let (thread, frames) = spawn();
    let control = thread.control();
    frames.recv_timeout(TIMEOUT).unwrap();
    control.refresh();
    let (info, frame) = frames.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(info.frame_number, 2);
    assert_uniform(&frame, 1);
    thread.stop().unwrap();
}

#[test]
fn pending_reflects_last_write() {
    let (thread, _frames) = spawn();
    let control = thread.control();
    control.set_material_id(5);
    control.set_material_data(3);
    control.set_compass(true);
    control.set_mode(RenderMode::Sprite);
    let pending = control.pending();
    assert_eq!(pending.material, Material::new(5, 3));
    assert!(pending.compass);
    assert_eq!(pending.mode, RenderMode::Sprite);
    thread.stop().unwrap();
}

/// Rapid changes are coalesced, frames arrive in order, every published frame was drawn
/// with a single set of parameters, and the last change is always drawn.
#[test]
fn frames_are_ordered_and_whole() {
    let (thread, frames) = spawn();
    let control = thread.control();
    let surface = thread.surface();

    let reader = std::thread::spawn(move || {
        for _ in 0..200 {
            let frame = surface.lock();
            let first = frame.data()[0];
            assert!(frame.data().iter().all(|&p| p == first), "torn frame");
        }
    });

    for id in 2..=10 {
        control.set_material_id(id);
    }
    reader.join().unwrap();

    let mut last_number = 0;
    loop {
        let (info, frame) = frames.recv_timeout(TIMEOUT).unwrap();
        assert!(info.frame_number > last_number);
        assert_eq!(info.frame_number, frame.frame_number());
        last_number = info.frame_number;
        let first = frame.data()[0];
        assert!(frame.data().iter().all(|&p| p == first), "torn frame");
        if first == tone_map(IdResolver::color(10)) {
            break;
        }
    }
    assert!(last_number <= 10);
    thread.stop().unwrap();
}

#[test]
fn stop_ends_thread_and_releases_sink() {
    let (thread, frames) = spawn();
    frames.recv_timeout(TIMEOUT).unwrap();
    thread.stop().unwrap();
    // The sink, which owns the sender, has been dropped.
    assert!(matches!(
        frames.recv_timeout(TIMEOUT),
        Err(flume::RecvTimeoutError::Disconnected)
    ));
}

#[test]
fn cancel_through_control() {
    let (thread, frames) = spawn();
    let control = thread.control();
    control.cancel();
    control.cancel();
    thread.stop().unwrap();
    while let Ok((info, _)) = frames.recv_timeout(TIMEOUT) {
        assert_eq!(info.frame_number, 1);
    }
}

#[test]
fn panic_is_reported() {
    let (thread, frames) = spawn();
    frames.recv_timeout(TIMEOUT).unwrap();
    thread.control().set_material_id(99);
    // The sink is dropped when the thread unwinds.
    assert!(matches!(
        frames.recv_timeout(TIMEOUT),
        Err(flume::RecvTimeoutError::Disconnected)
    ));
    assert!(matches!(thread.stop(), Err(RenderError::Panicked)));
}

#[test]
fn empty_size_is_rejected() {
    let result = RenderThread::spawn(
        scene(),
        inside(),
        size2(0, 0),
        Box::new(|_: &Surface, _: FrameInfo| {}),
    );
    assert!(matches!(result, Err(RenderError::EmptyImage { .. })));
}
