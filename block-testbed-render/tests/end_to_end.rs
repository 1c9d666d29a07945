//! Renders the fixed test geometry through the public API and checks the result against
//! known geometry.

use std::sync::Arc;
use std::time::Duration;

use block_testbed_base::math::{FreeCoordinate, FreeVector, Rgba, deg_to_rad};
use block_testbed_base::raycast::Ray;
use block_testbed_render::camera::OrbitCamera;
use block_testbed_render::{
    Compass, FrameInfo, Material, MaterialResolver, RenderMode, RenderParameters, RenderThread,
    Renderer, Scene, Surface, SurfaceHit, TestModel, Texture, TextureSampler, tone_map,
};
use euclid::{point2, size2, vec3};
use pretty_assertions::assert_eq;

const SIDE: Rgba = Rgba::new(0.25, 0.5, 0.75, 1.0);
const FRONT: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
const BACK: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

#[derive(Debug)]
struct NoMaterial;

impl MaterialResolver for NoMaterial {
    fn intersect(&self, _: &Ray, _: Material, _: FreeCoordinate) -> Option<SurfaceHit> {
        None
    }
}

fn scene() -> Scene {
    let tex = |color| -> Arc<dyn TextureSampler> { Arc::new(Texture::uniform(16, 16, color)) };
    Scene::new(
        Arc::new(NoMaterial),
        tex(Rgba::TRANSPARENT),
        Compass::new(
            tex(Rgba::BLACK),
            tex(Rgba::BLACK),
            tex(Rgba::BLACK),
            tex(Rgba::BLACK),
        ),
        TestModel::new(tex(SIDE), tex(FRONT), tex(BACK)),
    )
}

fn level_view() -> RenderParameters {
    RenderParameters::new(
        OrbitCamera::new(0.0, 0.0, 1.5, 70.0),
        Material::new(2, 0),
        RenderMode::FixedTestGeometry,
        false,
    )
}

#[test]
fn center_pixel_sees_west_side_of_down_facing_model() {
    let renderer = Renderer::new(scene());
    let trace = renderer.trace_pixel(&level_view(), point2(50, 50), size2(100, 100));
    assert_eq!(trace.normal, vec3(-1.0, 0.0, 0.0));
    assert!((trace.distance - 1.0).abs() < 1e-9, "{}", trace.distance);
    assert_eq!(trace.to_rgb8(), tone_map(SIDE));
}

#[test]
fn render_thread_publishes_same_image() {
    let (sender, receiver) = flume::unbounded();
    let thread = RenderThread::spawn(
        scene(),
        level_view(),
        size2(100, 100),
        Box::new(move |surface: &Surface, info: FrameInfo| {
            let _ = sender.send((info, surface.snapshot()));
        }),
    )
    .unwrap();
    let (info, frame) = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(info.frame_number, 1);
    assert_eq!(frame.get(point2(50, 50)), tone_map(SIDE));
    // The corner ray misses the voxel entirely and stays white.
    assert_eq!(frame.get(point2(0, 0)), [255, 255, 255]);
    thread.stop().unwrap();
}

#[test]
fn facing_selects_front_texture() {
    let renderer = Renderer::new(scene());
    // Data 4 faces the front west, towards the camera.
    let mut parameters = level_view();
    parameters.material = Material::new(2, 4);
    let trace = renderer.trace_pixel(&parameters, point2(50, 50), size2(100, 100));
    assert_eq!(trace.normal, vec3(-1.0, 0.0, 0.0));
    assert_eq!(trace.to_rgb8(), tone_map(FRONT));
}

#[test]
fn pan_through_control() {
    let thread = RenderThread::spawn(
        scene(),
        level_view(),
        size2(4, 4),
        Box::new(|_: &Surface, _: FrameInfo| {}),
    )
    .unwrap();
    let control = thread.control();
    assert!(control.pan(250.0, 0.0));
    let yaw = control.pending().camera.yaw();
    assert!((yaw - core::f64::consts::PI * deg_to_rad(35.0)).abs() < 1e-12, "{yaw}");
    thread.stop().unwrap();
}

#[test]
fn compass_is_seen_through_empty_voxel() {
    let renderer = Renderer::new(scene());
    let mut parameters = level_view();
    parameters.mode = RenderMode::SolidVoxel;
    parameters.compass = true;
    let trace = renderer.trace_pixel(&parameters, point2(50, 50), size2(100, 100));
    // The east wall, facing inward.
    assert_eq!(trace.normal, vec3(-1.0, 0.0, 0.0));
    assert_eq!(trace.to_rgb8(), [0, 0, 0]);

    parameters.compass = false;
    let trace = renderer.trace_pixel(&parameters, point2(50, 50), size2(100, 100));
    assert_eq!(trace.normal, FreeVector::zero());
    assert_eq!(trace.to_rgb8(), [255, 255, 255]);
}
