//! Orbit camera and per-pixel ray generation.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use block_testbed_base::math::{FreeCoordinate, FreePoint, FreeVector, Matrix3, deg_to_rad};
use block_testbed_base::raycast::Ray;
use euclid::{Point2D, Size2D, vec3};

// -------------------------------------------------------------------------------------------------

/// Unit-of-measure type for pixel coordinates of rendered images.
#[expect(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum ImagePixel {}

/// Size of a rendered image, in pixels.
pub type ImageSize = Size2D<u32, ImagePixel>;

/// Position of a pixel in a rendered image; the origin is the top left corner.
pub type ImagePoint = Point2D<u32, ImagePixel>;

/// Narrowest and widest field of view, in degrees, used for projection.
const FOV_RANGE: (FreeCoordinate, FreeCoordinate) = (1.0, 175.0);

/// Minimum orbit distance reachable by [`OrbitCamera::move_forward()`].
const MIN_DISTANCE: FreeCoordinate = 0.1;

/// Orbit distance change per unit of [`OrbitCamera::move_forward()`] scale.
const ZOOM_STEP: FreeCoordinate = 0.1;

/// Pan angle per pixel of drag, per radian of half field of view.
const PAN_RATE: FreeCoordinate = PI / 250.0;

// -------------------------------------------------------------------------------------------------

/// A pinhole camera orbiting the center of the voxel, always looking towards it.
///
/// The camera sits `distance` away from the voxel center along the direction determined by
/// `yaw` and `pitch`. Its local frame has +Y pointing forward (towards the voxel center),
/// with image columns laid out along local X and image rows along local Z;
/// [`Self::transform()`] carries that frame into voxel space.
///
/// With the default pitch of −5π/6 the camera is above the voxel and the image is upright.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CameraPose", into = "CameraPose"))]
pub struct OrbitCamera {
    yaw: FreeCoordinate,
    pitch: FreeCoordinate,
    distance: FreeCoordinate,
    fov: FreeCoordinate,

    /// Cached value derived from `yaw` and `pitch`.
    transform: Matrix3,
}

impl OrbitCamera {
    /// Constructs a camera from its pose.
    ///
    /// `yaw` and `pitch` are in radians; `fov` is the full field of view in degrees.
    /// Non-finite arguments are replaced with the corresponding [default](Self::default).
    #[must_use]
    pub fn new(
        yaw: FreeCoordinate,
        pitch: FreeCoordinate,
        distance: FreeCoordinate,
        fov: FreeCoordinate,
    ) -> Self {
        let default = Self::default();
        let finite_or = |value: FreeCoordinate, fallback| {
            if value.is_finite() { value } else { fallback }
        };
        Self::from_parts(
            finite_or(yaw, default.yaw),
            finite_or(pitch, default.pitch),
            finite_or(distance, default.distance).max(MIN_DISTANCE),
            finite_or(fov, default.fov),
        )
    }

    fn from_parts(
        yaw: FreeCoordinate,
        pitch: FreeCoordinate,
        distance: FreeCoordinate,
        fov: FreeCoordinate,
    ) -> Self {
        Self {
            yaw,
            pitch,
            distance,
            fov,
            transform: Matrix3::rotate_y(FRAC_PI_2 + yaw) * Matrix3::rotate_x(FRAC_PI_2 - pitch),
        }
    }

    /// Rotation about the vertical axis, in radians.
    pub fn yaw(&self) -> FreeCoordinate {
        self.yaw
    }

    /// Elevation angle, in radians.
    pub fn pitch(&self) -> FreeCoordinate {
        self.pitch
    }

    /// Distance from the voxel center to the camera.
    pub fn distance(&self) -> FreeCoordinate {
        self.distance
    }

    /// Full field of view, in degrees, as configured (before clamping).
    pub fn fov(&self) -> FreeCoordinate {
        self.fov
    }

    /// Rotation from the camera's local frame to voxel space.
    pub fn transform(&self) -> Matrix3 {
        self.transform
    }

    /// Twice the tangent of half the field of view, with the field of view clamped to
    /// 1°–175°. This is the width of the image plane at unit distance.
    pub fn fov_tan(&self) -> FreeCoordinate {
        clamped_fov_tan(self.fov)
    }

    /// Position of the camera in voxel space.
    pub fn position(&self) -> FreePoint {
        self.transform
            .transform_point(FreePoint::new(0.0, -self.distance, 0.0))
            + vec3(0.5, 0.5, 0.5)
    }

    /// Returns the normalized direction of the ray through `pixel`, in voxel space.
    pub fn ray_direction(&self, pixel: ImagePoint, size: ImageSize) -> FreeVector {
        let width = FreeCoordinate::from(size.width);
        let height = FreeCoordinate::from(size.height);
        let fov_tan = self.fov_tan();
        let local = vec3(
            fov_tan * (width / height) * (0.5 - FreeCoordinate::from(pixel.x) / width),
            1.0,
            fov_tan * (0.5 - FreeCoordinate::from(pixel.y) / height),
        );
        self.transform.transform_vector(local).normalize()
    }

    /// Returns the ray from the camera through `pixel`.
    pub fn ray(&self, pixel: ImagePoint, size: ImageSize) -> Ray {
        Ray {
            origin: self.position(),
            direction: self.ray_direction(pixel, size),
        }
    }

    /// Rotates the camera about the voxel in response to a drag of `dx`, `dy` pixels.
    ///
    /// Yaw is kept within ±2π. Non-finite input is ignored.
    pub fn pan(&mut self, dx: FreeCoordinate, dy: FreeCoordinate) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let half_fov = deg_to_rad(self.fov / 2.0);
        let mut yaw = self.yaw + PAN_RATE * dx * half_fov;
        let pitch = self.pitch + PAN_RATE * dy * half_fov;
        if yaw > TAU {
            yaw -= TAU;
        } else if yaw < -TAU {
            yaw += TAU;
        }
        *self = Self::from_parts(yaw, pitch, self.distance, self.fov);
    }

    /// Sets the yaw and pitch directly. Non-finite input is ignored.
    pub fn set_orientation(&mut self, yaw: FreeCoordinate, pitch: FreeCoordinate) {
        if yaw.is_finite() && pitch.is_finite() {
            *self = Self::from_parts(yaw, pitch, self.distance, self.fov);
        }
    }

    /// Moves the camera towards the voxel (or away, if `scale` is negative) by a tenth of
    /// `scale`, stopping at a minimum distance of 0.1. Non-finite input is ignored.
    pub fn move_forward(&mut self, scale: FreeCoordinate) {
        if scale.is_finite() {
            self.distance = (self.distance - ZOOM_STEP * scale).max(MIN_DISTANCE);
        }
    }

    /// Sets the field of view in degrees. Non-finite input is ignored.
    pub fn set_fov(&mut self, fov: FreeCoordinate) {
        if fov.is_finite() {
            self.fov = fov;
        }
    }
}

impl Default for OrbitCamera {
    /// Looks down at the voxel from above one of its corners.
    fn default() -> Self {
        Self::from_parts(-3.0 * PI / 4.0, -5.0 * PI / 6.0, 1.5, 70.0)
    }
}

/// Serialized form of [`OrbitCamera`], omitting the derived transform.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CameraPose {
    yaw: FreeCoordinate,
    pitch: FreeCoordinate,
    distance: FreeCoordinate,
    fov: FreeCoordinate,
}

#[cfg(feature = "serde")]
impl From<CameraPose> for OrbitCamera {
    fn from(CameraPose { yaw, pitch, distance, fov }: CameraPose) -> Self {
        OrbitCamera::new(yaw, pitch, distance, fov)
    }
}

#[cfg(feature = "serde")]
impl From<OrbitCamera> for CameraPose {
    fn from(camera: OrbitCamera) -> Self {
        CameraPose {
            yaw: camera.yaw,
            pitch: camera.pitch,
            distance: camera.distance,
            fov: camera.fov,
        }
    }
}

/// Computes `2 tan(fov / 2)` for `fov` in degrees, clamped to the usable range.
pub fn clamped_fov_tan(fov: FreeCoordinate) -> FreeCoordinate {
    let fov = fov.clamp(FOV_RANGE.0, FOV_RANGE.1);
    2.0 * (deg_to_rad(fov) / 2.0).tan()
}
