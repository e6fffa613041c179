//! Camera for the 3D point-cloud chart
//!
//! Perspective and orthographic cameras that orbit a target. Besides the
//! matrices handed to the GPU, the camera projects points to screen space on
//! the CPU so the 3D chart can pick and area-select in the same pixel space
//! the user sees.

use serde::{Deserialize, Serialize};

use crate::types::{Point2, Point3, Viewport};

/// 3D vector type
pub type Vec3 = [f32; 3];

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Camera configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Look-at target
    pub target: Vec3,

    /// Up vector (usually [0, 1, 0])
    pub up: Vec3,

    /// Field of view in radians (for perspective)
    pub fov: f32,

    /// Near clipping plane
    pub near: f32,

    /// Far clipping plane
    pub far: f32,

    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,

    /// Projection mode
    pub projection: ProjectionMode,
}

/// Camera projection mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

/// A point projected to the screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Pixel position, y growing downward
    pub screen: Point2,
    /// Normalized depth in [-1, 1], smaller is nearer
    pub depth: f32,
}

impl Camera {
    /// Create a new perspective camera
    pub fn perspective(position: Vec3, target: Vec3, fov_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: [0.0, 1.0, 0.0],
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect_ratio: aspect,
            projection: ProjectionMode::Perspective,
        }
    }

    /// Create a new orthographic camera
    pub fn orthographic(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            projection: ProjectionMode::Orthographic,
            ..Self::perspective(position, target, 45.0, aspect)
        }
    }

    /// Match the aspect ratio to a viewport; empty viewports are ignored
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if let Some(aspect) = viewport.aspect_ratio() {
            self.aspect_ratio = aspect as f32;
        }
    }

    /// Get the view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionMode::Perspective => {
                perspective(self.fov, self.aspect_ratio, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.distance() * (self.fov / 2.0).tan();
                let half_width = half_height * self.aspect_ratio;
                orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        mat4_multiply(self.projection_matrix(), self.view_matrix())
    }

    /// Project a world point to the viewport
    ///
    /// Returns `None` for points behind the camera, outside the depth range,
    /// or with non-finite coordinates.
    pub fn project(&self, point: Point3, viewport: Viewport) -> Option<Projected> {
        self.project_with(&self.view_projection_matrix(), point, viewport)
    }

    /// Like [`Camera::project`] with a precomputed view-projection matrix,
    /// for projecting many points per frame
    pub fn project_with(
        &self,
        view_projection: &Mat4,
        point: Point3,
        viewport: Viewport,
    ) -> Option<Projected> {
        if !point.is_finite() || viewport.is_empty() {
            return None;
        }

        let v = [point.x as f32, point.y as f32, point.z as f32, 1.0];
        let clip = mat4_transform(view_projection, v);
        if clip[3] <= f32::EPSILON {
            return None;
        }

        let ndc = [clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]];
        if !(-1.0..=1.0).contains(&ndc[2]) {
            return None;
        }

        Some(Projected {
            screen: Point2::new(
                f64::from((ndc[0] + 1.0) / 2.0) * viewport.width,
                f64::from((1.0 - ndc[1]) / 2.0) * viewport.height,
            ),
            depth: ndc[2],
        })
    }

    /// Get camera forward direction
    pub fn forward(&self) -> Vec3 {
        vec_normalize(vec_sub(self.target, self.position))
    }

    /// Get camera right direction
    pub fn right(&self) -> Vec3 {
        vec_normalize(vec_cross(self.forward(), self.up))
    }

    /// Get distance from camera to target
    pub fn distance(&self) -> f32 {
        vec_length(vec_sub(self.target, self.position))
    }

    /// Set distance while maintaining direction
    pub fn set_distance(&mut self, distance: f32) {
        let direction = vec_normalize(vec_sub(self.position, self.target));
        self.position = vec_add(self.target, vec_scale(direction, distance));
    }

    /// Orbit around the target: yaw about world Y, pitch about camera right
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = rotate_vector(vec_sub(self.position, self.target), [0.0, 1.0, 0.0], yaw);
        self.position = vec_add(self.target, offset);

        let right = self.right();
        let offset = rotate_vector(vec_sub(self.position, self.target), right, pitch);
        self.position = vec_add(self.target, offset);
        self.up = rotate_vector(self.up, right, pitch);
    }

    /// Pan camera (move target and position together)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right();
        let up = vec_normalize(vec_cross(right, self.forward()));

        let delta = vec_add(vec_scale(right, -dx), vec_scale(up, dy));

        self.position = vec_add(self.position, delta);
        self.target = vec_add(self.target, delta);
    }

    /// Zoom by adjusting distance
    pub fn zoom(&mut self, factor: f32) {
        let new_distance = (self.distance() * factor).clamp(0.1, 10000.0);
        self.set_distance(new_distance);
    }

    /// Frame an axis-aligned box
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        let center = [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ];

        let size = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];

        let max_dim = size[0].max(size[1]).max(size[2]).max(1e-3);
        let distance = max_dim / (2.0 * (self.fov / 2.0).tan());

        self.target = center;
        self.up = [0.0, 1.0, 0.0];
        self.position = [center[0], center[1], center[2] + distance * 1.5];
        self.far = self.far.max(distance * 4.0);
    }

    /// Frame the finite points of a cloud; leaves the camera alone when none are finite
    pub fn fit_to_points(&mut self, points: &[Point3]) {
        let mut finite = points.iter().filter(|p| p.is_finite());
        let Some(first) = finite.next() else {
            return;
        };
        let seed = [first.x as f32, first.y as f32, first.z as f32];
        let (min, max) = finite.fold((seed, seed), |(lo, hi), p| {
            let v = [p.x as f32, p.y as f32, p.z as f32];
            (
                [lo[0].min(v[0]), lo[1].min(v[1]), lo[2].min(v[2])],
                [hi[0].max(v[0]), hi[1].max(v[1]), hi[2].max(v[2])],
            )
        });
        self.fit_to_bounds(min, max);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective([0.0, 0.0, 5.0], [0.0, 0.0, 0.0], 45.0, 1.0)
    }
}

// MARK: - Math utilities

fn vec_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn vec_sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn vec_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn vec_dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn vec_cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn vec_length(v: Vec3) -> f32 {
    vec_dot(v, v).sqrt()
}

fn vec_normalize(v: Vec3) -> Vec3 {
    let len = vec_length(v);
    if len > 0.0001 {
        vec_scale(v, 1.0 / len)
    } else {
        v
    }
}

fn rotate_vector(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let axis = vec_normalize(axis);
    let cos_a = angle.cos();
    let sin_a = angle.sin();

    // Rodrigues' rotation formula
    let term1 = vec_scale(v, cos_a);
    let term2 = vec_scale(vec_cross(axis, v), sin_a);
    let term3 = vec_scale(axis, vec_dot(axis, v) * (1.0 - cos_a));

    vec_add(vec_add(term1, term2), term3)
}

fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = vec_normalize(vec_sub(target, eye));
    let s = vec_normalize(vec_cross(f, up));
    let u = vec_cross(s, f);

    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-vec_dot(s, eye), -vec_dot(u, eye), vec_dot(f, eye), 1.0],
    ]
}

fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let tan_half_fov = (fov / 2.0).tan();

    let mut m = [[0.0; 4]; 4];
    m[0][0] = 1.0 / (aspect * tan_half_fov);
    m[1][1] = 1.0 / tan_half_fov;
    m[2][2] = -(far + near) / (far - near);
    m[2][3] = -1.0;
    m[3][2] = -(2.0 * far * near) / (far - near);

    m
}

fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let mut m = [[0.0; 4]; 4];
    m[0][0] = 2.0 / (right - left);
    m[1][1] = 2.0 / (top - bottom);
    m[2][2] = -2.0 / (far - near);
    m[3][0] = -(right + left) / (right - left);
    m[3][1] = -(top + bottom) / (top - bottom);
    m[3][2] = -(far + near) / (far - near);
    m[3][3] = 1.0;

    m
}

fn mat4_multiply(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

fn mat4_transform(m: &Mat4, v: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = (0..4).map(|col| m[col][row] * v[col]).sum();
    }
    out
}
