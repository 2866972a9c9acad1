pub mod viewpoint;

use encase::{ShaderType, UniformBuffer};
use glam::{Mat4, Vec4};

use crate::{
    config::CameraConfig,
    engine::{graphics::RenderError, scene::Lighting},
};

/// Perspective parameters, rebuilt whenever the window is resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fov_y: config.fov_y_deg.to_radians(),
            near: config.near,
            far: config.far,
        };
        projection.resize(width, height);
        projection
    }

    /// Zero-sized windows (minimised) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Per-frame camera and light data shared by every surface (group 0).
#[derive(Debug, Copy, Clone, ShaderType)]
pub struct SceneUniform {
    pub view_proj: Mat4,
    pub sky_color: Vec4,
    pub ground_color: Vec4,
    /// rgb colour, intensity in w.
    pub point_color: Vec4,
    /// xyz position, range in w.
    pub point_position: Vec4,
}

impl SceneUniform {
    pub fn new(view: Mat4, projection: &Projection, lighting: &Lighting) -> Self {
        let hemisphere = &lighting.hemisphere;
        let point = &lighting.point;
        Self {
            view_proj: projection.matrix() * view,
            sky_color: hemisphere.sky.extend(hemisphere.intensity),
            ground_color: hemisphere.ground.extend(1.0),
            point_color: point.color.extend(point.intensity),
            point_position: point.position.extend(point.range),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = UniformBuffer::new(Vec::new());
        buffer.write(self)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::config::GalleryConfig;

    #[test]
    fn projection_tracks_window_aspect() {
        let config = CameraConfig::default();
        let mut projection = Projection::new(&config, 1600, 900);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert!((projection.fov_y - 75f32.to_radians()).abs() < 1e-6);

        projection.resize(800, 800);
        assert_eq!(projection.aspect, 1.0);
        projection.resize(0, 600);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn uniform_packs_lights() {
        let scene = crate::engine::scene::gallery_scene(&GalleryConfig::default());
        let projection = Projection::new(&CameraConfig::default(), 4, 3);
        let uniform = SceneUniform::new(Mat4::IDENTITY, &projection, &scene.lighting);
        assert_eq!(uniform.point_position, Vec3::new(0.0, 4.0, 0.0).extend(20.0));
        assert_eq!(uniform.sky_color.w, 1.0);

        let bytes = uniform.to_bytes().unwrap();
        assert_eq!(bytes.len() as u64, SceneUniform::min_size().get());
    }
}
