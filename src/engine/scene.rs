use std::{
    f32::consts::{FRAC_PI_2, PI},
    path::PathBuf,
};

use glam::{Mat4, Vec3};

use crate::config::GalleryConfig;

pub const BACKGROUND: u32 = 0x0a0f1e;
const FLOOR_COLOR: u32 = 0x228b22;

/// Converts a `0xRRGGBB` sRGB colour to linear RGB.
pub fn hex_color(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky: Vec3,
    pub ground: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Distance at which the light has faded out.
    pub range: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub hemisphere: HemisphereLight,
    pub point: PointLight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub texture: Option<PathBuf>,
    /// Unlit materials show their colour or texture as-is.
    pub lit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    North,
    East,
    South,
    West,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::North, WallSide::East, WallSide::South, WallSide::West];

    /// Centre of the wall on the floor plane and its rotation about Y.
    fn placement(self, half_extent: f32) -> (f32, f32, f32) {
        match self {
            WallSide::North => (0.0, -half_extent, 0.0),
            WallSide::East => (half_extent, 0.0, -FRAC_PI_2),
            WallSide::South => (0.0, half_extent, PI),
            WallSide::West => (-half_extent, 0.0, FRAC_PI_2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Floor,
    Wall(WallSide),
}

/// A flat rectangle in its local XY plane, facing +Z before rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub label: String,
    pub width: f32,
    pub height: f32,
    pub position: Vec3,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub material: Material,
}

impl Surface {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_rotation_x(self.rotation_x)
    }

    pub fn normal(&self) -> Vec3 {
        self.model_matrix().transform_vector3(Vec3::Z)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub background: Vec3,
    pub lighting: Lighting,
    pub surfaces: Vec<Surface>,
}

pub fn gallery_scene(config: &GalleryConfig) -> SceneDescription {
    let half_extent = config.room.half_extent;
    let wall_height = config.room.wall_height;
    let width = half_extent * 2.0;

    let mut surfaces = vec![Surface {
        kind: SurfaceKind::Floor,
        label: "Floor".into(),
        width,
        height: width,
        position: Vec3::ZERO,
        rotation_x: -FRAC_PI_2,
        rotation_y: 0.0,
        material: Material {
            color: hex_color(FLOOR_COLOR),
            texture: None,
            lit: true,
        },
    }];

    for (i, side) in WallSide::ALL.into_iter().enumerate() {
        let (x, z, rotation_y) = side.placement(half_extent);
        surfaces.push(Surface {
            kind: SurfaceKind::Wall(side),
            label: config.assets.wall_labels[i].clone(),
            width,
            height: wall_height,
            position: Vec3::new(x, wall_height / 2.0, z),
            rotation_x: 0.0,
            rotation_y,
            material: Material {
                color: Vec3::ONE,
                texture: config.wall_texture_path(i),
                lit: false,
            },
        });
    }

    SceneDescription {
        background: hex_color(BACKGROUND),
        lighting: Lighting {
            hemisphere: HemisphereLight {
                sky: hex_color(0xffffff),
                ground: hex_color(0x444444),
                intensity: 1.0,
            },
            point: PointLight {
                color: hex_color(0xfff4cc),
                intensity: 1.0,
                range: 20.0,
                position: Vec3::new(0.0, 4.0, 0.0),
            },
        },
        surfaces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn hex_colors_are_linearised() {
        assert_eq!(hex_color(0xffffff), Vec3::ONE);
        assert_eq!(hex_color(0x000000), Vec3::ZERO);
        let green = hex_color(FLOOR_COLOR);
        assert!(green.y > green.x && green.y > green.z);
        assert!((hex_color(0x808080).x - 0.2158605).abs() < 1e-4);
    }

    #[test]
    fn room_has_a_floor_and_four_walls() {
        let scene = gallery_scene(&GalleryConfig::default());
        assert_eq!(scene.surfaces.len(), 5);
        assert_eq!(scene.surfaces[0].kind, SurfaceKind::Floor);
        let walls: Vec<_> = scene.surfaces[1..].iter().map(|s| s.kind).collect();
        assert_eq!(
            walls,
            WallSide::ALL.map(SurfaceKind::Wall).to_vec()
        );
    }

    #[test]
    fn walls_stand_on_the_room_edges_facing_inwards() {
        let scene = gallery_scene(&GalleryConfig::default());
        for wall in &scene.surfaces[1..] {
            assert_eq!(wall.width, 16.0);
            assert_eq!(wall.height, 3.5);
            assert_eq!(wall.position.y, 1.75);
            let edge = wall.position.x.abs().max(wall.position.z.abs());
            assert_eq!(edge, 8.0);

            let inward = -Vec3::new(wall.position.x, 0.0, wall.position.z).normalize();
            assert!((wall.normal() - inward).length() < EPS, "{} faces {:?}", wall.label, wall.normal());
        }
    }

    #[test]
    fn north_wall_is_the_first_stage() {
        let scene = gallery_scene(&GalleryConfig::default());
        let north = &scene.surfaces[1];
        assert_eq!(north.label, "Birth");
        assert_eq!(north.position, Vec3::new(0.0, 1.75, -8.0));
        assert_eq!(
            north.material.texture.as_deref(),
            Some(PathBuf::from("assets/wall_texture_1.jpg").as_path())
        );
        assert!(!north.material.lit);
    }

    #[test]
    fn floor_lies_flat_and_faces_up() {
        let scene = gallery_scene(&GalleryConfig::default());
        let floor = &scene.surfaces[0];
        assert!((floor.normal() - Vec3::Y).length() < EPS);
        assert!(floor.material.lit);
        assert!(floor.material.texture.is_none());
    }
}
