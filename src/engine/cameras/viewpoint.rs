use glam::{Mat4, Vec3};

use crate::{
    config::{GalleryConfig, MovementConfig},
    frame_loop::input::{Action, InputState, KeyBindings},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Radians about +Y. Zero faces -Z; increasing turns left.
    pub yaw: f32,
}

impl Pose {
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(-sin, 0.0, -cos)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }
}

/// Horizontal region the viewpoint is pinned inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub half_extent: f32,
    pub clamp_pad: f32,
}

impl RoomBounds {
    /// The pad is limited to `[0, half_extent]` so the walkable range is
    /// never empty.
    pub fn new(half_extent: f32, clamp_pad: f32) -> Self {
        let half_extent = half_extent.abs().max(0.0);
        let clamp_pad = clamp_pad.max(0.0).min(half_extent);
        Self {
            half_extent,
            clamp_pad,
        }
    }

    pub fn min(&self) -> f32 {
        -self.half_extent + self.clamp_pad
    }

    pub fn max(&self) -> f32 {
        self.half_extent - self.clamp_pad
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min(), self.max())
    }

    pub fn contains(&self, position: Vec3) -> bool {
        let range = self.min()..=self.max();
        range.contains(&position.x) && range.contains(&position.z)
    }
}

#[derive(Debug)]
pub struct ViewpointController {
    pose: Pose,
    bounds: RoomBounds,
    pub speed: f32,
    pub turn_rate: f32,
}

impl ViewpointController {
    pub fn new(position: Vec3, bounds: RoomBounds, movement: &MovementConfig) -> Self {
        let position = Vec3::new(bounds.clamp(position.x), position.y, bounds.clamp(position.z));
        Self {
            pose: Pose { position, yaw: 0.0 },
            bounds,
            speed: movement.speed,
            turn_rate: movement.turn_rate,
        }
    }

    /// Spawns at the centre of the room at eye height, facing north.
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            Vec3::new(0.0, config.camera.eye_height, 0.0),
            RoomBounds::new(config.room.half_extent, config.room.clamp_pad),
            &config.movement,
        )
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    pub fn forward(&self) -> Vec3 {
        self.pose.forward()
    }

    /// Moves along the forward vector (backwards for negative distances),
    /// pinning x and z to the room bounds independently.
    pub fn move_forward(&mut self, distance: f32) {
        let step = self.forward() * distance;
        let position = &mut self.pose.position;
        *position += step;
        position.x = self.bounds.clamp(position.x);
        position.z = self.bounds.clamp(position.z);
    }

    pub fn turn(&mut self, delta_yaw: f32) {
        self.pose.yaw += delta_yaw;
    }

    /// Applies one frame of held movement keys. Opposite actions held together
    /// both apply and cancel out.
    pub fn update_frame(&mut self, input: &InputState, bindings: &KeyBindings) {
        for action in Action::ALL {
            if !bindings.is_active(action, input) {
                continue;
            }
            match action {
                Action::Forward => self.move_forward(self.speed),
                Action::Backward => self.move_forward(-self.speed),
                Action::TurnLeft => self.turn(self.turn_rate),
                Action::TurnRight => self.turn(-self.turn_rate),
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.pose.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    const EPS: f32 = 1e-5;

    fn controller() -> ViewpointController {
        ViewpointController::from_config(&GalleryConfig::default())
    }

    #[test]
    fn spawns_centred_at_eye_height() {
        let camera = controller();
        assert_eq!(camera.pose().position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(camera.pose().yaw, 0.0);
        assert!((camera.bounds().min() + 7.6).abs() < EPS);
        assert!((camera.bounds().max() - 7.6).abs() < EPS);
    }

    #[test]
    fn yaw_zero_faces_the_north_wall() {
        let camera = controller();
        let forward = camera.forward();
        assert!((forward - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn turning_left_rotates_counter_clockwise_from_above() {
        let mut camera = controller();
        camera.turn(FRAC_PI_2);
        assert!((camera.forward() - Vec3::NEG_X).length() < EPS);
        camera.turn(-2.0 * FRAC_PI_2);
        assert!((camera.forward() - Vec3::X).length() < EPS);
    }

    #[test]
    fn zero_moves_are_identity() {
        let mut camera = controller();
        camera.turn(0.3);
        camera.move_forward(1.0);
        let before = *camera.pose();
        camera.move_forward(0.0);
        camera.turn(0.0);
        assert_eq!(*camera.pose(), before);
    }

    #[test]
    fn forward_then_back_round_trips_inside_the_room() {
        let mut camera = controller();
        camera.turn(0.7);
        let start = camera.pose().position;
        camera.move_forward(2.5);
        camera.move_forward(-2.5);
        assert!((camera.pose().position - start).length() < EPS);
    }

    #[test]
    fn large_step_is_pinned_to_the_wall() {
        let mut camera = controller();
        camera.move_forward(100.0);
        let position = camera.pose().position;
        assert!((position.z + 7.6).abs() < EPS);
        assert!(position.x.abs() < EPS);
        assert_eq!(position.y, 1.6);

        camera.move_forward(-1000.0);
        assert!((camera.pose().position.z - 7.6).abs() < EPS);
    }

    #[test]
    fn diagonal_overshoot_clamps_each_axis() {
        let mut camera = controller();
        camera.turn(0.5);
        camera.move_forward(50.0);
        let position = camera.pose().position;
        assert!((position.x + 7.6).abs() < EPS);
        assert!((position.z + 7.6).abs() < EPS);
    }

    #[test]
    fn containment_holds_over_arbitrary_walks() {
        let mut camera = controller();
        let steps = [3.0, -17.0, 0.2, 45.0, -0.01, 8.0, -8.0, 1e4, -1e4];
        for (i, step) in steps.iter().cycle().take(200).enumerate() {
            camera.turn(0.37 * i as f32);
            camera.move_forward(*step);
            assert!(camera.bounds().contains(camera.pose().position));
            assert_eq!(camera.pose().position.y, 1.6);
        }
    }

    #[test]
    fn one_frame_forward_moves_exactly_speed() {
        let mut camera = controller();
        let bindings = KeyBindings::default();
        let mut input = InputState::default();
        input.set_key_state("KeyW", true);

        camera.update_frame(&input, &bindings);
        let position = camera.pose().position;
        assert!((position.z + 0.05).abs() < EPS);
        assert!(position.x.abs() < EPS);
        assert_eq!(camera.pose().yaw, 0.0);
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut camera = controller();
        let before = *camera.pose();
        camera.update_frame(&InputState::default(), &KeyBindings::default());
        assert_eq!(*camera.pose(), before);
    }

    #[test]
    fn opposite_turns_cancel() {
        let mut camera = controller();
        let mut input = InputState::default();
        input.set_key_state("ArrowLeft", true);
        input.set_key_state("KeyD", true);
        camera.update_frame(&input, &KeyBindings::default());
        assert!(camera.pose().yaw.abs() < EPS);
    }

    #[test]
    fn opposite_moves_cancel() {
        let mut camera = controller();
        let mut input = InputState::default();
        input.set_key_state("ArrowUp", true);
        input.set_key_state("ArrowDown", true);
        camera.update_frame(&input, &KeyBindings::default());
        assert!(camera.pose().position.z.abs() < EPS);
    }

    #[test]
    fn turn_right_key_decreases_yaw() {
        let mut camera = controller();
        let mut input = InputState::default();
        input.set_key_state("ArrowRight", true);
        camera.update_frame(&input, &KeyBindings::default());
        assert!((camera.pose().yaw + 0.03).abs() < EPS);
    }

    #[test]
    fn out_of_bounds_spawn_is_clamped() {
        let camera = ViewpointController::new(
            Vec3::new(20.0, 1.6, -20.0),
            RoomBounds::new(8.0, 0.4),
            &MovementConfig::default(),
        );
        assert!((camera.pose().position - Vec3::new(7.6, 1.6, -7.6)).length() < EPS);
    }

    #[test]
    fn oversized_pad_collapses_to_the_centre() {
        let bounds = RoomBounds::new(2.0, 5.0);
        assert_eq!(bounds.min(), 0.0);
        assert_eq!(bounds.max(), 0.0);

        let mut camera = ViewpointController::new(
            Vec3::new(1.0, 1.6, -1.0),
            bounds,
            &MovementConfig::default(),
        );
        camera.move_forward(3.0);
        assert_eq!(camera.pose().position.x, 0.0);
        assert_eq!(camera.pose().position.z, 0.0);
    }

    #[test]
    fn negative_or_nan_bounds_never_invert() {
        let bounds = RoomBounds::new(-4.0, -1.0);
        assert_eq!((bounds.min(), bounds.max()), (-4.0, 4.0));

        let bounds = RoomBounds::new(f32::NAN, f32::NAN);
        assert!(bounds.min() <= bounds.max());
        assert_eq!(bounds.clamp(3.0), 0.0);
    }

    #[test]
    fn view_matrix_looks_down_negative_z_at_spawn() {
        let camera = controller();
        let ahead = camera.view_matrix().transform_point3(Vec3::new(0.0, 1.6, -5.0));
        assert!((ahead - Vec3::new(0.0, 0.0, -5.0)).length() < EPS);
    }
}
