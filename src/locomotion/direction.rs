// Travel direction from the rider's head yaw relative to the board yaw.
// The rider stands sideways on the deck, so facing a quarter turn off the board
// axis is the neutral stance; leaning the head past it picks the direction.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::pose::Pose;
use super::speed::Direction;

/// Direction used when either the board or the head pose is unknown
pub const NEUTRAL_DIRECTION: Direction = Direction::Forward;

/// Pick a direction from board and head yaw (radians)
///
/// The head yaw is measured from the neutral stance (board yaw plus a quarter
/// turn) and wrapped into `[0, 2π)`. Values below π travel forward; π itself
/// and above travel backward.
pub fn direction_from_yaws(board_yaw: f32, head_yaw: f32) -> Direction {
    let relative = (head_yaw - board_yaw - FRAC_PI_2).rem_euclid(TAU);
    if relative < PI {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

pub fn direction_from_poses(board: Option<&Pose>, head: Option<&Pose>) -> Direction {
    match (board, head) {
        (Some(board), Some(head)) => direction_from_yaws(board.yaw(), head.yaw()),
        _ => NEUTRAL_DIRECTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_head_past_stance_goes_forward() {
        // relative = π/2, well inside the forward half
        assert_eq!(direction_from_yaws(0.0, PI), Direction::Forward);
        assert_eq!(direction_from_yaws(1.2, 1.2 + PI), Direction::Forward);
    }

    #[test]
    fn test_head_along_board_goes_backward() {
        // relative = -π/2, wraps to 3π/2
        assert_eq!(direction_from_yaws(0.0, 0.0), Direction::Backward);
        assert_eq!(direction_from_yaws(1.2, 1.2), Direction::Backward);
    }

    #[test]
    fn test_small_turns_around_stance() {
        // Just past the neutral stance is forward, just short of it is backward
        assert_eq!(direction_from_yaws(0.0, 1.87), Direction::Forward);
        assert_eq!(direction_from_yaws(0.0, 1.27), Direction::Backward);
        assert_eq!(direction_from_yaws(-0.5, 1.37), Direction::Forward);
        assert_eq!(direction_from_yaws(-0.5, 0.77), Direction::Backward);
    }

    #[test]
    fn test_quarter_turn_boundary_tie_break() {
        // head - board = π/2 lands exactly on 0: forward
        assert_eq!(direction_from_yaws(0.0, FRAC_PI_2), Direction::Forward);
        // head - board = -π/2 lands exactly on π: backward
        assert_eq!(direction_from_yaws(FRAC_PI_2, 0.0), Direction::Backward);
    }

    #[test]
    fn test_wraps_full_turns() {
        assert_eq!(
            direction_from_yaws(0.3 + TAU, 0.3),
            direction_from_yaws(0.3, 0.3)
        );
        assert_eq!(direction_from_yaws(0.0, 1.87 + TAU), Direction::Forward);
    }

    #[test]
    fn test_missing_pose_is_neutral() {
        let head = Pose::new(Vec3::ZERO, Quat::from_rotation_y(PI));
        assert_eq!(direction_from_poses(None, Some(&head)), NEUTRAL_DIRECTION);
        assert_eq!(direction_from_poses(Some(&head), None), NEUTRAL_DIRECTION);
        assert_eq!(direction_from_poses(None, None), NEUTRAL_DIRECTION);
    }

    #[test]
    fn test_from_poses_uses_yaw() {
        let board = Pose::new(Vec3::ZERO, Quat::from_rotation_y(0.0));
        let head = Pose::new(Vec3::new(0.0, 1.7, 0.0), Quat::from_rotation_y(2.5));
        // relative = 2.5 - π/2 ≈ 0.93 → forward
        assert_eq!(direction_from_poses(Some(&board), Some(&head)), Direction::Forward);

        let head = Pose::new(Vec3::new(0.0, 1.7, 0.0), Quat::from_rotation_y(0.5));
        // relative = 0.5 - π/2 ≈ -1.07 → wraps to ≈ 5.21 → backward
        assert_eq!(direction_from_poses(Some(&board), Some(&head)), Direction::Backward);
    }
}
