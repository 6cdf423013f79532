// Controller role registry
//
// Tracks which physical controller plays which role. The last registration for
// a role wins silently (reconnects, or two controllers claiming the same hand).

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::pose::{Hand, Pose};

/// Device id assigned by the VR subsystem
pub type ControllerId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ControllerRole {
    /// Held in the hand: trigger and calibration button
    Hand,
    /// Strapped to the board
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedController {
    pub id: ControllerId,
    pub hand: Hand,
    /// Latest reported pose, `None` until the first pose update
    pub pose: Option<Pose>,
}

/// Controller ids bound to both roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundControllers {
    pub hand: ControllerId,
    pub board: ControllerId,
}

pub struct ControllerRegistry {
    board_hand: Hand,
    hand: Option<TrackedController>,
    board: Option<TrackedController>,
    resolved: bool,
    waiters: Vec<oneshot::Sender<BoundControllers>>,
}

impl ControllerRegistry {
    /// `board_hand` is the physical hand whose controller rides on the board
    pub fn new(board_hand: Hand) -> Self {
        Self {
            board_hand,
            hand: None,
            board: None,
            resolved: false,
            waiters: Vec::new(),
        }
    }

    pub fn role_for(&self, hand: Hand) -> ControllerRole {
        if hand == self.board_hand {
            ControllerRole::Board
        } else {
            ControllerRole::Hand
        }
    }

    /// Register a controller reported by the VR subsystem
    ///
    /// Returns true only for the registration that first fills both roles.
    pub fn register(&mut self, id: ControllerId, hand: Hand) -> bool {
        let role = self.role_for(hand);
        info!("Controller {} ({:?} hand) registered as {:?}", id, hand, role);

        let controller = TrackedController {
            id,
            hand,
            pose: None,
        };
        // A controller switching hands must not keep its old role
        self.release_other_role(id, role);
        *self.slot_mut(role) = Some(controller);

        if self.resolved {
            return false;
        }
        match self.bound() {
            Some(bound) => {
                self.resolved = true;
                for waiter in self.waiters.drain(..) {
                    // Receiver may have been dropped; nothing to do then
                    let _ = waiter.send(bound);
                }
                true
            }
            None => false,
        }
    }

    /// Record a fresh pose for a registered controller. Unknown ids are ignored.
    pub fn update_pose(&mut self, id: ControllerId, pose: Pose) -> bool {
        for controller in [&mut self.hand, &mut self.board].into_iter().flatten() {
            if controller.id == id {
                controller.pose = Some(pose);
                return true;
            }
        }
        debug!("Pose for unregistered controller {} dropped", id);
        false
    }

    pub fn controller(&self, role: ControllerRole) -> Option<&TrackedController> {
        match role {
            ControllerRole::Hand => self.hand.as_ref(),
            ControllerRole::Board => self.board.as_ref(),
        }
    }

    /// Current pose of whichever controller holds `role`
    pub fn pose(&self, role: ControllerRole) -> Option<Pose> {
        self.controller(role).and_then(|c| c.pose)
    }

    pub fn bound(&self) -> Option<BoundControllers> {
        match (&self.hand, &self.board) {
            (Some(hand), Some(board)) => Some(BoundControllers {
                hand: hand.id,
                board: board.id,
            }),
            _ => None,
        }
    }

    /// Resolves once, the first time both roles are filled
    ///
    /// Subscribing after that resolves immediately with the current
    /// assignment. Later re-registrations are not pushed to receivers; read
    /// the registry again for live state.
    pub fn await_both(&mut self) -> oneshot::Receiver<BoundControllers> {
        let (tx, rx) = oneshot::channel();
        match self.bound() {
            Some(bound) if self.resolved => {
                let _ = tx.send(bound);
            }
            _ => self.waiters.push(tx),
        }
        rx
    }

    fn slot_mut(&mut self, role: ControllerRole) -> &mut Option<TrackedController> {
        match role {
            ControllerRole::Hand => &mut self.hand,
            ControllerRole::Board => &mut self.board,
        }
    }

    fn release_other_role(&mut self, id: ControllerId, role: ControllerRole) {
        let other = match role {
            ControllerRole::Hand => &mut self.board,
            ControllerRole::Board => &mut self.hand,
        };
        if other.is_some_and(|c| c.id == id) {
            *other = None;
        }
    }
}
