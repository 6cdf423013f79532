// Session stage machine: uninitialized -> loading -> content ready -> VR ready
//
// Scene content and controllers arrive independently, so controllers may bind
// while content is still loading.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Uninitialized,
    Loading {
        controllers_bound: bool,
    },
    /// Scene nodes exist; keyboard locomotion works
    ContentReady,
    /// Scene nodes exist and both controllers are bound
    VrReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    BeginLoading,
    ContentLoaded,
    ControllersBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("Invalid stage transition: {event:?} while {from}")]
    InvalidTransition { from: Stage, event: StageEvent },
}

impl Stage {
    /// Apply an event, rejecting anything the current stage does not accept
    pub fn advance(self, event: StageEvent) -> Result<Stage, StageError> {
        let next = match (self, event) {
            (Stage::Uninitialized, StageEvent::BeginLoading) => Stage::Loading {
                controllers_bound: false,
            },
            (Stage::Uninitialized, StageEvent::ControllersBound) => Stage::Loading {
                controllers_bound: true,
            },
            (Stage::Loading { controllers_bound }, StageEvent::ContentLoaded) => {
                if controllers_bound {
                    Stage::VrReady
                } else {
                    Stage::ContentReady
                }
            }
            (Stage::Loading { .. }, StageEvent::ControllersBound) => Stage::Loading {
                controllers_bound: true,
            },
            (Stage::ContentReady, StageEvent::ControllersBound) => Stage::VrReady,
            (from, event) => return Err(StageError::InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// Whether scene nodes may be touched
    pub fn scene_ready(self) -> bool {
        matches!(self, Stage::ContentReady | Stage::VrReady)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Uninitialized => write!(f, "uninitialized"),
            Stage::Loading {
                controllers_bound: false,
            } => write!(f, "loading"),
            Stage::Loading {
                controllers_bound: true,
            } => write!(f, "loading (controllers bound)"),
            Stage::ContentReady => write!(f, "content ready"),
            Stage::VrReady => write!(f, "VR ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_then_controllers() {
        let stage = Stage::default()
            .advance(StageEvent::BeginLoading)
            .and_then(|s| s.advance(StageEvent::ContentLoaded))
            .unwrap();
        assert_eq!(stage, Stage::ContentReady);
        assert!(stage.scene_ready());
        assert_eq!(stage.advance(StageEvent::ControllersBound), Ok(Stage::VrReady));
    }

    #[test]
    fn test_controllers_before_content() {
        let stage = Stage::default()
            .advance(StageEvent::BeginLoading)
            .and_then(|s| s.advance(StageEvent::ControllersBound))
            .unwrap();
        assert!(!stage.scene_ready(), "content still loading");
        assert_eq!(stage.advance(StageEvent::ContentLoaded), Ok(Stage::VrReady));
    }

    #[test]
    fn test_controllers_before_loading_starts() {
        let stage = Stage::default()
            .advance(StageEvent::ControllersBound)
            .unwrap();
        assert_eq!(
            stage,
            Stage::Loading {
                controllers_bound: true
            }
        );
    }

    #[test]
    fn test_rejects_invalid_transitions() {
        let err = Stage::Uninitialized
            .advance(StageEvent::ContentLoaded)
            .unwrap_err();
        assert_eq!(
            err,
            StageError::InvalidTransition {
                from: Stage::Uninitialized,
                event: StageEvent::ContentLoaded
            }
        );
        assert!(Stage::VrReady.advance(StageEvent::BeginLoading).is_err());
        assert!(Stage::ContentReady.advance(StageEvent::ContentLoaded).is_err());
        assert!(Stage::VrReady.advance(StageEvent::ControllersBound).is_err());
    }

    #[test]
    fn test_only_content_stages_touch_scene() {
        assert!(!Stage::Uninitialized.scene_ready());
        assert!(
            !Stage::Loading {
                controllers_bound: true
            }
            .scene_ready()
        );
        assert!(Stage::ContentReady.scene_ready());
        assert!(Stage::VrReady.scene_ready());
    }
}
