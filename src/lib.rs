// VR skateboard locomotion runtime
//
// The locomotion core (calibration, speed integration, per-frame loop) lives in
// `locomotion`; `scene` is the in-process node graph it mutates; `runtime`
// drives both at a fixed rate over zenoh.

pub mod config;
pub mod locomotion;
pub mod messages;
pub mod runtime;
pub mod scene;
