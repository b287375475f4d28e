//! Interactive layer - pointer gestures, hit-testing and the connection session

pub mod session;

pub use hit_test::{HitTarget, HitTester, RadiusHitTester};
pub use session::{ConnectionSession, GestureOutcome, SessionState, DRAG_THRESHOLD};
