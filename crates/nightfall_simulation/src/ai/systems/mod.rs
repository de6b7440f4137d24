//! AI systems (FSM, locomotion intent, attack, presentation)

mod fsm;
mod movement;
mod presentation;


// Re-export all systems
pub use fsm::*;
pub use movement::*;
pub use presentation::*;
