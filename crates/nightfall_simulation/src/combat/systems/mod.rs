//! Combat systems (FixedUpdate)

pub mod damage;
pub mod dot;
pub mod target;


pub use damage::*;
pub use dot::*;
pub use target::*;
