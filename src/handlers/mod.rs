// handlers/mod.rs - handlers split by access tier
//
// Public (always reachable, or reachable through the configured public path
// list) and Protected (the access gate redirects anonymous callers to /login).
pub mod public;
pub mod protected;

pub use public::*;
pub use protected::*;
