pub mod gate;
pub mod response;

pub use gate::{access_gate_middleware, redirect_to_login, AccessDecision, AccessGate, AccessState, AuthUser};
pub use response::{ApiResponse, ApiResult};
