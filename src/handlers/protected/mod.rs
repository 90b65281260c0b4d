// handlers/protected/mod.rs - handlers behind the access gate
//
// The gate only lets a request through here once it carries a valid session,
// and it inserts the `AuthUser` extension before the handler runs.

pub mod dashboard;
pub mod discovery;

pub use dashboard::dashboard;
pub use discovery::call_peer;
