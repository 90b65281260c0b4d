// handlers/public/mod.rs - handlers the access gate never redirects
//
// `/` and `/login` are open unconditionally. `/api/info`, `/register` and
// `/health` are open through the default public path list and can be gated
// again by narrowing GATE_PUBLIC_PATHS. `/logout` stays gated.

pub mod home;
pub mod info;
pub mod login;
pub mod register;

pub use home::{health, home};
pub use info::info_get;
pub use login::{login_page, login_post, logout_post};
pub use register::register_post;
