#![deny(warnings)]
pub mod belief;
pub mod dataset;
pub mod game;
pub mod model;
pub mod question;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "guess"
    }

    pub const fn tagline() -> &'static str {
        "Player Guessing Engine"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
