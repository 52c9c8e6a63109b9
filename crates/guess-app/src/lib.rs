pub mod cli;
pub mod console;
pub mod logging;

pub use cli::{Cli, run};
pub use console::{ConsoleGame, GameEnd};
