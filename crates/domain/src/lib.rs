#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod clock;
mod error;
mod exercise_log;
mod history;
mod name;
mod program;
mod service;
mod strength;
mod timer;

pub use catalog::*;
pub use clock::*;
pub use error::*;
pub use exercise_log::*;
pub use history::*;
pub use name::*;
pub use program::*;
pub use service::*;
pub use strength::*;
pub use timer::*;
