pub mod launcher;
pub mod runner;
pub mod state;
