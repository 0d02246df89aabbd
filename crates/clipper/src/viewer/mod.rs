// Author: Dustin Pilgrim
// License: MIT

mod app;
mod canvas;
mod keymap;
mod outputs;
mod render;
mod run;
mod shm;
mod surfaces;

pub use run::run_viewer;
