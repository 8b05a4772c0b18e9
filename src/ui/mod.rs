//! egui rendering. Widgets only read from and call handlers on [`crate::state::Session`].

pub mod panels;
pub mod tables;
