pub mod args;
pub mod commands;
pub mod input;
pub mod render;
