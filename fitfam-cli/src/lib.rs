// Library exports for the FitFam CLI
// This allows testing of internal modules

pub mod commands;
pub mod ui;
