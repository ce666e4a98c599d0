//! Command handlers for the qualcode CLI.

mod code;
mod legend;

pub use code::CodeCommand;
pub use legend::LegendCommand;
