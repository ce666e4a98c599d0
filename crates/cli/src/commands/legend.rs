//! Legend command handler.

use clap::Args;
use qualcode_coding::Category;
use qualcode_core::AppResult;

/// Print the coding legend (categories and colors)
#[derive(Args, Debug)]
pub struct LegendCommand {}

impl LegendCommand {
    /// Execute the legend command.
    pub fn execute(&self) -> AppResult<()> {
        println!("Coding legend:");
        for category in Category::ALL {
            println!(
                "  {}. {} (#{}) – {}",
                category.code(),
                category.title(),
                category.color(),
                category.definition()
            );
        }
        Ok(())
    }
}
