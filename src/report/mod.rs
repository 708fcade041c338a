//! Build report generation

pub mod generator;

use crate::models::BuildResult;

pub fn generate_report(result: &BuildResult) -> String {
    generator::generate_markdown_report(result)
}
