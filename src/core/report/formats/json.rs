//! JSON report generator

use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;

/// Writes the plan summary as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl ReportGenerator for JsonReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(ctx.summary)?)
    }
}
