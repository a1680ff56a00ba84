use anyhow::Result;
use srs_core::tools;

use crate::app::App;

pub fn run(app: &App, deck: Option<&str>) -> Result<()> {
    let response = tools::get_due_cards(&app.config, deck)?;

    if app.json() {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for warning in &response.warnings {
            eprintln!("Warning: {warning}");
        }
        println!("{}", response.due_count);
    }

    Ok(())
}
