//! Inspect command - show each stage of the expression pipeline

use clap::Args;
use que::RenderError;

#[derive(Args)]
pub struct InspectArgs {
    /// Directive expression, e.g. "!visible && count > 0"
    pub expression: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs) -> Result<(), RenderError> {
    let inspection = que::inspect(&args.expression);
    if args.json {
        let json = serde_json::to_string_pretty(&inspection).map_err(|source| RenderError::Json {
            context: "inspection".to_string(),
            source,
        })?;
        println!("{json}");
    } else {
        print!("{inspection}");
    }
    Ok(())
}
