//! Render command - mount a template and replay interactions

use std::path::PathBuf;

use clap::Args;
use que::render::{load_data, read_file};
use que::stage::Store;
use que::{load_config, load_config_file, RenderError, Step};

#[derive(Args)]
pub struct RenderArgs {
    /// Template file
    pub template: PathBuf,

    /// JSON object with the initial fields
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Selector of the mount element (overrides the config)
    #[arg(short, long)]
    pub selector: Option<String>,

    /// Step applied after mounting, in order: `set:<field>=<json>`,
    /// `click:<selector>` or `call:<expression>`
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<Step>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<(), RenderError> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path),
        None => load_config(None),
    };
    if let Some(selector) = args.selector {
        config.selector = selector;
    }

    let template = read_file(&args.template)?;
    let data = match &args.data {
        Some(path) => load_data(path)?,
        None => Store::default(),
    };

    let html = que::render(&template, data, &config, &args.steps)?;
    println!("{html}");
    Ok(())
}
