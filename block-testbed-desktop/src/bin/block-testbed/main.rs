//! Binary for the block-testbed headless renderer.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use std::time::Instant;

use anyhow::Context as _;
use clap::Parser as _;

use block_testbed_desktop::logging;
use block_testbed_desktop::record::{self, RecordOptions, Step};

mod command_options;
use command_options::TestbedArgs;

static TITLE: &str = "block-testbed";

fn main() -> Result<(), anyhow::Error> {
    let options = TestbedArgs::parse();

    logging::install(&options.logging)?;

    let mut settings = options.settings.clone().build_settings()?;
    options.apply_overrides(&mut settings);

    let mut steps: Vec<Step> = match &options.script {
        Some(path) => record::parse_script(
            &std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script file {}", path.display()))?,
        ),
        None => Vec::new(),
    };
    steps.extend(record::parse_steps(options.steps.iter().map(String::as_str)));

    log::debug!("starting with {settings:?} and {} script steps", steps.len());
    let start_time = Instant::now();
    let frames = record::record_main(
        &settings,
        &steps,
        &RecordOptions {
            output_dir: options.output_dir.clone(),
            ..RecordOptions::default()
        },
    )?;
    let elapsed = start_time.elapsed();

    let render_time: std::time::Duration = frames.iter().map(|info| info.render_time).sum();
    eprintln!(
        "{TITLE}: drew {n} frames in {elapsed:.3} s ({render:.3} s rendering)",
        n = frames.len(),
        elapsed = elapsed.as_secs_f32(),
        render = render_time.as_secs_f32(),
    );
    if let Some(dir) = &options.output_dir {
        eprintln!("Wrote frames to {}", dir.display());
    }
    Ok(())
}
