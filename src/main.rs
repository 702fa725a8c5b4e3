use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod ext;
mod github;
mod links;
mod model;
mod pipeline;
mod qualify;
mod render;
mod summary;
mod util;
mod window;

use crate::cli::{normalize, Cli};

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(ExitCode::SUCCESS);
  }

  util::init_logging();

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: run the command against stdout
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  let code = commands::run(&cfg, &mut out)?;

  Ok(ExitCode::from(code))
}
