use std::{io, panic};

use color_eyre::eyre::Result;
use folio::{
  cli::{Cli, Commands},
  commands::{self, render::RenderArgs},
};
use log::{LevelFilter, debug};

fn main() -> Result<()> {
  install_hooks()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Init writes the config file, so it must not require one to load
  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return commands::init::run(output, format, *force);
  }

  let mut config = commands::load_config(&cli)?;
  let mut stdout = io::stdout().lock();

  match cli.command {
    Commands::Render {
      inputs,
      output_dir,
      format,
      no_highlight,
      theme,
    } => {
      let args = RenderArgs {
        inputs,
        output_dir,
        format,
        no_highlight,
        theme,
      };
      args.apply_to(&mut config)?;
      commands::render::run(&config, &args.inputs, &mut stdout)
    },
    Commands::Outline { input, json } => {
      commands::outline::run(&config, &input, json, &mut stdout)
    },
    Commands::Css { theme } => {
      commands::css::run(&config, theme.as_deref(), &mut stdout)
    },
    Commands::Init { .. } => Ok(()),
  }
}

/// Install color-eyre's report hooks.
///
/// Panics raised while the render pipeline is recovering from them (a broken
/// highlighter, for example) are already logged as warnings, so they only get
/// a debug line here instead of a full crash report.
fn install_hooks() -> Result<()> {
  let (panic_hook, eyre_hook) =
    color_eyre::config::HookBuilder::default().try_into_hooks()?;
  eyre_hook.install()?;

  panic::set_hook(Box::new(move |info| {
    if folio_render::is_recovering_panics() {
      debug!("Recovered from panic: {info}");
    } else {
      #[allow(clippy::print_stderr, reason = "Crash reports go to stderr")]
      {
        eprintln!("{}", panic_hook.panic_report(info));
      }
    }
  }));

  Ok(())
}
