mod alphas;
mod helpers;
mod info;
mod subgrids;
mod uncert;
mod xfxq2;

use anyhow::Result;
use clap::Parser;
use enum_dispatch::enum_dispatch;
use git_version::git_version;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
pub struct GlobalConfiguration {
    /// Forces negative PDF values to zero.
    #[arg(long)]
    pub force_positive: bool,
    /// Print debugging messages while searching and loading sets.
    #[arg(long, short)]
    pub verbose: bool,
}

impl GlobalConfiguration {
    /// Install the logger writing to standard error. `RUST_LOG` takes precedence over
    /// `--verbose`.
    pub fn init_logging(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}

#[enum_dispatch]
pub trait Subcommand {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode>;
}

#[enum_dispatch(Subcommand)]
#[derive(Parser)]
pub enum SubcommandEnum {
    Alphas(alphas::Opts),
    Info(info::Opts),
    Subgrids(subgrids::Opts),
    Uncert(uncert::Opts),
    Xfxq2(xfxq2::Opts),
}

#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    author,
    about,
    disable_help_subcommand = true,
    name = "pdfgrid",
    version = git_version!(
        args = ["--always", "--dirty", "--long", "--tags"],
        cargo_prefix = "",
        fallback = "unknown"
    )
)]
pub struct Opts {
    #[command(flatten)]
    pub configuration: GlobalConfiguration,
    #[command(subcommand)]
    pub subcommand: SubcommandEnum,
}
