use clap::Parser;
use xshell::cmd;

#[derive(Debug, clap::Args)]
struct BuildArgs {
    #[arg(long, short)]
    release: bool,
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    #[command(flatten)]
    build_args: BuildArgs,

    /// Configuration passed to vidshelf-server
    #[arg(long, short, default_value = "vidshelf-server/config.example.toml")]
    config: String,

    /// Subcommand of vidshelf-server to run (serve, checkin or playlist)
    #[arg(default_value = "serve")]
    command: String,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    Build(BuildArgs),
    Run(RunArgs),
}

#[derive(Debug, clap::Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

fn build(args: &BuildArgs) -> anyhow::Result<()> {
    let release = args.release.then_some("--release");

    // The server embeds the site, so trunk has to run first
    let shell = xshell::Shell::new()?;
    {
        let _dir = shell.push_dir("vidshelf-site");
        cmd!(shell, "trunk build {release...}").run()?;
    }

    cmd!(shell, "cargo build {release...} --bin vidshelf-server").run()?;

    Ok(())
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    build(&args.build_args)?;

    let release = args.build_args.release.then_some("--release");
    let config = &args.config;
    let command = &args.command;
    let shell = xshell::Shell::new()?;
    cmd!(
        shell,
        "cargo run {release...} --bin vidshelf-server -- --config {config} {command}"
    )
    .run()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    match &args.command {
        Command::Build(args) => build(args)?,
        Command::Run(args) => run(args)?,
    }

    Ok(())
}
