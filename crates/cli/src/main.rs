use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexsim::{timed, Simulation, SimulationConfig};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for running agent simulations on a hex grid.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexsim")]
struct Opt {
    /// Path to a config file that defines the simulation. Supported formats:
    /// JSON, TOML. If omitted, the default config is used (with a random
    /// seed)
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// If given, the simulation output will be saved to this directory. The
    /// exact files that appear in the directory are defined by the output
    /// formats. See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the simulation in. Supported formats:
    ///
    /// cfg - The full config object used for the simulation, in TOML format.
    ///   Loading this file back with `--config` reproduces the same run
    ///
    /// json - JSON snapshot of the map after the final tick, including every
    ///   location and the agents on it
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use during the simulation. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the simulation's full config in a human-readable file
    Cfg,
    /// Export a snapshot of the final map state as JSON
    Json,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Cfg => "toml",
            Self::Json => "json",
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<SimulationConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Generate an output form of the simulation in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    simulation: &Simulation,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        simulation: &Simulation,
    ) -> anyhow::Result<Vec<u8>> {
        let output = match output_format {
            OutputFormat::Cfg => toml::to_string_pretty(simulation.config())
                .context("error serializing config")?,
            OutputFormat::Json => simulation
                .snapshot()
                .to_json()
                .context("error serializing snapshot")?,
        };
        Ok(output.into_bytes())
    }

    let output_file_path = output_dir
        .join("simulation")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, simulation)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => SimulationConfig::default(),
    };
    let mut simulation = Simulation::new(config)?;
    simulation.run().context("error running simulation")?;
    info!(
        "Finished {} ticks with {} agents",
        simulation.tick(),
        simulation.map().num_agents()
    );

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(&output_dir)?;

        for output_format in opt.output_formats {
            gen_output(&output_dir, output_format, &simulation)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
