use clap::{Parser, Subcommand, ValueEnum};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use mensur_acoustics::{AirProperties, Conditions, FreqSweep, RadiationKind, radiation_impedance};
use mensur_graph::{Graph, Segment};
use mensur_parser::read_graph;
use mensur_solver::{
    pressure_profile, propagate_from_head, propagate_from_tail, run_sweep, solve,
};

/// Reference pressure for dB SPL [Pa].
const P_REF: f64 = 2.0e-5;

#[derive(Parser)]
#[command(name = "mensur")]
#[command(about = "Mensur CLI - air column impedance and pressure tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the input impedance over a frequency grid
    Impedance {
        /// Path to the mensur file
        file: PathBuf,
        /// Minimum frequency in Hz
        #[arg(short = 'm', long, default_value_t = 0.0)]
        min_freq: f64,
        /// Maximum frequency in Hz
        #[arg(short = 'M', long, default_value_t = 2000.0)]
        max_freq: f64,
        /// Frequency step in Hz
        #[arg(short = 's', long, default_value_t = 2.5)]
        step_freq: f64,
        /// Air temperature in celsius
        #[arg(short = 't', long, default_value_t = 24.0)]
        temperature: f64,
        /// Open-end radiation model (PIPE, BAFFLE or NONE)
        #[arg(short = 'R', long, default_value = "PIPE")]
        radiation: RadiationKind,
        /// Output file; "-" is stdout (default: input with .imp extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output table format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Reconstruct the pressure distribution at one frequency
    Pressure {
        /// Path to the mensur file
        file: PathBuf,
        /// Frequency to solve in Hz
        #[arg(short = 'f', long, default_value_t = 440.0)]
        freq: f64,
        /// Drive level at the starting end in dB SPL
        #[arg(short = 'p', long, default_value_t = 60.0)]
        pressure: f64,
        /// Drive the open end instead of the mouthpiece
        #[arg(short = 'T', long)]
        from_tail: bool,
        /// Slice step for the profile in mm
        #[arg(short = 's', long, default_value_t = 1.0)]
        step: f64,
        /// Output file; "-" is stdout (default: input with .prs extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the bore table along the dominant path
    Print {
        /// Path to the mensur file
        file: PathBuf,
        /// Print cumulative length and diameter pairs instead
        #[arg(short, long)]
        convert: bool,
    },
    /// Tabulate the open-end radiation impedance on its own
    Radiation {
        /// Opening diameter in meters
        #[arg(short, long, default_value_t = 0.25)]
        diameter: f64,
        /// Minimum frequency in Hz
        #[arg(short = 'm', long, default_value_t = 0.0)]
        min_freq: f64,
        /// Maximum frequency in Hz
        #[arg(short = 'M', long, default_value_t = 2000.0)]
        max_freq: f64,
        /// Frequency step in Hz
        #[arg(short = 's', long, default_value_t = 2.5)]
        step_freq: f64,
        /// Air temperature in celsius
        #[arg(short = 't', long, default_value_t = 24.0)]
        temperature: f64,
        /// Radiation model (PIPE, BAFFLE or NONE)
        #[arg(short = 'R', long, default_value = "PIPE")]
        radiation: RadiationKind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    /// Comma-separated table
    Csv,
    /// JSON array of sweep points
    Json,
}

/// Errors surfaced by the command-line driver.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] mensur_parser::ParseError),

    #[error("Graph error: {0}")]
    Graph(#[from] mensur_graph::GraphError),

    #[error("Solver error: {0}")]
    Solver(#[from] mensur_solver::SolverError),

    #[error("Configuration error: {0}")]
    Config(#[from] mensur_acoustics::AcousticsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Impedance {
            file,
            min_freq,
            max_freq,
            step_freq,
            temperature,
            radiation,
            output,
            format,
        } => {
            let sweep = FreqSweep::new(min_freq, max_freq, step_freq)?;
            let cond = Conditions::new(AirProperties::from_celsius(temperature)?, radiation);
            cmd_impedance(&file, &sweep, &cond, output.as_deref(), format)
        }
        Commands::Pressure {
            file,
            freq,
            pressure,
            from_tail,
            step,
            output,
        } => cmd_pressure(&file, freq, pressure, from_tail, step, output.as_deref()),
        Commands::Print { file, convert } => cmd_print(&file, convert),
        Commands::Radiation {
            diameter,
            min_freq,
            max_freq,
            step_freq,
            temperature,
            radiation,
        } => {
            let sweep = FreqSweep::new(min_freq, max_freq, step_freq)?;
            let air = AirProperties::from_celsius(temperature)?;
            cmd_radiation(diameter, &sweep, &air, radiation)
        }
    }
}

fn cmd_impedance(
    file: &Path,
    sweep: &FreqSweep,
    cond: &Conditions,
    output: Option<&Path>,
    format: Format,
) -> CliResult<()> {
    let graph = read_graph(file)?;
    debug!(segments = graph.len(), "bore loaded");

    let points = run_sweep(&graph, sweep, cond)?;

    let body = match format {
        Format::Csv => {
            let mut csv = String::from("freq,imp.real,imp.imag,imp.mag\n");
            for pt in &points {
                csv.push_str(&format!(
                    "{},{},{},{}\n",
                    pt.freq_hz, pt.re, pt.im, pt.mag_db
                ));
            }
            csv
        }
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&points)?;
            json.push('\n');
            json
        }
    };

    match resolve_output(output, file, "imp") {
        Some(path) => {
            fs::write(&path, &body)?;
            println!("✓ Wrote {} points to {}", points.len(), path.display());
        }
        None => print!("{}", body),
    }
    Ok(())
}

fn cmd_pressure(
    file: &Path,
    freq: f64,
    level_db: f64,
    from_tail: bool,
    step_mm: f64,
    output: Option<&Path>,
) -> CliResult<()> {
    let graph = read_graph(file)?.subdivided(step_mm / 1000.0)?;
    debug!(segments = graph.len(), "bore loaded and sliced");

    // Fixed working conditions: room-temperature air, unflanged open end.
    let cond = Conditions::new(AirProperties::from_celsius(24.0)?, RadiationKind::Pipe);
    let omega = 2.0 * PI * freq;
    let mut sol = solve(&graph, omega, &cond)?;

    let endp = P_REF * 10.0_f64.powf(level_db / 20.0);
    if from_tail {
        propagate_from_tail(&graph, &mut sol, &cond, endp)?;
    } else {
        propagate_from_head(&graph, &mut sol, endp)?;
    }
    let profile = pressure_profile(&graph, &sol)?;

    let mut table = format!(
        "#{}, freq: {}(Hz), p: {}(dBSPL), from_tail: {}\n",
        file.display(),
        freq,
        level_db,
        from_tail
    );
    table.push_str("x,p.real,p.imag,p.mag\n");
    for pt in &profile {
        table.push_str(&format!(
            "{},{},{},{}\n",
            pt.x,
            pt.p.re,
            pt.p.im,
            spl_db(pt.p.norm())
        ));
    }

    match resolve_output(output, file, "prs") {
        Some(path) => {
            fs::write(&path, &table)?;
            println!("✓ Wrote {} samples to {}", profile.len(), path.display());
        }
        None => print!("{}", table),
    }
    Ok(())
}

fn cmd_print(file: &Path, convert: bool) -> CliResult<()> {
    let graph = read_graph(file)?;

    if convert {
        walk_path(&graph, |seg| {
            if seg.length > 0.0 {
                println!("{},{}", seg.position, seg.front_dia);
                println!("{},{}", seg.position + seg.length, seg.back_dia);
            }
        });
    } else {
        println!("# {}", file.display());
        walk_path(&graph, |seg| {
            println!(
                "{},{},{},{}",
                seg.front_dia, seg.back_dia, seg.length, seg.group
            );
        });
    }
    Ok(())
}

fn cmd_radiation(
    diameter: f64,
    sweep: &FreqSweep,
    air: &AirProperties,
    kind: RadiationKind,
) -> CliResult<()> {
    println!("freq,rad.real,rad.imag");
    for freq in sweep.points() {
        let z = radiation_impedance(2.0 * PI * freq, diameter, air, kind);
        println!("{},{},{}", freq, z.re, z.im);
    }
    Ok(())
}

/// Visit every segment along the dominant path, head to tail.
fn walk_path(graph: &Graph, mut visit: impl FnMut(&Segment)) {
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let Some(seg) = graph.segment(id) else { break };
        visit(seg);
        cur = graph.path_next(id);
    }
}

/// Resolve the output target: `-` is stdout (None), an absent flag is the
/// input path with its extension swapped.
fn resolve_output(output: Option<&Path>, input: &Path, ext: &str) -> Option<PathBuf> {
    match output {
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => Some(path.to_path_buf()),
        None => Some(input.with_extension(ext)),
    }
}

/// Sound pressure level of an amplitude, zero at silence.
fn spl_db(amplitude: f64) -> f64 {
    if amplitude == 0.0 {
        0.0
    } else {
        20.0 * (amplitude / P_REF).log10()
    }
}
