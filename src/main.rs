//! Ovation Putt-Solver CLI.
//!
//! Kommandozeilen-Frontend für den Putt-Löser: rechnet einzelne Putts
//! auf DTM-Grids, zeigt Grid-Metadaten und listet Registry-Datensätze.
//! Die eigentliche DLL-Schnittstelle liegt in `ovation_putt_ffi`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::DVec2;

use ovation_putt_solver::{
    parse_green_grid_file, render_instruction, solve_single, DatasetRegistry, PuttRequest, Stimp,
    SolverOptions,
};

#[derive(Parser)]
#[command(name = "ovation-putt")]
#[command(about = "Putt-Loeser fuer Ovation-Green-DTMs")]
#[command(version)]
struct Cli {
    /// Debug-Ausgaben aktivieren
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Löst einen einzelnen Putt
    Solve {
        /// Pfad zur DTM-Grid-Datei
        #[arg(long)]
        dtm: Option<PathBuf>,

        /// Pfad zur Registry (datasets.json), alternativ zu --dtm
        #[arg(long, requires = "dtm_id")]
        registry: Option<PathBuf>,

        /// DTM-ID innerhalb der Registry
        #[arg(long)]
        dtm_id: Option<String>,

        /// Ballposition X in Green-lokalen Metern
        #[arg(long)]
        ball_x: f64,

        /// Ballposition Y in Green-lokalen Metern
        #[arg(long)]
        ball_y: f64,

        /// Cup-Position X in Green-lokalen Metern
        #[arg(long)]
        cup_x: f64,

        /// Cup-Position Y in Green-lokalen Metern
        #[arg(long)]
        cup_y: f64,

        /// Stimp-Rating in Fuß (Dezimalstellen erlaubt, z.B. 10.5)
        #[arg(long, default_value_t = 10.0)]
        stimp: f64,

        /// Lösung samt Trajektorie als JSON in diese Datei schreiben
        #[arg(long)]
        plot_out: Option<PathBuf>,
    },

    /// Zeigt die Metadaten einer DTM-Grid-Datei
    Info {
        /// Pfad zur DTM-Grid-Datei
        dtm: PathBuf,
    },

    /// Listet alle Datensätze einer Registry
    Datasets {
        /// Pfad zur Registry (datasets.json)
        registry: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logger initialisieren
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Solve {
            dtm,
            registry,
            dtm_id,
            ball_x,
            ball_y,
            cup_x,
            cup_y,
            stimp,
            plot_out,
        } => {
            let grid_path = resolve_grid_path(dtm, registry, dtm_id)?;
            run_solve(
                &grid_path,
                DVec2::new(ball_x, ball_y),
                DVec2::new(cup_x, cup_y),
                stimp,
                plot_out.as_deref(),
            )
        }
        Commands::Info { dtm } => run_info(&dtm),
        Commands::Datasets { registry } => run_datasets(&registry),
    }
}

/// Grid-Pfad aus `--dtm` oder Registry + DTM-ID ermitteln.
fn resolve_grid_path(
    dtm: Option<PathBuf>,
    registry: Option<PathBuf>,
    dtm_id: Option<String>,
) -> Result<PathBuf> {
    if let Some(path) = dtm {
        return Ok(path);
    }
    let (Some(registry_path), Some(id)) = (registry, dtm_id) else {
        bail!("Entweder --dtm oder --registry mit --dtm-id angeben");
    };
    let registry = DatasetRegistry::load(&registry_path)?;
    registry.resolve_grid_path(&id)
}

fn run_solve(
    grid_path: &std::path::Path,
    ball: DVec2,
    cup: DVec2,
    stimp_ft: f64,
    plot_out: Option<&std::path::Path>,
) -> Result<()> {
    let green = parse_green_grid_file(grid_path)?;

    // Stimp wie im DLL-Aufruf in Fuß + Zoll zerlegen
    let feet = stimp_ft.trunc();
    let inches = stimp_ft.fract() * 12.0;
    let stimp = Stimp::new(feet, inches)?;

    let options = SolverOptions::load_from_file(&SolverOptions::config_path());
    let request = PuttRequest { ball, cup, stimp };
    let solution = solve_single(&green, &request, &options)?;

    println!("{}", render_instruction(&solution));
    println!(
        "  Puttlaenge: {:.2} m | Break: {:.2} m | Tempo: {:.2} m/s | {} Laeufe",
        solution.putt_length_m,
        solution.break_m,
        solution.initial_speed_mps,
        solution.attempts
    );

    if let Some(out) = plot_out {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(out, json)
            .with_context(|| format!("Plot-Datei nicht schreibbar: {}", out.display()))?;
        log::info!("Loesung geschrieben nach: {}", out.display());
    }
    Ok(())
}

fn run_info(grid_path: &std::path::Path) -> Result<()> {
    let green = parse_green_grid_file(grid_path)?;
    let meta = green.metadata();
    let (width_m, depth_m) = meta.green_size_m();

    println!("DTM: {}", grid_path.display());
    println!("  Raster:     {} x {} Zellen", meta.rows, meta.cols);
    println!("  Abstand:    {:.2} m", meta.spacing_m);
    println!("  Ausdehnung: {:.1} m x {:.1} m", width_m, depth_m);
    println!(
        "  Abdeckung:  {:.1}% ({} Zellen mit Daten)",
        meta.data_coverage_pct, meta.data_cells
    );
    if let (Some(min), Some(max)) = (meta.elevation_min, meta.elevation_max) {
        println!("  Elevation:  {:.3} m bis {:.3} m", min, max);
    }
    Ok(())
}

fn run_datasets(registry_path: &std::path::Path) -> Result<()> {
    let registry = DatasetRegistry::load(registry_path)?;
    for entry in registry.datasets() {
        println!(
            "{}  (Kurs {}, Loch {})  {}",
            entry.dtm_id, entry.course_id, entry.hole_id, entry.grid_path
        );
    }
    Ok(())
}
