//! # Metrical CLI
//!
//! Prints the quantity estimate for a form snapshot.
//!
//! The snapshot comes from a JSON file (`--snapshot`), from the local store
//! (`--store` / `--form`), or falls back to a built-in sample house. With
//! `--save` the snapshot is written back to the store.
//!
//! Set `RUST_LOG=debug` to see persistence and not-computable diagnostics.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use calc_core::calculations::Outcome;
use calc_core::errors::{CalcError, CalcResult};
use calc_core::store::{FileStore, FormPersistence};
use calc_core::{estimate, EstimateReport, EstimatorConfig, FormState};

#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(version)]
#[command(about = "Construction quantity estimate for a saved or supplied form snapshot")]
#[command(long_about = None)]
struct Cli {
    /// Form snapshot as JSON (overrides the store)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Store directory (overrides the config file)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Form identifier in the store (overrides the config file)
    #[arg(long)]
    form: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the snapshot back to the store
    #[arg(long)]
    save: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let mut config = match &cli.config {
        Some(path) => EstimatorConfig::load(path)?,
        None => EstimatorConfig::default(),
    };
    if let Some(dir) = cli.store.clone() {
        config.store_dir = dir;
    }
    if let Some(form) = cli.form.clone() {
        config.form_id = form;
    }

    let use_store = cli.store.is_some() || cli.form.is_some() || cli.config.is_some() || cli.save;
    let mut persistence = if use_store {
        let store = FileStore::open(&config.store_dir)?;
        Some(FormPersistence::<FileStore, FormState>::new(
            store,
            config.form_id.clone(),
            config.debounce(),
        )?)
    } else {
        None
    };

    // Loading also arms the store for the save below
    let stored = persistence.as_mut().map(|p| p.load());

    let state = match (&cli.snapshot, stored) {
        (Some(path), _) => {
            info!(path = %path.display(), "reading form snapshot");
            let json = std::fs::read_to_string(path)
                .map_err(|e| CalcError::store_error("read snapshot", path.display().to_string(), e.to_string()))?;
            serde_json::from_str::<FormState>(&json)?
        }
        (None, Some(stored)) => stored,
        (None, None) => {
            info!("no snapshot given, using the sample house");
            FormState::sample()
        }
    };

    let report = estimate(&state);
    print_report(&report);

    if cli.save {
        if let Some(p) = persistence.as_mut() {
            p.record_change(&state, Instant::now());
            if p.flush() {
                println!();
                println!("Saved snapshot '{}' to {}", p.form_id(), p.store().dir().display());
            } else {
                eprintln!("Snapshot was not saved (see log)");
            }
        }
    }

    Ok(())
}

fn print_report(report: &EstimateReport) {
    println!("═══════════════════════════════════════");
    println!("  QUANTITY ESTIMATE");
    println!("═══════════════════════════════════════");
    println!();

    println!("Concrete: {:.3} m³", report.concrete.total_volume_m3);
    for item in &report.concrete.work_items {
        match item {
            Outcome::Computed(w) => println!(
                "  {:<20} {:>8.3} m³  dosage {:<4} {:>4} bags",
                w.name, w.volume_m3, w.dosage, w.materials.cement_bags
            ),
            Outcome::NotComputable { error } => println!("  [not computable] {}", error),
        }
    }
    let totals = &report.concrete.total_materials;
    println!(
        "  Cement {:.0} kg ({} bags), sand {:.2} m³, gravel {:.2} m³, water {:.0} L",
        totals.cement_kg, totals.cement_bags, totals.sand_m3, totals.gravel_m3, totals.water_l
    );
    println!();

    match &report.masonry {
        Outcome::Computed(m) => {
            println!("Masonry: {:.2} m²", m.total_surface_m2);
            println!("  Blocks: {} ({:.2}/m²)", m.blocks_needed, m.blocks_per_m2);
            match &m.mortar.materials {
                Some(mat) => println!(
                    "  Mortar: {:.3} m³, cement {:.0} kg ({} bags), sand {:.3} m³",
                    m.mortar.volume_m3, mat.cement_kg, mat.cement_bags, mat.sand_m3
                ),
                None => println!("  Mortar: {:.3} m³ (no dosage)", m.mortar.volume_m3),
            }
        }
        Outcome::NotComputable { error } => println!("Masonry: [not computable] {}", error),
    }
    println!();

    match &report.plaster {
        Outcome::Computed(p) => println!(
            "Plaster: {:.2} m², {:.3} m³, cement {:.0} kg ({} bags), sand {:.3} m³",
            p.total_surface_m2, p.volume_m3, p.materials.cement_kg, p.materials.cement_bags, p.materials.sand_m3
        ),
        Outcome::NotComputable { error } => println!("Plaster: [not computable] {}", error),
    }

    match &report.waterproofing {
        Outcome::Computed(w) => println!(
            "Waterproofing: {:.2} m², {:.1} kg of product",
            w.total_surface_m2, w.product_kg
        ),
        Outcome::NotComputable { error } => println!("Waterproofing: [not computable] {}", error),
    }
    println!();

    println!("Steel: {:.2} kg", report.steel.total_weight_kg);
    for member in &report.steel.members {
        if let Outcome::NotComputable { error } = member {
            println!("  [not computable] {}", error);
        }
    }
    for (diameter, totals) in &report.steel.by_diameter {
        println!(
            "  HA{:<3} {:>8.2} m  {:>8.2} kg  {:>3} bars",
            diameter, totals.length_m, totals.weight_kg, totals.commercial_bars
        );
    }

    println!();
    println!("═══════════════════════════════════════");
    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(report) {
        println!("{}", json);
    }
}
