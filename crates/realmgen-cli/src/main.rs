//! Command-line front end: build settings from a config file or a saved
//! template, generate a world, then report, preview, export or save it.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use realmgen_core::names::markov::DEFAULT_ORDER;
use realmgen_core::{GenerationSettings, NameSynthesizer, TemplateStore, TerrainTemplate, World, WorldGenerator};

#[derive(Parser, Debug)]
#[command(name = "realmgen", about = "Deterministic fantasy world generator")]
struct Args {
    /// JSON configuration file with generation settings.
    #[arg(short, long, conflicts_with = "template")]
    config: Option<PathBuf>,

    /// Name of a saved terrain template to generate from.
    #[arg(short, long)]
    template: Option<String>,

    /// Directory holding terrain templates.
    #[arg(long, default_value = "templates")]
    templates_dir: PathBuf,

    /// Override the seed from the configuration or template.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory of name corpora (`*.txt`) replacing the built-in ones.
    #[arg(long)]
    names_dir: Option<PathBuf>,

    /// Save the resolved settings (including the seed) as a template.
    #[arg(long)]
    save_template: Option<String>,

    /// Description stored with `--save-template`.
    #[arg(long, requires = "save_template")]
    description: Option<String>,

    /// Write the render snapshot as JSON to this file.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print a glyph map of the given size, e.g. `80x40`.
    #[arg(long, value_parser = parse_preview)]
    preview: Option<(usize, usize)>,

    /// List the templates in the templates directory and exit.
    #[arg(long)]
    list_templates: bool,
}

fn parse_preview(s: &str) -> Result<(usize, usize), String> {
    let (cols, rows) = s.split_once('x').ok_or_else(|| format!("expected COLSxROWS, got '{s}'"))?;
    let cols = cols.trim().parse().map_err(|e| format!("bad column count: {e}"))?;
    let rows = rows.trim().parse().map_err(|e| format!("bad row count: {e}"))?;
    Ok((cols, rows))
}

fn load_settings(args: &Args, store: Option<&TemplateStore>) -> Result<GenerationSettings> {
    let mut settings = if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        GenerationSettings::from_value(&value)
            .with_context(|| format!("invalid settings in {}", path.display()))?
    } else if let Some(name) = &args.template {
        let Some(store) = store else {
            bail!("template store unavailable");
        };
        store.get(name)?.settings.clone()
    } else {
        GenerationSettings::default()
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    Ok(settings)
}

fn print_summary(world: &World) {
    let s = world.summary();
    println!("World {}x{}  seed {}", s.width, s.height, s.seed.map_or("?".to_string(), |x| x.to_string()));
    println!(
        "  land {:.1}%  water {:.1}%  mountain {:.1}%",
        s.land_fraction * 100.0,
        s.water_fraction * 100.0,
        s.mountain_fraction * 100.0
    );
    println!("  biomes:");
    for (biome, count) in &s.biomes {
        println!("    {} {:<22} {count}", biome.glyph(), biome.name());
    }
    println!("  settlements:");
    for settlement in world.settlements() {
        println!(
            "    {} {:<9} {:<16} at ({:>3}, {:>3})  pop {}",
            settlement.kind.glyph(),
            settlement.kind.key(),
            settlement.name,
            settlement.position.0,
            settlement.position.1,
            settlement.population
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let needs_store = args.template.is_some() || args.save_template.is_some() || args.list_templates;
    let mut store = if needs_store {
        Some(
            TemplateStore::open(&args.templates_dir)
                .with_context(|| format!("opening templates in {}", args.templates_dir.display()))?,
        )
    } else {
        None
    };

    if args.list_templates {
        if let Some(store) = &store {
            for (name, description) in store.list() {
                println!("{name:<24} {description}");
            }
        }
        return Ok(());
    }

    let settings = load_settings(&args, store.as_ref())?;

    let names = match &args.names_dir {
        Some(dir) => NameSynthesizer::from_dir(dir, DEFAULT_ORDER)
            .with_context(|| format!("loading name corpora from {}", dir.display()))?,
        None => NameSynthesizer::builtin(),
    };
    let world = WorldGenerator::with_names(names).generate(&settings)?;

    print_summary(&world);

    if let Some((cols, rows)) = args.preview {
        println!("{}", world.preview(cols, rows));
    }

    if let Some(path) = &args.export {
        let json = serde_json::to_string(&world.snapshot()).context("serialising snapshot")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("exported snapshot to {}", path.display());
    }

    if let (Some(name), Some(store)) = (&args.save_template, store.as_mut()) {
        let template = TerrainTemplate::new(
            name.clone(),
            args.description.clone().unwrap_or_default(),
            world.settings().clone(),
        );
        store.save(template)?;
    }

    Ok(())
}
