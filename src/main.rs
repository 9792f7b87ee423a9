use clap::{Parser, Subcommand};
use initials_avatar::font::FontSource;
use initials_avatar::initials::{RandomInitials, take_initials};
use initials_avatar::{CacheMode, Generator, all_initials, bulk, config, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "initials-avatar")]
#[command(about = "Deterministic initials avatars")]
#[command(long_about = "\
Deterministic initials avatars

Renders initials (conventionally two uppercase letters) into a PNG: a solid
background derived from the letters, with the letters drawn in bold white.
The same initials always produce the same bytes.

Examples:

  initials-avatar single AB out/AB.png
  initials-avatar all avatars/
  initials-avatar sample samples/ --count 20 --seed 7

Run 'initials-avatar gen-config' to print a documented avatar.toml.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font file to render with, overriding config and the embedded font
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Disable the in-memory avatar cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one avatar to a file
    Single {
        /// Initials to render
        initials: String,
        /// Output PNG path (parent directories are created)
        output: PathBuf,
    },
    /// Render all 676 two-letter avatars (AA.png … ZZ.png) into a directory
    All {
        /// Output directory (created if missing)
        output_dir: PathBuf,
    },
    /// Render a reproducible random sample of two-letter avatars
    Sample {
        /// Output directory (created if missing)
        output_dir: PathBuf,
        /// Number of initials to draw
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// RNG seed; the same seed draws the same initials
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a stock avatar.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let avatar_config = config::load_config(cli.config.as_deref())?;
    let generator = build_generator(&avatar_config, cli.font.as_deref(), cli.no_cache)?;

    match cli.command {
        Command::Single {
            initials,
            output: path,
        } => {
            let avatar = bulk::write_single(&generator, &initials, &path)?;
            output::print_single_output(&initials, &path, avatar.len());
        }
        Command::All { output_dir } => {
            init_thread_pool(&avatar_config.processing);
            run_bulk(&generator, &all_initials(), &output_dir)?;
        }
        Command::Sample {
            output_dir,
            count,
            seed,
        } => {
            init_thread_pool(&avatar_config.processing);
            let keys = take_initials(&mut RandomInitials::seeded(seed), count);
            run_bulk(&generator, &keys, &output_dir)?;
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Resolve the font (flag → config → embedded) and build the generator.
fn build_generator(
    avatar_config: &config::AvatarConfig,
    font_flag: Option<&Path>,
    no_cache: bool,
) -> Result<Generator, Box<dyn std::error::Error>> {
    let font_path = font_flag.or(avatar_config.font.path.as_deref());
    let font = FontSource::from_path(font_path).load()?;
    let mut options = avatar_config.to_options(font);
    if no_cache {
        options.cache = CacheMode::Disabled;
    }
    Ok(Generator::new(options)?)
}

/// Write `keys` into `output_dir`, streaming progress lines from a printer
/// thread.
fn run_bulk(
    generator: &Generator,
    keys: &[String],
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_bulk_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = bulk::generate_all(generator, keys, output_dir, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    output::print_bulk_summary(&result?);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        // Only fails if a global pool already exists; keep using that one.
        .ok();
}
