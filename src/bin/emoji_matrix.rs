use clap::Parser;
use std::path::PathBuf;
use emoji_matrix_wasm::source::DirectorySource;
use emoji_matrix_wasm::{EmojiCatalog, EmojiConfig, EmojiProcessor, EmojiResult};
use anyhow::Context;
use anyhow::Result;

/// Turn emoji images from a local directory into LED matrix payloads.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Emoji names (with or without the .png suffix)
    names: Vec<String>,

    /// Directory served under the configured base path
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side length of the sampled grid
    #[arg(short, long)]
    size: Option<u32>,

    /// Quantization step
    #[arg(long)]
    step: Option<u16>,

    /// Maximum number of palette colors
    #[arg(short = 'k', long)]
    palette_size: Option<usize>,

    /// List the selectable emojis instead of processing
    #[arg(short, long)]
    list: bool,

    /// Print the wire payload as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<EmojiConfig> {
    let mut config = match &args.config {
        Some(path) => EmojiConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EmojiConfig::default(),
    };
    if let Some(step) = args.step {
        config.quantization_step = step;
    }
    if let Some(k) = args.palette_size {
        config.max_palette_size = k;
    }
    config.validate()?;
    Ok(config)
}

// One character per cell: the palette slot of its color.
fn print_grid(result: &EmojiResult) {
    const SLOTS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let colors: Vec<_> = result.palette.colors().collect();

    println!("{} ({})", result.name, result.url);
    let size = result.matrix.size();
    for row in 0..size {
        let line: String = (0..size)
            .map(|col| {
                let pixel = result.matrix.pixel(row, col);
                colors
                    .iter()
                    .position(|&c| c == pixel)
                    .and_then(|i| SLOTS.get(i))
                    .map_or('?', |&b| b as char)
            })
            .collect();
        println!("  {line}");
    }
    for (i, hex) in result.palette.to_hex().iter().enumerate() {
        let slot = SLOTS.get(i).map_or('?', |&b| b as char);
        println!("  {slot} = #{hex} ({} px)", result.palette.entries()[i].count);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let source = DirectorySource::new(&args.root, config.base_path.clone());

    if args.list {
        let manifest = source.discover().context("scanning emoji directory")?;
        let catalog = EmojiCatalog::new(&config, manifest);
        for entry in catalog.list_predefined_emojis() {
            println!("{}\t{}\t{}", entry.name, entry.label, entry.url);
        }
        return Ok(());
    }

    let processor = EmojiProcessor::new(config)?;
    for name in &args.names {
        let (_, url) = processor.resolve(name)?;
        let bytes = source.read(&url)?;
        let result = processor
            .process_bytes(name, &bytes, args.size)
            .context("emoji processing failed")?;
        log::info!("{} → {} palette colors", result.name, result.palette.len());

        if args.json {
            let report = serde_json::json!({
                "name": result.name,
                "url": result.url,
                "matrix": result.payload(),
                "palette": result.palette.to_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_grid(&result);
        }
    }

    Ok(())
}
