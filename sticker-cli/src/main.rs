use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use sticker_core::{
    read_records_file, Artifact, Assembler, EncodingPolicy, LabelFont, LabelLayout, LabelRecord,
    LabelStyle, Logo, Preset, StickerConfig,
};

/// Render printable labels with a logo, text and a Code128 barcode.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Label preset used when no --config file is given.
    #[arg(long, value_enum, global = true, default_value_t = PresetArg::Cm6x3)]
    preset: PresetArg,

    /// Raster resolution in dots per inch (e.g. 203 or 300).
    #[arg(long, global = true)]
    dpi: Option<f64>,

    /// JSON configuration file; overrides --preset.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// TrueType font for label text; the built-in font is used otherwise.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Logo image (PNG or JPEG).
    #[arg(long, global = true)]
    logo: Option<PathBuf>,

    /// What to do with records whose code is not valid Code128.
    #[arg(long, value_enum, global = true)]
    on_invalid_barcode: Option<PolicyArg>,

    /// Do not stroke cut guides around labels on PDF sheets.
    #[arg(long, global = true)]
    no_cut_guides: bool,

    /// Directory the output file is written to.
    #[arg(long, global = true, default_value = ".")]
    out: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One label from manually entered fields.
    Single {
        /// Barcode payload; also the first text line of record labels.
        #[arg(long)]
        code: String,
        /// Name line. The captioned sticker (--preset sticker) prints it
        /// after the caption, e.g. the computer number.
        #[arg(long)]
        name: String,
        /// District line. Not printed by the captioned sticker, where it
        /// may be left out.
        #[arg(long)]
        district: Option<String>,
    },
    /// Labels for every row of a CSV table with code, name and district columns.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
        format: FormatArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    #[value(name = "6x3")]
    Cm6x3,
    #[value(name = "5x3")]
    Cm5x3,
    Sticker,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Cm6x3 => Preset::Cm6x3,
            PresetArg::Cm5x3 => Preset::Cm5x3,
            PresetArg::Sticker => Preset::Sticker,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Abort,
    Skip,
}

impl From<PolicyArg> for EncodingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => EncodingPolicy::Abort,
            PolicyArg::Skip => EncodingPolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Zip,
    Pdf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let font = LabelFont::resolve(cli.font.as_deref());
    let logo = cli.logo.as_deref().and_then(load_logo);
    let assembler = Assembler::new(config, font, logo);

    let artifact = match &cli.command {
        Command::Single {
            code,
            name,
            district,
        } => {
            let record =
                manual_record(&assembler.config().layout, code, name, district.as_deref())?;
            assembler.generate(LabelStyle::ManualSingle, &[record])?
        }
        Command::Batch { input, format } => {
            let records = read_records_file(input)
                .with_context(|| format!("reading {}", input.display()))?;
            info!("{} records from {}", records.len(), input.display());
            let style = match format {
                FormatArg::Zip => LabelStyle::BatchImages,
                FormatArg::Pdf => LabelStyle::BatchPdf,
            };
            assembler.generate(style, &records)?
        }
    };

    let path = write_artifact(&cli.out, &artifact)?;
    for skipped in &artifact.skipped {
        warn!(
            "record {} ({:?}) left out: {}",
            skipped.index, skipped.code, skipped.reason
        );
    }
    println!("{}", path.display());
    Ok(())
}

fn load_config(cli: &Cli) -> Result<StickerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Preset::from(cli.preset).config(cli.dpi.unwrap_or(sticker_core::config::DEFAULT_DPI)),
    };
    if let Some(dpi) = cli.dpi {
        config.label.dpi = dpi;
    }
    if let Some(policy) = cli.on_invalid_barcode {
        config.on_invalid_barcode = policy.into();
    }
    if cli.no_cut_guides {
        config.cut_guides.enabled = false;
    }
    config.validate().context("invalid label configuration")?;
    Ok(config)
}

fn manual_record(
    layout: &LabelLayout,
    code: &str,
    name: &str,
    district: Option<&str>,
) -> Result<LabelRecord> {
    let record = match district {
        Some(district) => LabelRecord::new(code, name, district)?,
        None if !layout.prints_district() => LabelRecord::without_district(code, name)?,
        None => bail!("--district is required unless the layout is the captioned sticker"),
    };
    Ok(record)
}

/// A logo that cannot be used is reported and left out.
fn load_logo(path: &Path) -> Option<Logo> {
    match Logo::from_path(path) {
        Ok(logo) => Some(logo),
        Err(err) => {
            warn!("{}; rendering without a logo", err);
            None
        }
    }
}

fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "wrote {} ({}, {} bytes)",
        path.display(),
        artifact.media_type,
        artifact.bytes.len()
    );
    Ok(path)
}
