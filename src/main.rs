use clap::{Parser, Subcommand, ValueEnum};
use imgpress::{output, Encoder, EngineConfig, Format, RustEngine};
use std::path::PathBuf;

/// Shared flags for commands that shrink into a bounding box.
#[derive(clap::Args, Clone)]
struct BoxArgs {
    /// Maximum output width in pixels (0 = unconstrained)
    #[arg(long, default_value_t = 1600)]
    max_width: u32,

    /// Maximum output height in pixels (0 = unconstrained)
    #[arg(long, default_value_t = 1600)]
    max_height: u32,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imgpress")]
#[command(about = "Compress, convert and resize JPEG, PNG, GIF and WEBP images")]
#[command(long_about = "\
Compress, convert and resize JPEG, PNG, GIF and WEBP images

One decode, sensible encoder settings, one export. Compression shrinks into
a bounding box and never upscales; resize forces the exact target. Animated
GIFs keep their frames through compress and resize, and contribute their
first frame when converted to JPEG or PNG.

 Quality is 1-100. Compress defaults to 65 when omitted; 0 means the lowest
usable setting (35), anything above 99 means maximum (100, which for WEBP
selects the lossless mode).")]
#[command(version = version_string())]
struct Cli {
    /// Worker threads for frame-level parallelism (0 = number of cores)
    #[arg(long, default_value_t = 0, global = true)]
    concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl From<TargetFormat> for Format {
    fn from(t: TargetFormat) -> Format {
        match t {
            TargetFormat::Jpeg => Format::Jpeg,
            TargetFormat::Png => Format::Png,
            TargetFormat::Gif => Format::Gif,
            TargetFormat::Webp => Format::Webp,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image to another format at the default quality
    Convert {
        input: PathBuf,
        /// Output path; extension is replaced with the target format's
        output: PathBuf,
        /// Target format
        #[arg(long, value_enum)]
        to: TargetFormat,
    },
    /// Re-encode in the source's own format at the best quality
    Lossless { input: PathBuf, output: PathBuf },
    /// Shrink into a bounding box and re-encode in the source format
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Quality 1-100; omit for the default (65)
        #[arg(long)]
        quality: Option<u32>,
        #[command(flatten)]
        bounds: BoxArgs,
    },
    /// Smallest possible output: bounding-box shrink plus low-quality WEBP
    Tiny {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        bounds: BoxArgs,
    },
    /// Resize to an exact target size (may upscale)
    Resize {
        input: PathBuf,
        output: PathBuf,
        /// Target width (0 = derive from aspect ratio)
        #[arg(long, default_value_t = 0)]
        width: u32,
        /// Target height (0 = derive from aspect ratio)
        #[arg(long, default_value_t = 0)]
        height: u32,
    },
    /// Print format, dimensions and frame count
    Info { input: PathBuf },
    /// Compress every supported image under a directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        /// Quality 1-100; omit for the default (65)
        #[arg(long)]
        quality: Option<u32>,
        /// Export everything as low-quality WEBP
        #[arg(long)]
        tiny: bool,
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        bounds: BoxArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let engine = if cli.concurrency == 0 {
        RustEngine::new()?
    } else {
        RustEngine::with_config(EngineConfig {
            concurrency: cli.concurrency,
        })?
    };

    match cli.command {
        Command::Convert { input, output, to } => {
            let encoder = load(&engine, &input)?;
            let format = Format::from(to);
            let bytes = match format {
                Format::Jpeg => encoder.to_jpeg()?,
                Format::Png => encoder.to_png()?,
                Format::Gif => encoder.to_gif()?,
                Format::Webp => encoder.to_webp()?,
            };
            write_output(&output.with_extension(format.suffix()), &bytes)?;
        }
        Command::Lossless { input, output } => {
            let encoder = load(&engine, &input)?;
            let bytes = encoder.lossless()?;
            write_output(&output.with_extension(encoder.suffix()), &bytes)?;
        }
        Command::Compress {
            input,
            output,
            quality,
            bounds,
        } => {
            let encoder = load(&engine, &input)?;
            let bytes = encoder.compress(bounds.max_width, bounds.max_height, quality)?;
            write_output(&output.with_extension(encoder.suffix()), &bytes)?;
        }
        Command::Tiny {
            input,
            output,
            bounds,
        } => {
            let encoder = load(&engine, &input)?;
            let bytes = encoder.tiny(bounds.max_width, bounds.max_height)?;
            write_output(&output.with_extension("webp"), &bytes)?;
        }
        Command::Resize {
            input,
            output,
            width,
            height,
        } => {
            let encoder = load(&engine, &input)?;
            let bytes = encoder.resize(width, height)?;
            write_output(&output.with_extension(encoder.suffix()), &bytes)?;
        }
        Command::Info { input } => {
            let encoder = load(&engine, &input)?;
            println!(
                "{}",
                output::format_info(
                    encoder.width(),
                    encoder.height(),
                    encoder.pages(),
                    encoder.format(),
                )
            );
        }
        Command::Batch {
            input_dir,
            output_dir,
            quality,
            tiny,
            json,
            bounds,
        } => {
            let config = imgpress::batch::BatchConfig {
                max_width: bounds.max_width,
                max_height: bounds.max_height,
                quality,
                tiny,
            };
            let report = imgpress::batch::run(&engine, &input_dir, &output_dir, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_batch_report(&report);
            }
            if report.failures > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load<'a>(
    engine: &'a RustEngine,
    input: &std::path::Path,
) -> Result<Encoder<&'a RustEngine>, Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    Ok(Encoder::load(engine, data)?)
}

fn write_output(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    println!("{} ({})", path.display(), output::human_size(bytes.len() as u64));
    Ok(())
}
