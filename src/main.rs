use clap::{Parser, Subcommand, ValueEnum};
use image::ImageFormat;
use std::path::PathBuf;

use sharpmorph::filters::catalog::element_rows;
use sharpmorph::{HostAdapter, ImageRsCodec, LaplacianKernel, StructuringElements, Transformation};

#[derive(Parser)]
#[command(name = "sharpmorph")]
#[command(about = "Laplacian sharpening and morphological transforms for images")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Encoding for written images
    #[arg(long, value_enum, default_value_t = OutputFormat::Png, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sharpen an image with one of the Laplacian kernels
    Sharpen {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Kernel from the catalog (1-4)
        #[arg(short, long, default_value = "1")]
        kernel: LaplacianKernel,

        /// Directory for the edge map and enhanced image
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        out_dir: PathBuf,

        /// Save intermediate buffers to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },

    /// Apply erosion, dilation, opening or closing
    Morph {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Transformation to apply
        #[arg(long, default_value = "erosion")]
        op: Transformation,

        /// Threshold to black/white (Otsu) before transforming
        #[arg(long)]
        binarize: bool,

        /// Directory for the transformed image and edge maps
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        out_dir: PathBuf,

        /// Save intermediate buffers to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },

    /// Print the kernel and structuring element catalog
    Kernels,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
}

impl From<OutputFormat> for ImageFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let codec = ImageRsCodec::new(args.format.into());

    match args.command {
        Command::Sharpen {
            image_path,
            kernel,
            out_dir,
            debug_out,
        } => {
            let host = adapter(codec, debug_out);
            let source = host.load(&image_path)?;
            let output = host.sharpen(source, kernel)?;

            println!("\n=== Laplacian Sharpening (kernel {}) ===", output.kernel);
            print_matrix(&output.kernel.matrix_rows());
            println!("Mean edge response: {:.2}", output.mean_edge_response);
            report_written(&host.save_all(&output.named(), &out_dir)?);
        }
        Command::Morph {
            image_path,
            op,
            binarize,
            out_dir,
            debug_out,
        } => {
            let host = adapter(codec, debug_out);
            let source = host.load(&image_path)?;
            let output = host.transform(source, op, binarize)?;

            println!("\n=== Morphological Transformation: {} ===", output.transformation);
            if let Some(level) = output.otsu_level {
                println!("Binarized at Otsu level {}", level);
            }
            report_written(&host.save_all(&output.named(), &out_dir)?);
        }
        Command::Kernels => {
            println!("=== Laplacian Kernels ===");
            for kernel in LaplacianKernel::ALL {
                println!("\nKernel {}:", kernel);
                print_matrix(&kernel.matrix_rows());
            }

            let elements = StructuringElements::default();
            println!("\n=== Structuring Elements ===");
            println!("\nErosion:");
            print_matrix(&element_rows(&elements.erosion));
            println!("\nDilation:");
            print_matrix(&element_rows(&elements.dilation));
        }
    }

    Ok(())
}

fn adapter(codec: ImageRsCodec, debug_out: Option<PathBuf>) -> HostAdapter<ImageRsCodec> {
    let host = HostAdapter::new(codec);
    match debug_out {
        Some(dir) => host.with_debug(dir),
        None => host,
    }
}

fn print_matrix(rows: &[String]) {
    for row in rows {
        println!("  {}", row);
    }
}

fn report_written(paths: &[PathBuf]) {
    println!("Wrote {} images:", paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
}
