use sharpmorph::{HostAdapter, ImageRsCodec, LaplacianKernel, Transformation};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    println!("Testing debug mode...\n");

    // Create debug output directory
    let debug_dir = PathBuf::from("debug_output");

    // Remove directory if it exists (for testing)
    if debug_dir.exists() {
        std::fs::remove_dir_all(&debug_dir)?;
    }

    let host = HostAdapter::new(ImageRsCodec::png()).with_debug(debug_dir.clone());
    let img = host.load(Path::new("test_image.png"))?;

    println!("Running both demos with debug mode...");
    host.sharpen(img.clone(), LaplacianKernel::One)?;
    host.transform(img, Transformation::Opening, true)?;

    println!("\n✓ Pipelines completed!");
    println!("\nDebug outputs saved to: {}/", debug_dir.display());
    println!("\nDirectory structure:");
    println!("  01_sharpen_k1/00_input/             - Original input image");
    println!("  01_sharpen_k1/01_laplacian_sharpen/ - Edge map and enhanced image");
    println!("  02_morph_opening/01_binarize/       - Otsu-thresholded input");
    println!("  02_morph_opening/02_morphology/     - Input and opened image");
    println!("  02_morph_opening/03_edge_map/       - Both images with their edge maps");

    println!("\nExample files:");
    for run in ["01_sharpen_k1", "02_morph_opening"] {
        let Ok(steps) = std::fs::read_dir(debug_dir.join(run)) else {
            continue;
        };
        for step in steps.flatten() {
            let path = step.path();
            if !path.is_dir() {
                continue;
            }
            let files: Vec<_> = std::fs::read_dir(&path)?.flatten().collect();
            println!("  {}/{}/ - {} files", run, step.file_name().to_string_lossy(), files.len());
            for file in files.iter().take(3) {
                println!("    {}", file.file_name().to_string_lossy());
            }
        }
    }

    Ok(())
}
