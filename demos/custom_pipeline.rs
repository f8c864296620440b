use sharpmorph::filters::steps::{EdgeMapStep, MorphologyStep, SharpenStep};
use sharpmorph::{
    HostAdapter, ImageRsCodec, Kernel, LaplacianKernel, Pipeline, StructuringElement,
    StructuringElements, Transformation,
};
use std::env;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let host = HostAdapter::new(ImageRsCodec::png());
    let img = host.load(Path::new(&args[1]))?;

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: Every catalog kernel
    println!("\n=== Sharpening With Each Kernel ===");
    for kernel in LaplacianKernel::ALL {
        let output = host.sharpen(img.clone(), kernel)?;
        println!("  Kernel {}: mean edge response {:.2}", kernel, output.mean_edge_response);
    }

    // Example 2: Custom pipeline - sharpen, then close with a 5x5 block
    println!("\n\n=== Custom Pipeline (Sharpen + 5x5 Closing) ===");
    let custom_pipeline = Pipeline::new()
        .add_step_boxed(Box::new(SharpenStep { kernel: LaplacianKernel::Three }))
        .add_step_boxed(Box::new(MorphologyStep {
            transformation: Transformation::Closing,
            elements: StructuringElements {
                erosion: StructuringElement::plus(),
                dilation: StructuringElement::new(&[1; 25])?,
            },
        }))
        .add_step_boxed(Box::new(EdgeMapStep {
            kernel: Kernel::from_ints(&[0, -1, 0, -1, 4, -1, 0, -1, 0])?,
        }));

    let items = custom_pipeline.run(img.clone())?;
    println!("Custom pipeline produced {} images", items.len());
    for (i, item) in items.iter().enumerate() {
        println!("  {}: {}", i + 1, item.role().unwrap_or("unnamed"));
    }

    // Example 3: Pipeline with only the first step (partial execution for debugging)
    println!("\n\n=== Partial Pipeline (Stop After Sharpen) ===");
    let partial_result = custom_pipeline.run_partial(img, 1)?;
    println!("Partial pipeline returned {} items", partial_result.len());
    if let Some(first) = partial_result.first() {
        println!("  First item: {}x{} image", first.image.width(), first.image.height());
    }

    Ok(())
}
