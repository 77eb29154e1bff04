// ----------------------------------- CLI -----------------------------------
use std::path::PathBuf;

use clap::Parser;

use tomorec::{Algorithm, Image, Scanner};
use tomorec::config::{self, Config};
use tomorec::fom::{rms_error, Roi};
use tomorec::io::raw;
use tomorec::sart;
use tomorec::utils::timing::Progress;

#[derive(Parser, Debug, Clone)]
#[command(name = "recon", about = "2D parallel-beam CT reconstruction (FBP / SART)")]
pub struct Cli {

    /// Square image to reconstruct, as raw little-endian f32
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,

    /// Side length of the input image in pixels (required with --input-file)
    #[arg(short = 'n', long, requires = "input_file")]
    pub side: Option<usize>,

    /// Optional TOML config file; explicit flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Upper bound (exclusive) of projection angles, in degrees
    #[arg(short = 'a', long)]
    pub max_angle: Option<u32>,

    /// Angular step in degrees
    #[arg(short, long)]
    pub step: Option<u32>,

    /// Reconstruction method: ramp | shepp-logan | cosine | hamming | hann | FBP | SART
    #[arg(short, long)]
    pub method: Option<String>,

    /// Number of SART iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// SART relaxation factor, in (0, 2)
    #[arg(long)]
    pub relaxation: Option<f32>,

    /// Base name for output files ({base}_sinogram.raw, {base}_recon.raw)
    #[arg(short, long, default_value = "data/out/recon")]
    pub out_files: String,

    /// Re-run reconstruction at increasing max angles, reporting each frame
    #[arg(long)]
    pub animate: bool,

    /// Angular increment between animation frames, in degrees
    #[arg(long, default_value = "10")]
    pub anim_step: u32,

    /// Maximum number of rayon threads
    #[arg(short = 'j', long, default_value = "4")]
    pub num_threads: usize,
}

// --------------------------------------------------------------------------------

use std::error::Error;
use std::fs::create_dir_all;

fn main() -> Result<(), Box<dyn Error>> {

    let args = Cli::parse();
    let mut progress = Progress::new();

    // Set the maximum number of threads used by rayon for parallel iteration
    match rayon::ThreadPoolBuilder::new().num_threads(args.num_threads).build_global() {
        Err(e) => println!("{e}"),
        Ok(_)  => println!("Using up to {} threads.", args.num_threads),
    }

    let config = match &args.config {
        Some(path) => config::read_config_file(path)?,
        None       => Config::default(),
    };

    // Explicit flags beat the config file, which beats built-in defaults
    let max_angle  = args.max_angle .unwrap_or(config.max_angle);
    let step       = args.step      .unwrap_or(config.step);
    let iterations = args.iterations.unwrap_or(config.iterations);
    let relaxation = args.relaxation.unwrap_or(config.relaxation);
    let algorithm  = match &args.method {
        Some(name) => name.parse::<Algorithm>()?,
        None       => config.algorithm,
    };

    progress.start("Loading image");
    let image = match (&args.input_file, args.side) {
        (Some(path), Some(n)) => raw::load_image(path, n)?,
        _ => Image::disk_phantom(64, 16.0, 1.0), // demo phantom
    };
    progress.done();

    let scanner = Scanner::new(image)?;

    if let Some(parent) = PathBuf::from(format!("{}_recon.raw", args.out_files)).parent() {
        create_dir_all(parent)?;
    }

    if args.animate {
        animate(&scanner, algorithm, max_angle, args.anim_step, iterations, relaxation)?;
        return Ok(());
    }

    progress.start(&format!("Projecting over {max_angle} degrees in steps of {step}"));
    let sinogram = scanner.project(max_angle, step)?;
    progress.done();

    let reconstruction = match algorithm {
        Algorithm::Fbp(filter) => {
            progress.start(&format!("FBP reconstruction with {filter} filter"));
            let (_, image) = scanner.reconstruct_fbp(max_angle, step, filter)?;
            progress.done();
            image
        }
        Algorithm::Sart => {
            reconstruct_sart_with_progress(&scanner, max_angle, step, iterations, relaxation)?
        }
    };

    progress.start("Writing outputs");
    raw::write(sinogram.iter().copied(),
               &PathBuf::from(format!("{}_sinogram.raw", args.out_files)))?;
    raw::write(reconstruction.data.iter().copied(),
               &PathBuf::from(format!("{}_recon.raw", args.out_files)))?;
    progress.done();

    report_foms(scanner.image(), &reconstruction)?;
    Ok(())
}

/// SART via the estimate iterator, so each iteration can tick a progress bar.
fn reconstruct_sart_with_progress(scanner: &Scanner, max_angle: u32, step: u32,
                                  iterations: usize, relaxation: f32)
                                  -> Result<Image, Box<dyn Error>>
{
    use indicatif::ProgressBar;

    // Validate parameters the same way the one-shot entry point does
    if iterations == 0 || !(relaxation > 0.0 && relaxation < 2.0) {
        return Ok(scanner.reconstruct_sart(max_angle, step, iterations, relaxation)?);
    }

    let sinogram = scanner.project(max_angle, step)?;
    let angles = tomorec::AngleSet::new(max_angle, step)?;

    let bar = ProgressBar::new(iterations as u64);
    let mut last = None;
    for estimate in sart::estimates(&sinogram, &angles, scanner.geometry(), relaxation)
        .take(iterations)
    {
        bar.inc(1);
        last = Some(estimate);
    }
    bar.finish();
    Ok(last.expect("iteration budget is non-zero"))
}

/// The preview loop of the GUI this replaces: grow the angular range frame by
/// frame and report how the reconstruction sharpens, without any plotting.
fn animate(scanner: &Scanner, algorithm: Algorithm, max_angle: u32, anim_step: u32,
           iterations: usize, relaxation: f32) -> Result<(), Box<dyn Error>>
{
    if anim_step == 0 || anim_step > max_angle {
        return Err(Box::new(tomorec::Error::InvalidAngle { max_angle, step: anim_step }));
    }
    for current_angle in (anim_step..=max_angle).step_by(anim_step as usize) {
        let reconstruction = match algorithm {
            Algorithm::Fbp(filter) =>
                scanner.reconstruct_fbp(current_angle, anim_step, filter)?.1,
            Algorithm::Sart =>
                scanner.reconstruct_sart(current_angle, anim_step, iterations, relaxation)?,
        };
        print!("angle {current_angle:3} ");
        report_foms(scanner.image(), &reconstruction)?;
    }
    Ok(())
}

fn report_foms(original: &Image, reconstruction: &Image) -> Result<(), Box<dyn Error>> {
    let rms = rms_error(original, reconstruction)?;
    let c = (original.n as f32 - 1.0) / 2.0;
    let centre_mean = reconstruction
        .mean_inside_roi(Roi::Disk((c, c), original.n as f32 / 8.0))
        .unwrap_or(0.0);
    println!("rms error: {rms:8.4}   centre ROI mean: {centre_mean:8.4}");
    Ok(())
}
