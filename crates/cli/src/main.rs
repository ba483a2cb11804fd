use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::{Args, Parser, Subcommand};

use facetrack_core::capture::infrastructure::frame_sequence_source::{
    list_devices, FrameSequenceSource,
};
use facetrack_core::capture::infrastructure::static_image_source::StaticImageSource;
use facetrack_core::detection::detection_client::DetectionClient;
use facetrack_core::detection::domain::detected_face::DetectedFace;
use facetrack_core::rendering::infrastructure::frame_surface::FrameSurface;
use facetrack_core::rendering::render_coordinator::RenderCoordinator;
use facetrack_core::service::infrastructure::http_face_service::HttpFaceService;
use facetrack_core::session::command::Command;
use facetrack_core::session::face_track_session::FaceTrackSession;
use facetrack_core::shared::settings::ClientSettings;
use facetrack_core::shared::tracking_config::{DistanceMetric, FaceModel, TrackingConfig};
use facetrack_core::tracking::tracking_logger::StdoutTrackingLogger;

/// Detect faces and track a pinned face through a live frame source.
#[derive(Parser)]
#[command(name = "facetrack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect faces in one image and list them.
    Detect {
        /// Image to run detection on.
        image: PathBuf,

        /// Write the image with numbered face boxes here.
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// List frame directories usable as live sources.
    Devices {
        /// Directory holding one subdirectory of frames per device.
        root: PathBuf,
    },

    /// Track a face through a directory of frames.
    ///
    /// Reads commands from stdin while running: capture, detect,
    /// select <n>, start, stop, model <name>, metric <name>, load <path>,
    /// quit.
    Track {
        /// Directory of frames played as the live source, in file-name order.
        #[arg(long)]
        frames: PathBuf,

        /// Pick the face to track from this image instead of the first frame.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Index of the detected face to track (default: the first one).
        #[arg(long)]
        face: Option<usize>,

        /// Save every rendered frame as a numbered PNG here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Restart the frame directory when it runs out.
        #[arg(long = "loop")]
        looping: bool,

        /// Distance metric: cosine, euclidean or euclidean_l2.
        #[arg(long)]
        metric: Option<DistanceMetric>,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[derive(Args)]
struct ServiceArgs {
    /// Face service base URL (default from settings, else http://127.0.0.1:8000).
    #[arg(long)]
    endpoint: Option<String>,

    /// Embedding model, e.g. Facenet512, ArcFace, VGG-Face.
    #[arg(long)]
    model: Option<FaceModel>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Commands::Detect {
            image,
            output,
            service,
        } => run_detect(&image, output.as_deref(), &service),
        Commands::Devices { root } => run_devices(&root),
        Commands::Track {
            frames,
            reference,
            face,
            output_dir,
            looping,
            metric,
            service,
        } => run_track(
            &frames,
            reference.as_deref(),
            face,
            output_dir.as_deref(),
            looping,
            metric,
            &service,
        ),
    }
}

fn run_detect(
    image: &Path,
    output: Option<&Path>,
    args: &ServiceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (service, config) = build_service(args, None)?;
    let frame = StaticImageSource::open(image)?.into_frame();

    let client = DetectionClient::new(Box::new(service));
    let faces = client.detect(&frame, &config)?;
    print_faces(&faces);

    if let Some(output) = output {
        let mut surface = FrameSurface::new();
        RenderCoordinator::default().draw_candidates(&mut surface, &frame, &faces);
        surface.save(output)?;
        log::info!("Output written to {}", output.display());
    }
    Ok(())
}

fn run_devices(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let devices = list_devices(root)?;
    if devices.is_empty() {
        log::info!("No frame directories under {}", root.display());
    }
    for device in devices {
        println!("{}\t{}", device.label, device.id);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_track(
    frames: &Path,
    reference: Option<&Path>,
    face: Option<usize>,
    output_dir: Option<&Path>,
    looping: bool,
    metric: Option<DistanceMetric>,
    args: &ServiceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (service, config) = build_service(args, metric)?;

    let mut surface = FrameSurface::new();
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
        surface = surface.with_output_dir(dir);
    }

    let mut session = FaceTrackSession::new(
        Box::new(service.clone()),
        Box::new(service),
        Box::new(surface),
        config,
    )
    .with_logger(Box::new(StdoutTrackingLogger::default()));

    let source = FrameSequenceSource::open(frames, looping)?;
    log::info!("Playing {} frames from {}", source.len(), frames.display());
    session.switch_source(Some(Box::new(source)));

    match reference {
        Some(path) => session.load_image(path)?,
        None => session.capture()?,
    }
    let faces = session.detect()?;
    if faces.is_empty() {
        return Err("No face found to track".into());
    }
    print_faces(faces);
    if let Some(index) = face {
        session.select(index)?;
    }
    session.start_tracking()?;

    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    let quit = matches!(command, Command::Quit);
                    if tx.send(command).is_err() || quit {
                        break;
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
    });

    session.run(rx);
    Ok(())
}

fn build_service(
    args: &ServiceArgs,
    metric: Option<DistanceMetric>,
) -> Result<(HttpFaceService, TrackingConfig), Box<dyn std::error::Error>> {
    let settings = ClientSettings::load();
    let endpoint = args.endpoint.as_deref().unwrap_or(&settings.endpoint);
    let mut config = settings.tracking_config();
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(metric) = metric {
        config.metric = metric;
    }
    log::info!(
        "Face service at {endpoint} (model {}, metric {})",
        config.model,
        config.metric
    );
    let service = HttpFaceService::new(endpoint, settings.request_timeout())?;
    Ok((service, config))
}

fn print_faces(faces: &[DetectedFace]) {
    for (i, face) in faces.iter().enumerate() {
        println!("{i}\t{}\t{} dims", face.id(), face.embedding().len());
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Detect { image, .. } => {
            if !image.is_file() {
                return Err(format!("Image not found: {}", image.display()).into());
            }
        }
        Commands::Devices { root } => {
            if !root.is_dir() {
                return Err(format!("Not a directory: {}", root.display()).into());
            }
        }
        Commands::Track {
            frames, reference, ..
        } => {
            if !frames.is_dir() {
                return Err(format!("Frame directory not found: {}", frames.display()).into());
            }
            if let Some(reference) = reference {
                if !reference.is_file() {
                    return Err(
                        format!("Reference image not found: {}", reference.display()).into(),
                    );
                }
            }
        }
    }
    Ok(())
}
