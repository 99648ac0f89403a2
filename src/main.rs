use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use plotkit::{init_logging, read_program, write_program};
use plotkit_communication::{list_ports, open_port, LineTransport, StreamSender};
use plotkit_core::{distance_to_steps, Axis};
use plotkit_pipeline::{
    raster_to_commands, ExtractionParameters, Style, ToolpathParameters,
};

#[derive(Parser)]
#[command(name = "plotkit", version, about = "Raster image to pen-plotter G-code")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image into a G-code toolpath file
    Convert {
        /// Input image (any format the image crate decodes)
        input: PathBuf,
        /// Output path; defaults to <input stem>_<style>.gcode
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stylization filter; unknown names fall back to sketch
        #[arg(long, default_value = "sketch")]
        style: String,
        /// Working raster width in pixels
        #[arg(long, default_value_t = 400)]
        width: u32,
        /// Working raster height in pixels
        #[arg(long, default_value_t = 400)]
        height: u32,
        /// JSON file with toolpath parameters; unset fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Draw contours in random order
        #[arg(long)]
        randomize: bool,
        /// Jitter long contours for a hand-drawn look
        #[arg(long)]
        noise: bool,
    },
    /// List serial ports that look like plotter controllers
    Ports,
    /// Stream an existing G-code file to a controller
    Send {
        /// Program file, one command per line
        file: PathBuf,
        /// Serial port name (e.g. /dev/ttyUSB0, COM3)
        #[arg(short, long)]
        port: String,
        #[arg(long, default_value_t = 115_200)]
        baud: u32,
    },
    /// Move the head a calibrated distance in device steps
    Jog {
        #[arg(short, long)]
        port: String,
        #[arg(long, default_value_t = 115_200)]
        baud: u32,
        /// X distance in output units
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        /// Y distance in output units
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
    },
}

fn main() -> Result<()> {
    init_logging()?;

    match Cli::parse().command {
        Command::Convert {
            input,
            output,
            style,
            width,
            height,
            config,
            randomize,
            noise,
        } => convert(&input, output, &style, width, height, config, randomize, noise),
        Command::Ports => ports(),
        Command::Send { file, port, baud } => send(&file, &port, baud),
        Command::Jog { port, baud, x, y } => jog(&port, baud, x, y),
    }
}

#[allow(clippy::too_many_arguments)]
fn convert(
    input: &Path,
    output: Option<PathBuf>,
    style_name: &str,
    width: u32,
    height: u32,
    config: Option<PathBuf>,
    randomize: bool,
    noise: bool,
) -> Result<()> {
    let style = Style::from_name(style_name);

    let mut params = match config {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<ToolpathParameters>(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => ToolpathParameters::default(),
    };
    if randomize {
        params.randomize_contours = true;
    }
    if noise {
        params.add_noise = true;
    }

    let img = image::open(input)
        .with_context(|| format!("Failed to load image {}", input.display()))?;
    let gray = image::imageops::resize(
        &img.to_luma8(),
        width,
        height,
        image::imageops::FilterType::Triangle,
    );

    let stylized = plotkit_pipeline::styles::equalize(&style.apply(&gray));

    let report = raster_to_commands(&stylized, &ExtractionParameters::default(), &params)?;
    if !report.is_clean() {
        tracing::warn!(
            rejected = report.rejected.len(),
            "dropped malformed commands from generated program"
        );
    }

    let output = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        PathBuf::from(format!("{}_{}.gcode", stem, style.name()))
    });

    write_program(
        &output,
        &report.accepted,
        &format!("{} ({})", input.display(), style.name()),
    )?;
    tracing::info!(
        commands = report.accepted.len(),
        output = %output.display(),
        "toolpath written"
    );
    Ok(())
}

fn ports() -> Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No plotter ports found");
        return Ok(());
    }
    for info in ports {
        match info.manufacturer {
            Some(mfg) => println!("{}\t{} ({})", info.name, info.description, mfg),
            None => println!("{}\t{}", info.name, info.description),
        }
    }
    Ok(())
}

fn send(file: &Path, port: &str, baud: u32) -> Result<()> {
    let program = read_program(file)?;
    if program.is_empty() {
        bail!("{} contains no commands", file.display());
    }

    let mut transport = open_port(port, baud)?;
    tracing::info!(port, commands = program.len(), "streaming program");

    let outcome = StreamSender::default().stream(&mut transport, &program, |done, total, ack| {
        tracing::info!("{}/{} {}", done, total, ack);
    })?;

    println!("Sent {} commands ({} skipped)", outcome.sent, outcome.skipped);
    Ok(())
}

fn jog(port: &str, baud: u32, x: f64, y: f64) -> Result<()> {
    let steps_x = distance_to_steps(x, Axis::X);
    let steps_y = distance_to_steps(y, Axis::Y);

    let mut transport = open_port(port, baud)?;
    let command = format!("G0 X{} Y{}", steps_x, steps_y);
    tracing::info!(command = command.as_str(), "jogging");

    transport.send_line(&command)?;
    let ack = transport.read_line()?;
    println!("{}", ack);
    Ok(())
}
