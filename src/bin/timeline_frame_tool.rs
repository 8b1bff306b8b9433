use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use timeline_rs::api::TimelineDataset;
use timeline_rs::core::ZoomLevel;
use timeline_rs::core::primitives::midnight;
use timeline_rs::{TimelineEngine, TimelineEngineConfig, telemetry};

const USAGE: &str = "usage: timeline_frame_tool <frame|normalize> --input <path> [--output <path>] \
[--zoom <hour|day|week|month>] [--today <YYYY-MM-DD>] [--drill <column-index>] \
[--viewport <px>] [--start <YYYY-MM-DD>] [--end <YYYY-MM-DD>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Frame,
    Normalize,
}

#[derive(Debug)]
struct CliArgs {
    command: CommandKind,
    input: PathBuf,
    output: Option<PathBuf>,
    zoom: ZoomLevel,
    today: Option<NaiveDate>,
    drill: Option<usize>,
    viewport_px: Option<f64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

fn main() {
    let _ = telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let dataset = TimelineDataset::from_json_compat_str(&raw).map_err(|err| err.to_string())?;

    let json = match args.command {
        CommandKind::Normalize => dataset
            .to_json_contract_v1_pretty()
            .map_err(|err| err.to_string())?,
        CommandKind::Frame => render_frame(&args, dataset)?,
    };
    write_output(args.output.as_deref(), &json)
}

fn render_frame(args: &CliArgs, dataset: TimelineDataset) -> Result<String, String> {
    let mut config = TimelineEngineConfig::default().with_zoom(args.zoom);
    if let Some(start) = args.start {
        config.calendar_start = start;
    }
    if let Some(end) = args.end {
        config.calendar_end = end;
    }
    let mut engine =
        TimelineEngine::with_dataset(config, dataset).map_err(|err| err.to_string())?;

    if let Some(viewport_px) = args.viewport_px {
        engine.set_viewport_width(viewport_px);
    }
    if let Some(index) = args.drill {
        if index >= engine.columns().len() {
            return Err(format!(
                "drill column {index} is out of range (grid has {} columns)",
                engine.columns().len()
            ));
        }
        engine.toggle_column(index);
    }
    if let Some(today) = args.today {
        engine.scroll_to_date(today);
    }

    engine
        .build_frame(args.today.map(midnight))
        .to_json_pretty()
        .map_err(|err| err.to_string())
}

fn write_output(output: Option<&Path>, json: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_date(flag: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date for {flag} `{value}`: {err}"))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("frame") => CommandKind::Frame,
        Some("normalize") => CommandKind::Normalize,
        _ => return Err(USAGE.to_owned()),
    };

    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut zoom = ZoomLevel::default();
    let mut today = None;
    let mut drill = None;
    let mut viewport_px = None;
    let mut start = None;
    let mut end = None;

    while let Some(flag) = args.next() {
        if flag == "--help" || flag == "-h" {
            return Err(USAGE.to_owned());
        }
        let value = args
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--input" => input = Some(PathBuf::from(value)),
            "--output" => output = Some(PathBuf::from(value)),
            "--zoom" => zoom = ZoomLevel::from_name_lossy(&value),
            "--today" => today = Some(parse_date(&flag, &value)?),
            "--start" => start = Some(parse_date(&flag, &value)?),
            "--end" => end = Some(parse_date(&flag, &value)?),
            "--drill" => {
                drill = Some(
                    value
                        .parse::<usize>()
                        .map_err(|err| format!("invalid column index `{value}`: {err}"))?,
                );
            }
            "--viewport" => {
                viewport_px = Some(
                    value
                        .parse::<f64>()
                        .map_err(|err| format!("invalid viewport width `{value}`: {err}"))?,
                );
            }
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| "missing --input".to_owned())?;
    Ok(CliArgs {
        command,
        input,
        output,
        zoom,
        today,
        drill,
        viewport_px,
        start,
        end,
    })
}
