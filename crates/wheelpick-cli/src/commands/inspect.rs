use clap::{Args, ValueEnum};
use serde::Serialize;
use wheelpick_core::picker::{PickerColumn, Rehome};
use wheelpick_core::{Config, PresetKind, WheelValue};

#[derive(Clone, Copy, ValueEnum)]
pub enum Preset {
    BlockTime,
    Duration,
    Timer,
}

impl From<Preset> for PresetKind {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::BlockTime => PresetKind::BlockTime,
            Preset::Duration => PresetKind::Duration,
            Preset::Timer => PresetKind::Timer,
        }
    }
}

#[derive(Args)]
pub struct InspectArgs {
    /// Preset picker to build
    #[arg(value_enum)]
    preset: Preset,
    /// Column to move before inspecting
    #[arg(long, requires = "offset")]
    column: Option<String>,
    /// Offset (px) to scroll the column to
    #[arg(long, requires = "column", allow_hyphen_values = true)]
    offset: Option<f64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct VisibleRow {
    value: WheelValue,
    distance: f64,
    scale: f64,
    opacity: f64,
    rotation_deg: f64,
}

#[derive(Serialize)]
struct ColumnReport {
    name: String,
    circular: bool,
    len: usize,
    item_extent: f64,
    boundary_margin: usize,
    offset: f64,
    snap_target: f64,
    rehome: Rehome,
    value: WheelValue,
    visible: Vec<VisibleRow>,
}

impl ColumnReport {
    fn from_column(column: &PickerColumn<WheelValue>) -> Self {
        let space = column.index_space();
        let visible = column
            .visible_items()
            .into_iter()
            .filter_map(|item| {
                let value = *column.sequence().get(item.value_index)?;
                Some(VisibleRow {
                    value,
                    distance: item.distance,
                    scale: item.transform.scale,
                    opacity: item.transform.opacity,
                    rotation_deg: item.transform.rotation_deg,
                })
            })
            .collect();
        Self {
            name: column.name().to_string(),
            circular: space.is_circular(),
            len: space.len(),
            item_extent: space.item_extent(),
            boundary_margin: space.boundary_margin(),
            offset: column.offset(),
            snap_target: space.snap_target(column.offset()),
            rehome: space.needs_rehome(column.offset()),
            value: *column.current_value(),
            visible,
        }
    }
}

pub fn run(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut picker = PresetKind::from(args.preset).build(&config.preset_options())?;

    if let (Some(column), Some(offset)) = (&args.column, args.offset) {
        let events = picker.on_scroll_sample(column, offset, 0.0)?;
        for event in &events {
            if let wheelpick_core::Event::Rehomed { from, offset, .. } = event {
                tracing::info!(column = %column, from, to = offset, "rehomed");
            }
        }
    }

    let reports: Vec<ColumnReport> = picker.columns().iter().map(ColumnReport::from_column).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!(
            "{:<8} {}  offset={:.1}  target={:.1}  ({} x {}px, {})",
            report.name,
            report.value,
            report.offset,
            report.snap_target,
            report.len,
            report.item_extent,
            if report.circular { "circular" } else { "bounded" },
        );
        for row in &report.visible {
            let marker = if row.distance.abs() < 0.5 { ">" } else { " " };
            println!(
                "  {marker} {:>4}  d={:+.2}  scale={:.2}  opacity={:.2}  rot={:+.1}",
                row.value.to_string(),
                row.distance,
                row.scale,
                row.opacity,
                row.rotation_deg
            );
        }
    }
    let commit: Vec<String> = picker.commit().iter().map(ToString::to_string).collect();
    println!("commit: {}", commit.join(" "));
    Ok(())
}
