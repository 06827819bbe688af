//! Headless renderer: loads a garden map, renders one frame and writes it out.
//!
//! Usage: `gardenkit [OUTPUT.png] [--config PATH] [--json-logs]`
//!
//! Writes the composited frame to `OUTPUT.png` (default `garden.png`) and
//! the domain state next to it as `OUTPUT.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use gardenkit::{
    init_json_logging, init_logging, persistence, CellPaint, Config, Coverage, DomainAction,
    Editor, Cell, InMemoryBackend, Item, Zone, BUILD_DATE, VERSION,
};

struct Args {
    output: PathBuf,
    config: Option<PathBuf>,
    json_logs: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        output: PathBuf::from("garden.png"),
        config: None,
        json_logs: false,
    };
    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => {
                let path = raw.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--json-logs" => args.json_logs = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown option {flag}"),
            _ => args.output = PathBuf::from(arg),
        }
    }
    Ok(args)
}

fn demo_config() -> Config {
    let mut config = Config::default();
    config.world.cols = 40;
    config.world.rows = 30;
    config.viewport.width = 800.0;
    config.viewport.height = 600.0;
    config
}

fn demo_records() -> (Vec<Item>, Vec<Zone>) {
    let mut tomato = Item::new("Tomato", "tomato", 120.0, 100.0, 40.0, 40.0);
    tomato.date_planted = NaiveDate::from_ymd_opt(2024, 5, 12);
    let mut shed = Item::new("Shed", "shed", 560.0, 380.0, 120.0, 80.0);
    shed.rotation = 15.0;

    let beds = Zone::new("#8bc34a", Coverage::rect(4, 3, 10, 6)).with_name("Vegetable beds");
    let lawn = Zone::new(
        "#4caf50",
        Coverage::from_cells(
            Coverage::rect(20, 14, 12, 10)
                .iter()
                .chain(Coverage::rect(14, 20, 6, 4).iter()),
        ),
    )
    .with_name("Lawn");

    (vec![tomato, shed], vec![beds, lawn])
}

fn state_path(output: &Path) -> PathBuf {
    output.with_extension("json")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.json_logs {
        init_json_logging()?;
    } else {
        init_logging()?;
    }
    tracing::info!("gardenkit {} (built {})", VERSION, BUILD_DATE);

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => demo_config(),
    };
    let mut editor = Editor::new(config)?;

    let (items, zones) = demo_records();
    let backend = InMemoryBackend::with_records(items, zones);
    let changed = persistence::load_from_backend(&mut editor, &backend).await?;
    tracing::info!(?changed, "Loaded garden");

    let path: BTreeMap<_, _> = (4..14)
        .map(|col| (Cell::new(col, 11).key(), CellPaint::new("#a1887f")))
        .collect();
    editor.dispatch(DomainAction::SetColoredCells(path));

    let cell_size = editor.config().world.cell_size;
    editor.on_canvas_click(8.0 * cell_size, 5.0 * cell_size);

    // Icons and follow-up frames settle within a few ticks.
    for _ in 0..4 {
        editor.poll_images();
        if editor.tick()? == 0 && editor.images().pending() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }

    for label in editor.labels() {
        tracing::info!(
            zone = %label.zone,
            x = label.anchor.x,
            y = label.anchor.y,
            "Label {:?}",
            label.text
        );
    }

    let surface = editor.surface().context("no surface was rendered")?;
    surface
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let state_file = state_path(&args.output);
    let json = serde_json::to_string_pretty(editor.state())?;
    std::fs::write(&state_file, json)
        .with_context(|| format!("writing {}", state_file.display()))?;

    tracing::info!(
        frames = editor.frames(),
        "Wrote {} and {}",
        args.output.display(),
        state_file.display()
    );
    editor.teardown();
    Ok(())
}
