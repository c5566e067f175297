//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive `notelist_core` through a scripted gesture sequence.
//! - Print every emitted event as one JSON line for quick sanity checks.
//!
//! Usage: `notelist_cli [--config <file.json>] [--log-dir <absolute dir>]`

use log::info;
use notelist_core::{
    init_logging, ListEvent, ListViewConfig, ListViewController, PointerEvent, Row, RowId,
    RowIndex, RowKind, RowOverlayHost, RowSource, TransitionState, Viewport,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Overlay host that hands out sequential handles and prints requests.
#[derive(Default)]
struct PrintingHost {
    next_handle: u64,
}

impl RowOverlayHost for PrintingHost {
    type Handle = u64;

    fn create_overlay(&mut self, row: RowId, kind: RowKind) -> Option<u64> {
        self.next_handle += 1;
        println!("overlay create row={row} kind={kind:?} handle={}", self.next_handle);
        Some(self.next_handle)
    }

    fn destroy_overlay(&mut self, row: RowId, handles: Vec<u64>) {
        println!("overlay destroy row={row} handles={handles:?}");
    }
}

#[derive(Parser)]
#[command(
    name = "notelist_cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scripted smoke run of the note list controller core"
)]
struct Args {
    /// JSON list view config (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<ListViewConfig, String> {
    let Some(path) = path else {
        return Ok(ListViewConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
    ListViewConfig::from_json(&raw).map_err(|err| err.to_string())
}

fn demo_rows() -> Result<RowIndex, String> {
    let rows = [
        Row::pinned(1).with_interactive(true),
        Row::pinned(2),
        Row::new(3).with_interactive(true),
        Row::new(4),
        Row::new(5).with_interactive(true),
        Row::new(6),
    ];
    RowIndex::from_rows(rows).map_err(|err| err.to_string())
}

fn print_events(events: &mut Vec<ListEvent>) {
    for event in events.drain(..) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("event {line}"),
            Err(err) => println!("event <unserializable: {err}>"),
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log dir `{}` is not UTF-8", log_dir.display()))?;
        init_logging(notelist_core::default_log_level(), log_dir).map_err(|err| err.to_string())?;
    }
    let config = load_config(args.config.as_deref())?;
    let row_height = config.row_height;
    let mut list = ListViewController::new(
        config,
        demo_rows()?,
        PrintingHost::default(),
        Vec::new(),
    );
    info!(
        "event=cli_start module=cli status=ok version={}",
        notelist_core::core_version()
    );

    println!("-- scroll");
    list.on_scroll(Viewport::new(0.0, 320.0, 2.0 * row_height));
    print_events(list.sink_mut());

    let third = list_y(&list, 2);
    let fifth = list_y(&list, 4);

    println!("-- click row 3, ctrl-click row 5");
    list.pointer_press(PointerEvent::primary(40.0, third));
    list.pointer_release(PointerEvent::primary(40.0, third));
    list.pointer_press(PointerEvent::primary(40.0, fifth).with_ctrl());
    list.pointer_release(PointerEvent::primary(40.0, fifth).with_ctrl());
    print_events(list.sink_mut());

    println!("-- drag selection below row 6");
    let last = list_y(&list, 5);
    list.pointer_press(PointerEvent::primary(40.0, third));
    if let Some(preview) = list.pointer_move(PointerEvent::primary(40.0, third + 20.0)) {
        println!("drag preview {preview:?}");
    }
    let outcome = list.drop_at(notelist_core::Point::new(40.0, last));
    println!("drop {outcome:?} order={:?}", list.source().ids());
    print_events(list.sink_mut());

    println!("-- delete selection with animation");
    list.request_delete();
    let selected = list.selected_rows();
    list.on_remove_rows_requested(&selected);
    let removed = list.on_animation_finished(TransitionState::Remove);
    println!("removed {removed:?} order={:?}", list.source().ids());
    print_events(list.sink_mut());

    list.teardown();
    print_events(list.sink_mut());
    Ok(())
}

type DemoList = ListViewController<RowIndex, PrintingHost, Vec<ListEvent>>;

/// Viewport y just above the bottom edge of the row at `position`.
fn list_y(list: &DemoList, position: usize) -> f32 {
    let layout = list.layout();
    let viewport = list.viewport();
    layout
        .rects()
        .get(position)
        .map_or(0.0, |rect| rect.bottom() - 5.0 - viewport.top)
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notelist_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
