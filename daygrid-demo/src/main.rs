//! Prints a month list to the terminal and walks it through a range selection.
//!
//! Usage: `daygrid-demo [YYYY-MM-DD]`. Set `RUST_LOG` to see engine traces,
//! e.g. `RUST_LOG=daygrid=trace,daygrid_components=debug`.

use daygrid::{
    CalendarDayMetadata, DateId, DayState, FirstDayOfWeek, InstanceId, MonthGrid, MonthListArgs,
    SelectionBroadcaster, SystemClock,
};
use daygrid_components::{CalendarListArgs, CalendarListController, DateRangeState, MountedMonth};
use tracing::info;

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "warn,daygrid=info,daygrid_components=info,daygrid_demo=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("warn"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let focus: Option<DateId> = std::env::args().nth(1).map(|arg| arg.parse()).transpose()?;

    let mut month_list = MonthListArgs::default()
        .past_scroll_range_in_months(1)
        .future_scroll_range_in_months(1)
        .first_day_of_week(FirstDayOfWeek::Monday);
    if let Some(focus) = &focus {
        month_list = month_list.initial_month_id(focus.clone());
    }

    let mut list = CalendarListController::new(
        CalendarListArgs::default()
            .month_list(month_list)
            .instance_id(InstanceId::new("demo")),
        SelectionBroadcaster::new(),
        &SystemClock,
    );

    let mounted: Vec<MountedMonth> = list
        .months()
        .months()
        .iter()
        .map(|month| list.mount_month(month))
        .collect();
    info!(months = mounted.len(), "mounted months");

    let presses: Vec<DateId> = mounted
        .get(mounted.len() / 2)
        .map(|middle| {
            middle
                .snapshot()
                .days()
                .filter(|day| !day.is_different_month)
                .map(|day| day.id.clone())
                .step_by(9)
                .take(2)
                .collect()
        })
        .unwrap_or_default();

    let mut selection = DateRangeState::new();
    for id in presses {
        selection.on_calendar_day_press(id);
        list.set_active_date_ranges(selection.active_date_ranges());
    }
    info!(range = ?selection.range(), "selection complete");

    for month in &mounted {
        print_month(&month.snapshot());
    }

    if let Some(focus) = &focus
        && let Some(offset) = list.scroll_offset_for_date(focus, 0.0)
    {
        println!("scroll offset for {focus}: {offset}px");
    }
    Ok(())
}

fn print_month(grid: &MonthGrid) {
    println!("{:^35}", grid.calendar_row_month);
    let header: Vec<String> = grid
        .week_days_list
        .iter()
        .map(|label| format!("{label:^5}"))
        .collect();
    println!("{}", header.concat());
    for week in &grid.weeks_list {
        let row: Vec<String> = week.iter().map(cell_text).collect();
        println!("{}", row.concat());
    }
    println!();
}

fn cell_text(day: &CalendarDayMetadata) -> String {
    if day.is_different_month {
        return " ".repeat(5);
    }
    let label = &day.display_label;
    match day.state {
        DayState::Active => format!("[{label:>2}] "),
        DayState::Today => format!("({label:>2}) "),
        DayState::Disabled => format!(" {label:>2}- "),
        DayState::Idle => format!(" {label:>2}  "),
    }
}
