//! Seat Plan Designer Demo
//!
//! Scripted editing session showing:
//! - Drawing a layout with an aisle and a stage row
//! - Scheduling showtimes and selling seats
//! - An edit refused because it would strand a sold seat
//! - A resize that reconciles every showtime and keeps its sales
//! - Saving and reloading the venue as JSON
//!
//! # Usage
//!
//! ```bash
//! SEATPLAN_DEFAULT_ROWS=5 SEATPLAN_DEFAULT_COLS=10 cargo run --bin seatplan-demo
//! ```

use seatplan::{
    Config, EditorAction, FillTarget, ScreenId, SeatChart, SeatKind, SessionAction,
    SessionEnvironment, ShowtimeRequest, VenueSessionReducer, VenueSessionState, chart, snapshot,
};
use seatplan_core::environment::{Clock, SystemClock};
use seatplan_runtime::Store;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n============================================");
    println!("   Seat Plan Designer - Demo");
    println!("============================================\n");

    let clock = Arc::new(SystemClock);
    let mut store = Store::new(
        VenueSessionState::new(ScreenId::new(), config.new_layout()),
        VenueSessionReducer::new(),
        SessionEnvironment::new(clock.clone()),
    );

    // Step 1: draw the room
    println!("1. Drawing the layout: stage on the first row, aisle down column 4\n");
    store.send(SessionAction::Editor(EditorAction::SetActiveCategory {
        kind: SeatKind::Aisle,
    }))?;
    store.send(SessionAction::Editor(EditorAction::BulkFill {
        target: FillTarget::Col(4),
    }))?;
    store.send(SessionAction::Editor(EditorAction::SetActiveCategory {
        kind: SeatKind::StageLeft,
    }))?;
    store.send(SessionAction::Editor(EditorAction::BulkFill {
        target: FillTarget::Row(0),
    }))?;
    store.send(SessionAction::Editor(EditorAction::SetActiveCategory {
        kind: SeatKind::Premium,
    }))?;
    store.send(SessionAction::Editor(EditorAction::BeginStroke { row: 1, col: 0 }))?;
    for col in 1..4 {
        store.send(SessionAction::Editor(EditorAction::ContinueStroke { row: 1, col }))?;
    }
    store.send(SessionAction::Editor(EditorAction::EndStroke))?;

    store.state(|s| print!("{}", SeatChart::new(s.layout())));
    println!();
    print!("{}", store.state(|s| chart::legend(s.layout().categories())));

    // Step 2: schedule and sell
    println!("\n2. Scheduling 10:00 and 14:00, selling B1 and holding B2\n");
    store.send(SessionAction::SaveSchedule {
        requests: vec![ShowtimeRequest::new("10:00"), ShowtimeRequest::new("14:00")],
    })?;
    let morning = store.state(|s| s.schedule.find_by_time("10:00").map(|st| st.id));
    let Some(morning) = morning else {
        return Err("10:00 showtime missing after save".into());
    };
    store.send(SessionAction::BookSeat {
        showtime: morning,
        label: "B1".to_string(),
    })?;
    store.send(SessionAction::SelectSeat {
        showtime: morning,
        label: "B2".to_string(),
    })?;
    print_showtime(&store, morning);

    // Step 3: an edit that would strand B1
    println!("\n3. Painting B1 as an aisle\n");
    store.send(SessionAction::Editor(EditorAction::SetActiveCategory {
        kind: SeatKind::Aisle,
    }))?;
    store.send(SessionAction::Editor(EditorAction::PaintCell { row: 1, col: 0 }))?;
    if let Some(error) = store.state(|s| s.last_error.clone()) {
        println!("   Refused: {error}");
    }

    // Step 4: grow the room
    println!("\n4. Adding a row and two columns\n");
    let (rows, cols) = store.state(|s| s.layout().dimensions());
    let processed = store.send(SessionAction::Editor(EditorAction::Resize {
        rows: rows + 1,
        cols: cols + 2,
    }))?;
    println!("   {processed} action(s) processed");
    if let Some(report) = store.state(|s| s.last_report.clone()) {
        println!(
            "   reconciled: {} preserved, {} reshaped, {} forfeited",
            report.preserved.len(),
            report.reshaped.len(),
            report.forfeited.len()
        );
    }
    print_showtime(&store, morning);

    // Step 5: persistence
    println!("\n5. Saving and reloading the venue\n");
    let json = store.state(|s| snapshot::save_venue(s.layout(), &s.schedule))?;
    let (venue, repairs) = snapshot::load_venue(&json, clock.now())?;
    println!(
        "   {} bytes, {} showtime(s), {} repair(s)",
        json.len(),
        venue.schedule.len(),
        repairs.len()
    );

    println!("\n============================================");
    println!("   Demo complete");
    println!("============================================\n");
    Ok(())
}

fn print_showtime(
    store: &Store<VenueSessionState, SessionAction, SessionEnvironment, VenueSessionReducer>,
    id: seatplan::ShowtimeId,
) {
    store.state(|s| {
        if let Some(showtime) = s.schedule.get(id) {
            println!("   Showtime {} ({}):", showtime.time, showtime.id);
            print!("{}", SeatChart::new(s.layout()).with_status(&showtime.seat_status));
        }
    });
}
