// Week Planner
// Headless shell: loads the persisted schedule and prints a week overview

use anyhow::Result;

use week_planner::services::session::PlannerSession;
use week_planner::services::storage::FileStore;
use week_planner::utils::time::format_time;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Week Planner");

    let data_dir = FileStore::default_dir()?;
    let store = FileStore::open(&data_dir)?;
    let session = PlannerSession::open(Box::new(store));

    let config = session.config();
    println!(
        "Schedule {} - {} | {} day(s), {} event(s)",
        format_time(config.start_minutes, config.use12h, false),
        format_time(config.end_minutes, config.use12h, true),
        config.days().len(),
        session.events().len()
    );

    for &day in config.days() {
        let mut todays: Vec<_> = session
            .events()
            .iter()
            .filter(|event| event.day == day)
            .collect();
        todays.sort_by_key(|event| event.start);

        println!("{day}");
        for event in todays {
            println!(
                "  {} - {}  {}",
                format_time(event.start, config.use12h, false),
                format_time(event.end, config.use12h, true),
                event.title
            );
        }
    }

    Ok(())
}
