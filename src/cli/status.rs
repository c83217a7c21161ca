use serde_json::json;

use crate::cli::commands::Globals;
use crate::cli::Session;
use crate::error::TodoError;
use crate::output;
use crate::schedule::locale;

pub fn run(globals: &Globals) -> i32 {
    super::finish(run_inner(globals), globals.json)
}

fn run_inner(globals: &Globals) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let locale = globals.locale(&session.config);
    let week_start = locale::week_start_for(&locale);
    let store = session.store()?;

    let total = store.tasks().len();
    let active = store.active_count();
    let completed = store.completed().count();
    let recurring = store.rules().len();

    if globals.json {
        output::json::print(&output::json::success(json!({
            "list": output::json::list_json(&session.list),
            "counts": {
                "active": active,
                "completed": completed,
                "total": total,
                "recurring": recurring
            },
            "locale": locale,
            "week_start": week_start.as_str()
        })));
    } else {
        println!("List: {} ({})", session.list.name, session.list.id);
        println!("  Active: {active}  Completed: {completed}  Total: {total}");
        println!("  Recurring: {recurring}");
        println!("  Locale: {locale} (week starts {})", week_start.as_str());
    }
    Ok(0)
}
