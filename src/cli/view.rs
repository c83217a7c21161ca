use crate::cli::commands::Globals;
use crate::cli::Session;
use crate::error::TodoError;
use crate::output;
use crate::view;

pub fn run(show_completed: bool, globals: &Globals) -> i32 {
    super::finish(run_inner(show_completed, globals), globals.json)
}

fn run_inner(show_completed: bool, globals: &Globals) -> Result<i32, TodoError> {
    let today = globals.today()?;
    let session = Session::open(globals)?;
    let locale = globals.locale(&session.config);
    let store = session.store()?;
    let rendered = view::render(store.tasks(), today, &locale);

    if globals.json {
        output::json::print(&output::json::success(output::json::view_json(&rendered)));
    } else {
        output::text::print_view(&rendered, show_completed);
    }
    Ok(0)
}
