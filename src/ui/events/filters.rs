use crate::engine::{FilterKey, SessionContext, keys, session::TIME_RANGES};

/// Advance `key` to the next option for the current provider. Returns the new
/// value, or `None` when the key does not apply to this provider.
pub(super) fn cycle_filter(session: &mut SessionContext, key: FilterKey) -> Option<String> {
    let provider = session.current_provider();
    if !FilterKey::native_to(provider).contains(&key) {
        return None;
    }

    let options = match session.registry().filter_options(provider, key) {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(%err, ?key, "no filter options");
            return None;
        }
    };

    let current = session.filter_scope().get(key).to_string();
    let next = next_option(&options, &current)?;
    session.set_filter(key, next.clone());
    Some(next)
}

pub(super) fn cycle_time_range(session: &mut SessionContext) -> Option<String> {
    let current = session.get_text(keys::TIME_RANGE, "Last 30 Days").to_string();
    let options: Vec<String> = TIME_RANGES.iter().map(|s| s.to_string()).collect();
    let next = next_option(&options, &current)?;
    session.set(keys::TIME_RANGE, next.clone()).ok()?;
    Some(next)
}

pub(super) fn toggle_mode(session: &mut SessionContext) -> Option<String> {
    let next = match session.get_text(keys::MODE, "Live") {
        "Live" => "Demo",
        _ => "Live",
    };
    session.set(keys::MODE, next).ok()?;
    Some(next.to_string())
}

pub(super) fn toggle_flag(session: &mut SessionContext, key: &str) -> Option<bool> {
    let next = !session.get_bool(key, false);
    session.set(key, next).ok()?;
    Some(next)
}

/// Option after `current`, wrapping. Unknown values restart at the first option.
fn next_option(options: &[String], current: &str) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = match options.iter().position(|o| o == current) {
        Some(i) => (i + 1) % options.len(),
        None => 0,
    };
    Some(options[next].clone())
}
