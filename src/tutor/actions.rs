/// Generic next steps offered after every tutor exchange.
pub const BASE_ACTIONS: [&str; 4] = [
    "Try a practice exercise",
    "Take a quiz",
    "See an example",
    "Move to next topic",
];

/// Suggested next steps, led by a continuation action when a lesson is active.
pub fn generate_suggested_actions(lesson_id: Option<&str>) -> Vec<String> {
    let base = BASE_ACTIONS.iter().map(|action| action.to_string());

    match lesson_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(lesson) => std::iter::once(format!("Continue learning about {}", lesson))
            .chain(base)
            .collect(),
        None => base.collect(),
    }
}
