use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Turn a key press into the full replacement input to hand to the tracker.
///
/// Returns `None` for keys that do not edit the text. The candidate is not
/// truncated here; the tracker rejects anything longer than the snippet.
pub fn candidate_input(current: &str, key: &KeyEvent) -> Option<String> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    let mut next = current.to_string();
    match key.code {
        KeyCode::Char(c) => next.push(c),
        KeyCode::Enter => next.push('\n'),
        KeyCode::Tab => next.push('\t'),
        KeyCode::Backspace => {
            next.pop()?;
        }
        _ => return None,
    }
    Some(next)
}
