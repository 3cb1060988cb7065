use komichi_core::Direction;

/// Maps a raw `KeyboardEvent::key` value to a movement request. Unrecognized
/// keys map to nothing; held-key auto-repeat is filtered at the listener.
pub(crate) fn direction_for_key(key: &str) -> Option<Direction> {
    use Direction::*;
    match key {
        "ArrowUp" | "w" | "W" => Some(Up),
        "ArrowDown" | "s" | "S" => Some(Down),
        "ArrowLeft" | "a" | "A" => Some(Left),
        "ArrowRight" | "d" | "D" => Some(Right),
        _ => None,
    }
}
