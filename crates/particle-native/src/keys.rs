use particle_core::Shape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    SelectShape(Shape),
    ToggleRainbow,
    NextColor,
}

/// Map a typed character to a configuration change.
#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "1" => Some(KeyAction::SelectShape(Shape::Heart)),
        "2" => Some(KeyAction::SelectShape(Shape::Star)),
        "3" => Some(KeyAction::SelectShape(Shape::Flower)),
        "4" => Some(KeyAction::SelectShape(Shape::Tree)),
        "5" => Some(KeyAction::SelectShape(Shape::Planet)),
        "6" => Some(KeyAction::SelectShape(Shape::Firework)),
        "7" => Some(KeyAction::SelectShape(Shape::Random)),
        "r" | "R" => Some(KeyAction::ToggleRainbow),
        "c" | "C" => Some(KeyAction::NextColor),
        _ => None,
    }
}
