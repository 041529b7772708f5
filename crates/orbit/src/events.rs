use carousel::{Gesture, Mode};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Gesture(Gesture),
    SetMode(Mode),
    ConfigReload,
}
