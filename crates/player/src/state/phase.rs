/// Interaction controller state: `Idle -> Sending -> Appended | ErroredDisplayed`.
///
/// `Appended` and `ErroredDisplayed` are resting states; the next send moves
/// back through `Sending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    Sending,
    Appended,
    ErroredDisplayed,
}

impl InteractionPhase {
    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending)
    }
}
