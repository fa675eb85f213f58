#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateChangeError {
    StateUnchanged,
    LimitReached,
    InvalidTarget,
    AlreadyManaged,
}
