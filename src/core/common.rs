pub type Index = usize;
pub type Color = u32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub background: Color,
    pub header: Color,
    pub vacant: Color,
    pub occupied: Color,
    pub selected: Color,
    pub text: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
