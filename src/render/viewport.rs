/// Terminal width below which the compact layout is used.
pub const DEFAULT_NARROW_BREAKPOINT: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viewport {
    Narrow,
    #[default]
    Wide,
}

impl Viewport {
    pub fn for_columns(columns: usize, breakpoint: usize) -> Self {
        if columns < breakpoint {
            Viewport::Narrow
        } else {
            Viewport::Wide
        }
    }

    pub fn is_narrow(self) -> bool {
        self == Viewport::Narrow
    }
}
