//! UI element lookup used by location-dependent rules.

/// What sits under a click, as reported by an accessibility/UI-automation
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionLabel {
    ColumnHeader,
    RowHeader,
    SheetTab,
    Cell { column: String, row: u32 },
    MenuItem(String),
    ToolbarButton(String),
}

impl RegionLabel {
    /// Spreadsheet cells are exposed with their address as element name
    /// (`"B6"`, `"AA10"`). Returns `None` for anything else.
    pub fn cell_from_name(name: &str) -> Option<Self> {
        let (column, row) = parse_cell_address(name)?;
        Some(RegionLabel::Cell { column, row })
    }
}

/// Splits `"B6"` into `("B", 6)`. Letters must come first, then digits only.
pub fn parse_cell_address(name: &str) -> Option<(String, u32)> {
    let name = name.trim();
    let split = name.find(|c: char| c.is_ascii_digit())?;
    let (column, row) = name.split_at(split);
    if column.is_empty() || column.len() > 3 || !column.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !row.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u32 = row.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column.to_ascii_uppercase(), row))
}

pub trait ElementLocator: Send + Sync {
    fn locate(&self, x: i32, y: i32, app_context: &str) -> Option<RegionLabel>;
}

/// Locator for platforms without UI automation; location rules never fire.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLocator;

impl ElementLocator for NullLocator {
    fn locate(&self, _x: i32, _y: i32, _app_context: &str) -> Option<RegionLabel> {
        None
    }
}

impl<F> ElementLocator for F
where
    F: Fn(i32, i32, &str) -> Option<RegionLabel> + Send + Sync,
{
    fn locate(&self, x: i32, y: i32, app_context: &str) -> Option<RegionLabel> {
        self(x, y, app_context)
    }
}
