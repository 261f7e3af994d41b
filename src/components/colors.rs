use crate::color::Color;

// ============================================================================
// PALETTE — named material swatches
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub name: String,
    pub color: Color,
}

/// Selectable colors fed by the material loader, plus which one matches the
/// current drawing color.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    swatches: Vec<Swatch>,
    selected: Option<usize>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a swatch. Exact duplicates (same name and color) are skipped and
    /// reported as `false`.
    pub fn add(&mut self, name: &str, color: Color) -> bool {
        if self.swatches.iter().any(|s| s.name == name && s.color == color) {
            return false;
        }
        self.swatches.push(Swatch {
            name: name.to_string(),
            color,
        });
        true
    }

    /// Add a material whose color is an `AARRGGBB` string.
    pub fn add_argb(&mut self, name: &str, argb: &str) -> bool {
        self.add(name, Color::from_argb_hex(argb))
    }

    /// Bulk load `(name, argb)` pairs. Returns how many swatches were added.
    pub fn load_materials<'a, I>(&mut self, materials: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let before = self.swatches.len();
        for (name, argb) in materials {
            self.add_argb(name, argb);
        }
        let added = self.swatches.len() - before;
        crate::log_info!("Loaded {} material swatches ({} total)", added, self.swatches.len());
        added
    }

    /// Drop every swatch.
    pub fn clear(&mut self) {
        self.swatches.clear();
        self.selected = None;
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Swatch> {
        self.swatches.iter().find(|s| s.name == name)
    }

    /// Select by index; returns the swatch color.
    pub fn select(&mut self, index: usize) -> Option<Color> {
        let color = self.swatches.get(index)?.color;
        self.selected = Some(index);
        Some(color)
    }

    pub fn selected(&self) -> Option<&Swatch> {
        self.selected.and_then(|i| self.swatches.get(i))
    }

    /// Highlight the first swatch whose color equals `color` (if any).
    pub fn sync_selection(&mut self, color: Color) {
        if self.selected().is_some_and(|s| s.color == color) {
            return;
        }
        self.selected = self.swatches.iter().position(|s| s.color == color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_need_same_name_and_color() {
        let mut palette = Palette::new();
        assert!(palette.add("sand", Color::from_rgb(0xE0, 0xC0, 0x80)));
        assert!(!palette.add("sand", Color::from_rgb(0xE0, 0xC0, 0x80)));
        assert!(palette.add("sand", Color::WHITE));
        assert!(palette.add("dune", Color::from_rgb(0xE0, 0xC0, 0x80)));
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn materials_drop_alpha_and_fall_back_to_black() {
        let mut palette = Palette::new();
        let added = palette.load_materials([("blood", "7fFF0000"), ("bad", "123"), ("blood", "ffFF0000")]);
        assert_eq!(added, 2);
        assert_eq!(palette.find("blood").map(|s| s.color), Some(Color::RED));
        assert_eq!(palette.find("bad").map(|s| s.color), Some(Color::BLACK));
    }

    #[test]
    fn selection_follows_color() {
        let mut palette = Palette::new();
        palette.add("a", Color::RED);
        palette.add("b", Color::GREEN);
        assert_eq!(palette.select(1), Some(Color::GREEN));
        assert_eq!(palette.select(9), None);
        palette.sync_selection(Color::RED);
        assert_eq!(palette.selected().map(|s| s.name.as_str()), Some("a"));
        palette.sync_selection(Color::BLUE);
        assert!(palette.selected().is_none());
        palette.clear();
        assert!(palette.is_empty());
    }
}
