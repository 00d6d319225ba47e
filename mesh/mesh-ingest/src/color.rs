//! Surface colours and the rotating palette new surfaces draw from.

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::opaque(255, 255, 0);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::opaque(255, 0, 255);
    /// Opaque cyan.
    pub const CYAN: Self = Self::opaque(0, 255, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::opaque(0, 255, 0);

    /// Create an opaque colour.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels scaled to `[0, 1]`, in RGBA order.
    #[must_use]
    pub fn to_f32(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }
}

/// Hands out palette colours in a fixed rotation.
///
/// The cycle is a plain value owned by the caller and passed to every load
/// that needs a colour; two cycles never affect each other.
///
/// # Example
///
/// ```
/// use mesh_ingest::{Color, ColorCycle};
///
/// let mut cycle = ColorCycle::new();
/// assert_eq!(cycle.next_color(), Color::RED);
/// assert_eq!(cycle.next_color(), Color::YELLOW);
///
/// for _ in 0..4 {
///     cycle.next_color();
/// }
/// // Wrapped around.
/// assert_eq!(cycle.next_color(), Color::RED);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCycle {
    position: usize,
}

impl ColorCycle {
    /// Palette order.
    pub const PALETTE: [Color; 6] = [
        Color::RED,
        Color::YELLOW,
        Color::MAGENTA,
        Color::CYAN,
        Color::BLUE,
        Color::GREEN,
    ];

    /// Cycle starting at the first palette entry.
    #[must_use]
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// Cycle starting at an arbitrary position (taken modulo the palette size).
    #[must_use]
    pub const fn starting_at(position: usize) -> Self {
        Self {
            position: position % Self::PALETTE.len(),
        }
    }

    /// The colour the next call to [`ColorCycle::next_color`] will return.
    #[must_use]
    pub const fn peek(&self) -> Color {
        Self::PALETTE[self.position]
    }

    /// Take the current colour and advance.
    pub fn next_color(&mut self) -> Color {
        let color = self.peek();
        self.position = (self.position + 1) % Self::PALETTE.len();
        color
    }

    /// Go back to the first palette entry.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_order() {
        let mut cycle = ColorCycle::new();
        let drawn: Vec<Color> = (0..6).map(|_| cycle.next_color()).collect();
        assert_eq!(drawn, ColorCycle::PALETTE.to_vec());
        assert_eq!(cycle.peek(), Color::RED);
    }

    #[test]
    fn cycles_are_independent() {
        let mut a = ColorCycle::new();
        let mut b = ColorCycle::new();
        a.next_color();
        a.next_color();
        assert_eq!(b.next_color(), Color::RED);
        assert_eq!(a.next_color(), Color::MAGENTA);
    }

    #[test]
    fn starting_at_wraps() {
        assert_eq!(ColorCycle::starting_at(7).peek(), Color::YELLOW);
        let mut cycle = ColorCycle::starting_at(5);
        assert_eq!(cycle.next_color(), Color::GREEN);
        cycle.reset();
        assert_eq!(cycle.peek(), Color::RED);
    }

    #[test]
    fn all_palette_colours_opaque() {
        assert!(ColorCycle::PALETTE.iter().all(|c| c.a == 255));
        assert_eq!(Color::CYAN.to_f32(), [0.0, 1.0, 1.0, 1.0]);
    }
}
