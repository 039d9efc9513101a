// Simple hue based color for the background particles, rendered as a CSS hsl() string.
// Every particle sits somewhere in the cyan/blue band.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Color {
    pub const MIN_HUE: f64 = 180.0;
    pub const HUE_SPREAD: f64 = 60.0;
    const SATURATION: f64 = 70.0;
    const LIGHTNESS: f64 = 60.0;

    // `offset` is expected in [0, 1) and picks a hue inside the band
    pub fn in_band(offset: f64) -> Color {
        Color {
            hue: Color::MIN_HUE + offset.clamp(0.0, 1.0) * Color::HUE_SPREAD,
            saturation: Color::SATURATION,
            lightness: Color::LIGHTNESS,
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}
