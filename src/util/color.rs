/// Dark text used on light tab colors
pub const DARK_TEXT: &str = "#323130";
/// Light text used on dark tab colors
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// Parse `#RRGGBB` (the `#` is optional) into components
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Pick readable text for a card painted with `tab_color` (YIQ luminance).
/// No color, or one that can't be parsed, is drawn on white ⇒ dark text.
pub fn contrast_text_color(tab_color: Option<&str>) -> &'static str {
    let Some((r, g, b)) = tab_color.and_then(parse_hex_rgb) else {
        return DARK_TEXT;
    };
    let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    if yiq >= 128 { DARK_TEXT } else { LIGHT_TEXT }
}
