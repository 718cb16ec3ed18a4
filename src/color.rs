//! Chart colour parsing: named colours, `#rgb`/`#rrggbb`, or `[r,g,b]` float arrays.

/// Fill used when a chart does not ask for a colour.
pub const DEFAULT_COLOR: &str = "#4c78a8";

/// Palette cycled through for pie slices.
pub const PALETTE: [&str; 8] = [
    "#4c78a8", "#f58518", "#54a24b", "#e45756", "#72b7b2", "#eeca3b", "#b279a2", "#9d755d",
];

/// Normalise a colour to a CSS colour string, or `None` if it is not recognised.
pub fn parse_color(val: &str) -> Option<String> {
    let val = val.trim();
    if val.starts_with('[') && val.ends_with(']') {
        // [r,g,b] with components in 0.0..=1.0, e.g. [1.0, 0.41, 0.38]
        let inner = &val[1..val.len() - 1];
        let parts: Vec<f32> = inner
            .split(',')
            .map(|s| s.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        if parts.len() != 3 || parts.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return None;
        }
        let [r, g, b] = [parts[0], parts[1], parts[2]].map(|c| (c * 255.0).round() as u8);
        return Some(format!("#{r:02x}{g:02x}{b:02x}"));
    }
    if let Some(hex) = val.strip_prefix('#') {
        let ok = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
        return ok.then(|| format!("#{}", hex.to_ascii_lowercase()));
    }
    let named = match val.to_ascii_lowercase().as_str() {
        "white" => "#ffffff",
        "black" => "#000000",
        "red" => "#ff0000",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "orange" => "#ffa500",
        "cyan" => "#00ffff",
        "magenta" => "#ff00ff",
        "lightblue" => "#add8e6",
        "darkgreen" => "#006400",
        "gray" | "grey" => "#808080",
        "lightgray" | "lightgrey" => "#d3d3d3",
        "darkgray" | "darkgrey" => "#a9a9a9",
        "brown" => "#a52a2a",
        "purple" => "#800080",
        "pink" => "#ffc0cb",
        "lime" => "#00ff00",
        "navy" => "#000080",
        "teal" => "#008080",
        "olive" => "#808000",
        "maroon" => "#800000",
        "silver" => "#c0c0c0",
        _ => return None,
    };
    Some(named.to_string())
}
