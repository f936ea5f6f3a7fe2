//! Weather icon codes mapped to display glyphs.

/// Map an OpenWeather icon code (e.g. "01d", "10n") to a display glyph.
///
/// The code set is closed; anything unrecognized falls back to a neutral
/// sun-behind-cloud glyph.
pub fn glyph(code: &str) -> &'static str {
    match code {
        "01d" => "\u{2600}\u{fe0f}",            // clear sky (day)
        "01n" => "\u{1f319}",                   // clear sky (night)
        "02d" => "\u{26c5}",                    // few clouds (day)
        "02n" | "03d" | "03n" | "04d" | "04n" => "\u{2601}\u{fe0f}",
        "09d" | "09n" | "10n" => "\u{1f327}\u{fe0f}", // rain
        "10d" => "\u{1f326}\u{fe0f}",           // rain (day)
        "11d" | "11n" => "\u{26c8}\u{fe0f}",    // thunderstorm
        "13d" | "13n" => "\u{2744}\u{fe0f}",    // snow
        "50d" | "50n" => "\u{1f32b}\u{fe0f}",   // mist
        _ => "\u{1f324}\u{fe0f}",
    }
}
