use egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(0x64, 0x6c, 0xff);
pub const POSITIVE: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);
pub const NEGATIVE: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
pub const ERROR: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);

pub fn tone_color(tone: &str) -> Color32 {
    match tone {
        "positive" => POSITIVE,
        "negative" => NEGATIVE,
        _ => ACCENT,
    }
}
