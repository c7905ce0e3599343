use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Fixed placeholder canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;
/// Fixed placeholder canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 600;

const CAPTION_MAX_CHARS: usize = 80;
const GENERIC_CAPTION: &str = "Article illustration";

/// Renders a deterministic SVG placeholder embedding the prompt as a caption
/// and returns it as a self-contained `data:` URL.
///
/// This is the terminal fallback of the provider chain: it has no external
/// dependency, so consumers always receive a renderable reference.
pub fn placeholder_image(prompt: &str) -> String {
    let caption = caption_for(prompt);
    let svg = format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
            r##"<rect width="{w}" height="{h}" fill="#1f2430"/>"##,
            r##"<circle cx="{cx}" cy="230" r="90" fill="#3a4664"/>"##,
            r##"<circle cx="{cx}" cy="230" r="56" fill="#55679a"/>"##,
            r##"<text x="{cx}" y="420" text-anchor="middle" font-family="sans-serif" font-size="24" fill="#e8eaf0">{caption}</text>"##,
            r##"</svg>"##
        ),
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
        cx = CANVAS_WIDTH / 2,
        caption = caption,
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn caption_for(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return GENERIC_CAPTION.to_string();
    }
    let truncated: String = trimmed.chars().take(CAPTION_MAX_CHARS).collect();
    escape_xml(&truncated)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
