//! SVG markup for the synthetic logo.
//!
//! The drawing uses a fixed 400x400 view box; `size` only sets the output
//! pixel dimensions.

use super::color::Rgb;

const VIEW_BOX: u32 = 400;

/// Everything the markup depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoLayout {
    pub business_name: String,
    pub initials: String,
    pub primary: Rgb,
    pub gradient_end: Rgb,
    pub initials_color: Rgb,
    pub style: String,
    pub size: u32,
}

struct Typeface {
    family: &'static str,
    initials_weight: u16,
}

fn typeface(style: &str) -> Typeface {
    match style.trim().to_lowercase().as_str() {
        "vintage" | "classic" | "elegant" => Typeface {
            family: "Georgia, 'Times New Roman', serif",
            initials_weight: 700,
        },
        "bold" => Typeface {
            family: "Arial, Helvetica, sans-serif",
            initials_weight: 900,
        },
        _ => Typeface {
            family: "Arial, Helvetica, sans-serif",
            initials_weight: 700,
        },
    }
}

/// Gradient disc with centered initials and the name as a caption beneath.
pub fn render_markup(layout: &LogoLayout) -> String {
    let face = typeface(&layout.style);
    let center = VIEW_BOX / 2;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {vb} {vb}">
  <defs>
    <linearGradient id="disc" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="{primary}" stop-opacity="1"/>
      <stop offset="100%" stop-color="{end}" stop-opacity="1"/>
    </linearGradient>
  </defs>
  <circle cx="{center}" cy="170" r="140" fill="url(#disc)"/>
  <text x="{center}" y="210" font-family="{family}" font-size="110" font-weight="{weight}" text-anchor="middle" fill="{ink}">{initials}</text>
  <text x="{center}" y="360" font-family="{family}" font-size="28" font-weight="600" text-anchor="middle" fill="{primary}">{name}</text>
</svg>
"##,
        size = layout.size,
        vb = VIEW_BOX,
        primary = layout.primary,
        end = layout.gradient_end,
        center = center,
        family = face.family,
        weight = face.initials_weight,
        ink = layout.initials_color,
        initials = escape_xml(&layout.initials),
        name = escape_xml(&layout.business_name),
    )
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
            c => out.push(c),
        }
    }
    out
}
