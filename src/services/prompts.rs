//! Prompt text and reference-image payloads sent to the image and video models.

use base64::Engine;

/// Lighting direction shared by every photo generator.
pub const LIGHTING_STYLE: &str = "covered under intense, direct midday sun from high above, \
creating high-contrast, razor-sharp shadows and bright, brilliant highlights. With green elements";

/// Number of independent jobs behind one create-photo request.
pub const PHOTO_VARIATIONS: usize = 4;

pub fn restyle_prompt() -> String {
    format!("update the lighting prompt for this image {LIGHTING_STYLE}")
}

/// User prompt flattened to one line with quotes escaped, plus the lighting style.
pub fn photo_prompt(prompt: &str) -> String {
    let clean = prompt.replace('\n', " ").replace('"', "\\\"");
    format!("{clean}. {LIGHTING_STYLE}")
}

/// `index` is zero-based; the suffix counts from one.
pub fn photo_variation(base: &str, index: usize) -> String {
    format!("{base} (variation {})", index + 1)
}

pub fn ugc_prompt(actor: &str, product: &str) -> String {
    format!(
        "Create a UGC-style vertical video thumbnail of {actor} in a cozy modern living room, \
holding and presenting a {product}. Natural lighting, authentic casual setting, friendly \
expression, looking at camera. Professional but relatable UGC content creator aesthetic. \
{LIGHTING_STYLE}"
    )
}

/// Turn an inline image into a data URI.
///
/// Values that already are data URIs pass through. Bare base64 gets the MIME
/// type sniffed from its magic bytes, or `fallback_mime` when the bytes do not
/// look like a known image format.
pub fn image_data_uri(image: &str, fallback_mime: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") {
        return image.to_string();
    }

    let mime = base64::engine::general_purpose::STANDARD
        .decode(image)
        .ok()
        .and_then(|bytes| image::guess_format(&bytes).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or(fallback_mime);

    format!("data:{mime};base64,{image}")
}
