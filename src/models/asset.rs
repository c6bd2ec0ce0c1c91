use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which generator produced an asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    Restyle,
    Create,
    Ugc,
}

/// Review marker. Red is rejected, yellow needs review, green is approved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewLabel {
    #[serde(alias = "rejected")]
    #[strum(to_string = "red", serialize = "rejected")]
    Red,
    #[serde(alias = "review", alias = "needs-review")]
    #[strum(to_string = "yellow", serialize = "review", serialize = "needs-review")]
    Yellow,
    #[serde(alias = "approved")]
    #[strum(to_string = "green", serialize = "approved")]
    Green,
}

/// A generated output tracked for review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub label: ReviewLabel,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

/// Everything about an asset except what the store assigns.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    #[garde(length(min = 1, max = 4096), custom(asset_url))]
    pub url: String,

    #[serde(rename = "type")]
    #[garde(skip)]
    pub kind: AssetKind,

    #[serde(default = "default_label")]
    #[garde(skip)]
    pub label: ReviewLabel,

    #[serde(default)]
    #[garde(length(max = 4000))]
    pub prompt: Option<String>,

    #[serde(default)]
    #[garde(length(max = 200))]
    pub actor: Option<String>,

    #[serde(default)]
    #[garde(length(max = 200))]
    pub product: Option<String>,
}

/// Absolute http(s) URL or a path under `/public/`, with no quoting or
/// markup characters.
fn asset_url(value: &str, _: &()) -> garde::Result {
    let allowed_prefix = ["https://", "http://", "/public/"]
        .iter()
        .any(|prefix| value.starts_with(prefix));
    if !allowed_prefix {
        return Err(garde::Error::new(
            "must be an http(s) URL or a /public/ path",
        ));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '`'))
    {
        return Err(garde::Error::new("contains characters not allowed in a URL"));
    }
    Ok(())
}

fn default_label() -> ReviewLabel {
    ReviewLabel::Yellow
}

impl NewAsset {
    pub fn generated(url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            kind,
            label: ReviewLabel::Yellow,
            prompt: None,
            actor: None,
            product: None,
        }
    }
}

/// Asset library query. Every set field must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    #[serde(default, rename = "type")]
    pub kind: Option<AssetKind>,
    #[serde(default)]
    pub label: Option<ReviewLabel>,
    #[serde(default)]
    pub search: Option<String>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        if self.kind.is_some_and(|k| k != asset.kind) {
            return false;
        }
        if self.label.is_some_and(|l| l != asset.label) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&asset.prompt, &asset.actor, &asset.product]
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Per-label totals shown above the asset grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelCounts {
    pub total: usize,
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}
