use chrono::{TimeZone, Utc};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::asset::{Asset, AssetFilter, AssetKind, LabelCounts, NewAsset, ReviewLabel};

/// In-memory asset library, newest first. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct AssetStore {
    assets: RwLock<Vec<Asset>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the demo photo and video.
    pub fn with_demo_assets() -> Self {
        let created_at = Utc
            .with_ymd_and_hms(2026, 1, 28, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);

        let demo = vec![
            Asset {
                id: "demo-photo-1".to_string(),
                url: "/public/demo/demo-photo.jpg".to_string(),
                kind: AssetKind::Create,
                label: ReviewLabel::Green,
                created_at,
                prompt: Some("Demo photo asset".to_string()),
                actor: None,
                product: None,
            },
            Asset {
                id: "demo-video-1".to_string(),
                url: "/public/demo/demo-video.mp4".to_string(),
                kind: AssetKind::Ugc,
                label: ReviewLabel::Green,
                created_at,
                prompt: Some("Demo video asset".to_string()),
                actor: None,
                product: None,
            },
        ];

        Self {
            assets: RwLock::new(demo),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Asset>> {
        self.assets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Asset>> {
        self.assets.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a new asset in front of the existing ones.
    pub fn add(&self, new: NewAsset) -> Asset {
        let asset = Asset {
            id: Uuid::new_v4().to_string(),
            url: new.url,
            kind: new.kind,
            label: new.label,
            created_at: Utc::now(),
            prompt: new.prompt,
            actor: new.actor,
            product: new.product,
        };

        self.write().insert(0, asset.clone());
        tracing::info!(asset_id = %asset.id, kind = %asset.kind, "Asset added");
        asset
    }

    /// Relabel an asset. Returns `None` and changes nothing when the id is unknown.
    pub fn update_label(&self, id: &str, label: ReviewLabel) -> Option<Asset> {
        let mut assets = self.write();
        let asset = assets.iter_mut().find(|a| a.id == id)?;
        asset.label = label;
        tracing::info!(asset_id = %id, %label, "Asset relabelled");
        Some(asset.clone())
    }

    /// Remove an asset. Unknown ids are ignored; returns whether one was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut assets = self.write();
        let before = assets.len();
        assets.retain(|a| a.id != id);
        let removed = assets.len() != before;
        if removed {
            tracing::info!(asset_id = %id, "Asset deleted");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<Asset> {
        self.read().iter().find(|a| a.id == id).cloned()
    }

    pub fn list(&self, filter: &AssetFilter) -> Vec<Asset> {
        self.read()
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> LabelCounts {
        self.read()
            .iter()
            .fold(LabelCounts::default(), |mut counts, asset| {
                counts.total += 1;
                match asset.label {
                    ReviewLabel::Red => counts.red += 1,
                    ReviewLabel::Yellow => counts.yellow += 1,
                    ReviewLabel::Green => counts.green += 1,
                }
                counts
            })
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
