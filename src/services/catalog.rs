// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Static spot catalog loading.
//!
//! The catalog is a JSON document with two arrays, `study_spots` and
//! `recreation_spots`. It backs the assistant's catalog answers and seeds an
//! empty spot table.

use crate::models::{NewSpot, SpotCategory};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Field value used when a catalog entry leaves it out.
pub const UNKNOWN: &str = "unknown";

/// One catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSpot {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub noise_level: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub seating: Option<String>,
}

/// Loaded study and recreation catalog.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SpotCatalog {
    #[serde(default)]
    study_spots: Vec<CatalogSpot>,
    #[serde(default)]
    recreation_spots: Vec<CatalogSpot>,
}

impl SpotCatalog {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let catalog: SpotCatalog = serde_json::from_str(json_data)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        tracing::info!(
            study = catalog.study_spots.len(),
            recreation = catalog.recreation_spots.len(),
            "Loaded spot catalog"
        );
        Ok(catalog)
    }

    pub fn new(study_spots: Vec<CatalogSpot>, recreation_spots: Vec<CatalogSpot>) -> Self {
        Self {
            study_spots,
            recreation_spots,
        }
    }

    pub fn study_spots(&self) -> &[CatalogSpot] {
        &self.study_spots
    }

    pub fn recreation_spots(&self) -> &[CatalogSpot] {
        &self.recreation_spots
    }

    /// Store rows for seeding. Missing category-specific fields become `"unknown"`.
    pub fn seed_spots(&self) -> Vec<NewSpot> {
        let study = self.study_spots.iter().map(|s| NewSpot {
            name: s.name.clone(),
            category: Some(SpotCategory::Study),
            location: s.location.clone(),
            activity: None,
            hours: s.hours.clone(),
            noise_level: Some(or_unknown(&s.noise_level)),
            seating: s.seating.clone(),
            amenities: s.amenities.clone(),
        });

        let recreation = self.recreation_spots.iter().map(|s| NewSpot {
            name: s.name.clone(),
            category: Some(SpotCategory::Recreation),
            location: s.location.clone(),
            activity: Some(or_unknown(&s.activity)),
            hours: s.hours.clone(),
            noise_level: s.noise_level.clone(),
            seating: s.seating.clone(),
            amenities: Some(or_unknown(&s.amenities)),
        });

        study.chain(recreation).collect()
    }
}

/// The value, or `"unknown"` when absent.
pub fn or_unknown(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),
}
