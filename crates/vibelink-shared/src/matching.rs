use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{BIO_WEIGHT, EARTH_RADIUS_KM, HASHTAG_WEIGHT, INTEREST_WEIGHT, LOCATION_WEIGHT};
use crate::models::{DiscoverUser, UserProfile};
use crate::types::Coordinates;

/// The inputs the compatibility score looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchProfile {
    pub hashtags: Vec<String>,
    pub interests: Vec<String>,
    pub bio: String,
    pub coordinates: Option<Coordinates>,
    pub radius_km: f64,
}

impl MatchProfile {
    // Server profiles carry no separate interest list.
    pub fn from_user(user: &UserProfile, radius_km: f64) -> Self {
        Self {
            hashtags: user.hashtags.clone(),
            interests: Vec::new(),
            bio: user.bio.clone().unwrap_or_default(),
            coordinates: user.coordinates(),
            radius_km,
        }
    }

    pub fn from_candidate(candidate: &DiscoverUser, radius_km: f64) -> Self {
        Self {
            hashtags: candidate.hashtags.clone(),
            interests: Vec::new(),
            bio: candidate.bio.clone().unwrap_or_default(),
            coordinates: candidate.coordinates(),
            radius_km,
        }
    }
}

/// Weighted score plus the contribution of each component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Rounded total, 0..=100.
    pub score: u8,
    pub hashtags: f64,
    pub interests: f64,
    pub location: f64,
    pub bio: f64,
}

impl MatchScore {
    pub fn raw_total(&self) -> f64 {
        self.hashtags + self.interests + self.location + self.bio
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

// |A ∩ B| / max(|A|, |B|), zero when either side is empty.
fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let larger = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    a.intersection(b).count() as f64 / larger as f64
}

fn tag_set(items: &[String]) -> BTreeSet<String> {
    items.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn bio_tokens(bio: &str) -> BTreeSet<String> {
    bio.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn location_fraction(a: &MatchProfile, b: &MatchProfile) -> f64 {
    let (Some(ca), Some(cb)) = (a.coordinates, b.coordinates) else {
        return 0.0;
    };
    let distance = haversine_km(ca, cb);
    let radius = a.radius_km.max(b.radius_km);
    if radius <= 0.0 {
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance / radius).max(0.0)
}

/// Pure, symmetric compatibility score between two profiles.
pub fn compute_match(a: &MatchProfile, b: &MatchProfile) -> MatchScore {
    let hashtags = overlap(&tag_set(&a.hashtags), &tag_set(&b.hashtags)) * HASHTAG_WEIGHT;
    let interests = overlap(&tag_set(&a.interests), &tag_set(&b.interests)) * INTEREST_WEIGHT;
    let location = location_fraction(a, b) * LOCATION_WEIGHT;
    let bio = overlap(&bio_tokens(&a.bio), &bio_tokens(&b.bio)) * BIO_WEIGHT;

    let total = (hashtags + interests + location + bio).round().clamp(0.0, 100.0);

    MatchScore {
        score: total as u8,
        hashtags,
        interests,
        location,
        bio,
    }
}
