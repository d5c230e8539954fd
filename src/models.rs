// Data structures shared across the store and route handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of body-type categories a listing can carry.
/// Stored as-is (e.g. "SUV"); facet labels are the uppercased form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Hatchback,
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    #[serde(rename = "MUV")]
    Muv,
    Van,
    Pickup,
    #[serde(rename = "LCV")]
    Lcv,
}

impl BodyType {
    /// The stored (case-sensitive) form of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Hatchback => "Hatchback",
            BodyType::Sedan => "Sedan",
            BodyType::Suv => "SUV",
            BodyType::Muv => "MUV",
            BodyType::Van => "Van",
            BodyType::Pickup => "Pickup",
            BodyType::Lcv => "LCV",
        }
    }

    /// Uppercased label used as the facet bucket key.
    pub fn facet_label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

// A single car inventory record
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub fuel_type: String, // Petrol, Diesel, CNG, Electric
    pub transmission: String, // Manual, Automatic
    pub kilometers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>, // e.g., "18 kmpl"
    #[serde(default)]
    pub images: Vec<String>, // Array of image URLs
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

// Payload for creating a listing; the server assigns id and createdAt.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub fuel_type: String,
    pub transmission: String,
    pub kilometers: u64,
    #[serde(default)]
    pub registration_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body_type: Option<BodyType>,
    #[serde(default)]
    pub mileage: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

// Partial update payload; only fields that are present change.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<u64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub kilometers: Option<u64>,
    pub registration_year: Option<i32>,
    pub description: Option<String>,
    pub body_type: Option<BodyType>,
    pub mileage: Option<String>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

// Site-wide display configuration edited from the admin panel.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub happy_customers: u64,
    pub business_address: String,
    pub business_phone: String,
    pub business_whatsapp: String,
    pub business_email: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigUpdate {
    pub happy_customers: Option<u64>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_whatsapp: Option<String>,
    pub business_email: Option<String>,
}

// Credentials submitted to POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
