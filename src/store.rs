// JSON-snapshot document store backing the inventory, contact messages and
// site configuration. State lives behind an RwLock; every mutation rewrites
// the snapshot file atomically (temp file + rename).

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Settings;
use crate::models::{
    ContactDraft, ContactMessage, Listing, ListingDraft, ListingUpdate, SiteConfig,
    SiteConfigUpdate,
};
use crate::query::{ListingFilter, SortKey};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    listings: Vec<Listing>,
    #[serde(default)]
    messages: Vec<ContactMessage>,
    #[serde(default)]
    site_config: Option<SiteConfig>,
}

pub struct CarStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl CarStore {
    /// Load the snapshot at `path`, or start empty when the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read data file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse data file {}", path.display()))?
        } else {
            tracing::info!("Data file {} not found, starting with an empty store.", path.display());
            StoreData::default()
        };
        Ok(CarStore {
            path,
            data: RwLock::new(data),
        })
    }

    async fn persist(&self, data: &StoreData) -> Result<()> {
        let serialized =
            serde_json::to_vec_pretty(data).context("Failed to serialize store snapshot")?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &serialized)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to move snapshot into {}", self.path.display()))?;
        Ok(())
    }

    // --- Listings ---

    /// Matching listings, sorted, with offset pagination applied.
    pub async fn find_listings(
        &self,
        filter: &ListingFilter,
        sort: SortKey,
        skip: usize,
        limit: usize,
    ) -> Vec<Listing> {
        let data = self.data.read().await;
        let mut matched: Vec<&Listing> =
            data.listings.iter().filter(|l| filter.matches(l)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));
        matched.into_iter().skip(skip).take(limit).cloned().collect()
    }

    /// Total number of listings matching `filter`.
    pub async fn count_listings(&self, filter: &ListingFilter) -> u64 {
        let data = self.data.read().await;
        data.listings.iter().filter(|l| filter.matches(l)).count() as u64
    }

    /// Body-type facet over the whole collection, independent of any filter.
    /// Listings without a body type are dropped; keys are uppercased labels.
    pub async fn body_type_counts(&self) -> BTreeMap<String, u64> {
        let data = self.data.read().await;
        let mut counts = BTreeMap::new();
        for listing in &data.listings {
            if let Some(body_type) = &listing.body_type {
                *counts.entry(body_type.facet_label()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub async fn get_listing(&self, id: &str) -> Option<Listing> {
        let data = self.data.read().await;
        data.listings.iter().find(|l| l.id == id).cloned()
    }

    pub async fn insert_listing(&self, draft: ListingDraft) -> Result<Listing> {
        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            brand: draft.brand,
            price: draft.price,
            fuel_type: draft.fuel_type,
            transmission: draft.transmission,
            kilometers: draft.kilometers,
            registration_year: draft.registration_year,
            description: draft.description,
            body_type: draft.body_type,
            mileage: draft.mileage,
            images: draft.images,
            featured: draft.featured,
            created_at: Utc::now(),
        };
        let mut data = self.data.write().await;
        data.listings.push(listing.clone());
        self.persist(&data).await?;
        Ok(listing)
    }

    /// Apply a partial update; returns `None` when the id is unknown.
    pub async fn update_listing(&self, id: &str, update: ListingUpdate) -> Result<Option<Listing>> {
        let mut data = self.data.write().await;
        let Some(listing) = data.listings.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            listing.name = name;
        }
        if let Some(brand) = update.brand {
            listing.brand = brand;
        }
        if let Some(price) = update.price {
            listing.price = price;
        }
        if let Some(fuel_type) = update.fuel_type {
            listing.fuel_type = fuel_type;
        }
        if let Some(transmission) = update.transmission {
            listing.transmission = transmission;
        }
        if let Some(kilometers) = update.kilometers {
            listing.kilometers = kilometers;
        }
        if let Some(registration_year) = update.registration_year {
            listing.registration_year = Some(registration_year);
        }
        if let Some(description) = update.description {
            listing.description = Some(description);
        }
        if let Some(body_type) = update.body_type {
            listing.body_type = Some(body_type);
        }
        if let Some(mileage) = update.mileage {
            listing.mileage = Some(mileage);
        }
        if let Some(images) = update.images {
            listing.images = images;
        }
        if let Some(featured) = update.featured {
            listing.featured = featured;
        }
        let updated = listing.clone();
        self.persist(&data).await?;
        Ok(Some(updated))
    }

    /// Returns `true` when a listing was removed.
    pub async fn delete_listing(&self, id: &str) -> Result<bool> {
        let mut data = self.data.write().await;
        let before = data.listings.len();
        data.listings.retain(|l| l.id != id);
        if data.listings.len() == before {
            return Ok(false);
        }
        self.persist(&data).await?;
        Ok(true)
    }

    // --- Contact messages ---

    pub async fn insert_message(&self, draft: ContactDraft) -> Result<ContactMessage> {
        let message = ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            phone: draft.phone,
            message: draft.message,
            read: false,
            created_at: Utc::now(),
        };
        let mut data = self.data.write().await;
        data.messages.push(message.clone());
        self.persist(&data).await?;
        Ok(message)
    }

    /// All messages, newest first.
    pub async fn list_messages(&self) -> Vec<ContactMessage> {
        let data = self.data.read().await;
        let mut messages = data.messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages
    }

    pub async fn mark_message_read(&self, id: &str) -> Result<Option<ContactMessage>> {
        let mut data = self.data.write().await;
        let Some(message) = data.messages.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        message.read = true;
        let updated = message.clone();
        self.persist(&data).await?;
        Ok(Some(updated))
    }

    pub async fn delete_message(&self, id: &str) -> Result<bool> {
        let mut data = self.data.write().await;
        let before = data.messages.len();
        data.messages.retain(|m| m.id != id);
        if data.messages.len() == before {
            return Ok(false);
        }
        self.persist(&data).await?;
        Ok(true)
    }

    // --- Site configuration ---

    /// Current site configuration, seeding defaults on first read.
    pub async fn site_config(&self, settings: &Settings) -> Result<SiteConfig> {
        {
            let data = self.data.read().await;
            if let Some(config) = &data.site_config {
                return Ok(config.clone());
            }
        }
        let mut data = self.data.write().await;
        // Another request may have seeded between the two locks.
        if let Some(config) = &data.site_config {
            return Ok(config.clone());
        }
        let config = default_site_config(settings);
        data.site_config = Some(config.clone());
        self.persist(&data).await?;
        Ok(config)
    }

    pub async fn update_site_config(
        &self,
        update: SiteConfigUpdate,
        settings: &Settings,
    ) -> Result<SiteConfig> {
        let mut data = self.data.write().await;
        let mut config = data
            .site_config
            .clone()
            .unwrap_or_else(|| default_site_config(settings));
        if let Some(happy_customers) = update.happy_customers {
            config.happy_customers = happy_customers;
        }
        if let Some(business_address) = update.business_address {
            config.business_address = business_address;
        }
        if let Some(business_phone) = update.business_phone {
            config.business_phone = business_phone;
        }
        if let Some(business_whatsapp) = update.business_whatsapp {
            config.business_whatsapp = business_whatsapp;
        }
        if let Some(business_email) = update.business_email {
            config.business_email = business_email;
        }
        data.site_config = Some(config.clone());
        self.persist(&data).await?;
        Ok(config)
    }
}

fn default_site_config(settings: &Settings) -> SiteConfig {
    SiteConfig {
        happy_customers: 1000,
        business_address: settings.business_address.clone(),
        business_phone: settings.business_phone.clone(),
        business_whatsapp: settings.business_whatsapp.clone(),
        business_email: settings.business_email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BodyType;
    use crate::query::{QueryPlan, RawListingQuery};

    fn draft(name: &str, brand: &str, price: u64, body_type: Option<BodyType>) -> ListingDraft {
        ListingDraft {
            name: name.into(),
            brand: brand.into(),
            price,
            fuel_type: "Petrol".into(),
            transmission: "Manual".into(),
            kilometers: 20_000,
            registration_year: Some(2021),
            description: None,
            body_type,
            mileage: None,
            images: vec![],
            featured: false,
        }
    }

    fn test_settings() -> Settings {
        Settings {
            server_address: "127.0.0.1:0".into(),
            data_file: "unused".into(),
            jwt_secret: "test-secret".into(),
            admin_username: "admin".into(),
            admin_password_hash: String::new(),
            business_address: "123, Auto Market Road".into(),
            business_phone: "+911234567890".into(),
            business_whatsapp: "911234567890".into(),
            business_email: "info@example.com".into(),
            frontend_origin: None,
        }
    }

    async fn store_with(dir: &tempfile::TempDir, drafts: Vec<ListingDraft>) -> CarStore {
        let store = CarStore::open(dir.path().join("data.json")).unwrap();
        for draft in drafts {
            store.insert_listing(draft).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn pagination_skips_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let drafts = (0..12)
            .map(|i| draft(&format!("Car {i}"), "Toyota", 100_000 + i, None))
            .collect();
        let store = store_with(&dir, drafts).await;

        let plan = QueryPlan::from_raw(RawListingQuery::default());
        let page1 = store
            .find_listings(&plan.filter, plan.sort, plan.skip(), plan.limit as usize)
            .await;
        assert_eq!(page1.len(), 9);

        let total = store.count_listings(&plan.filter).await;
        assert_eq!(total, 12);
        assert_eq!(plan.total_pages(total), 2);

        let page2 = store
            .find_listings(&plan.filter, plan.sort, 9, 9)
            .await;
        assert_eq!(page2.len(), 3);
        // No overlap between pages.
        for listing in &page2 {
            assert!(page1.iter().all(|l| l.id != listing.id));
        }
    }

    #[tokio::test]
    async fn price_sort_orders_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            vec![
                draft("A", "X", 300_000, None),
                draft("B", "Y", 100_000, None),
                draft("C", "Z", 200_000, None),
            ],
        )
        .await;

        let filter = ListingFilter::default();
        let low_high = store.find_listings(&filter, SortKey::PriceLowHigh, 0, 10).await;
        let prices: Vec<u64> = low_high.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![100_000, 200_000, 300_000]);

        let high_low = store.find_listings(&filter, SortKey::PriceHighLow, 0, 10).await;
        let prices: Vec<u64> = high_low.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![300_000, 200_000, 100_000]);
    }

    #[tokio::test]
    async fn facets_are_global_and_drop_missing_body_types() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            vec![
                draft("Creta", "Hyundai", 900_000, Some(BodyType::Suv)),
                draft("Fortuner", "Toyota", 2_500_000, Some(BodyType::Suv)),
                draft("City", "Honda", 700_000, Some(BodyType::Sedan)),
                draft("Mystery", "Misc", 100_000, None),
            ],
        )
        .await;

        let counts = store.body_type_counts().await;
        assert_eq!(counts.get("SUV"), Some(&2));
        assert_eq!(counts.get("SEDAN"), Some(&1));
        assert!(!counts.contains_key("VAN"));
        // Sum equals listings that have a body type, not the whole collection.
        assert_eq!(counts.values().sum::<u64>(), 3);

        // The facet ignores any active filter by design.
        let plan = QueryPlan::from_raw(RawListingQuery {
            brand: Some("Honda".into()),
            ..Default::default()
        });
        assert_eq!(store.count_listings(&plan.filter).await, 1);
        let counts_again = store.body_type_counts().await;
        assert_eq!(counts_again, counts);
    }

    #[tokio::test]
    async fn crud_round_trip_and_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let created = {
            let store = CarStore::open(&path).unwrap();
            let created = store
                .insert_listing(draft("Swift", "Maruti Suzuki", 450_000, Some(BodyType::Hatchback)))
                .await
                .unwrap();

            let updated = store
                .update_listing(
                    &created.id,
                    ListingUpdate {
                        price: Some(425_000),
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.price, 425_000);
            assert_eq!(updated.name, "Swift");
            created
        };

        // Reopen from the snapshot file.
        let store = CarStore::open(&path).unwrap();
        let loaded = store.get_listing(&created.id).await.unwrap();
        assert_eq!(loaded.price, 425_000);

        assert!(store.delete_listing(&created.id).await.unwrap());
        assert!(!store.delete_listing(&created.id).await.unwrap());
        assert!(store.get_listing(&created.id).await.is_none());
    }

    #[tokio::test]
    async fn update_of_unknown_listing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, vec![]).await;
        let result = store
            .update_listing("missing", ListingUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn contact_messages_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, vec![]).await;

        let first = store
            .insert_message(ContactDraft {
                name: "Asha".into(),
                phone: "9000000001".into(),
                message: "Interested in the Swift".into(),
            })
            .await
            .unwrap();
        let second = store
            .insert_message(ContactDraft {
                name: "Ravi".into(),
                phone: "9000000002".into(),
                message: "Is the City still available?".into(),
            })
            .await
            .unwrap();

        let listed = store.list_messages().await;
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);

        let marked = store.mark_message_read(&first.id).await.unwrap().unwrap();
        assert!(marked.read);
        assert!(store.delete_message(&second.id).await.unwrap());
        assert_eq!(store.list_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn site_config_seeds_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, vec![]).await;
        let settings = test_settings();

        let config = store.site_config(&settings).await.unwrap();
        assert_eq!(config.happy_customers, 1000);
        assert_eq!(config.business_email, "info@example.com");

        let updated = store
            .update_site_config(
                SiteConfigUpdate {
                    happy_customers: Some(1500),
                    ..Default::default()
                },
                &settings,
            )
            .await
            .unwrap();
        assert_eq!(updated.happy_customers, 1500);
        // Untouched fields survive partial updates.
        assert_eq!(updated.business_phone, "+911234567890");

        let config = store.site_config(&settings).await.unwrap();
        assert_eq!(config.happy_customers, 1500);
    }
}
