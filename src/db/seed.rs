use chrono::Utc;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::destination::{
    daily_hours, Destination, DestinationCategory, Facility, GeoLocation, PriceRange, Tag,
};

struct SeedDestination {
    name: &'static str,
    description: &'static str,
    category: DestinationCategory,
    latitude: f64,
    longitude: f64,
    address: &'static str,
    city: &'static str,
    province: &'static str,
    rating: f64,
    review_count: u32,
    price_range: PriceRange,
    entry_fee: f64,
    images: [&'static str; 2],
    hours: (&'static str, &'static str),
    slug: &'static str,
    is_featured: bool,
    tags: &'static [&'static str],
    facilities: &'static [&'static str],
}

const TAGS: [(&str, &str, &str); 8] = [
    ("populer", "Destinasi populer", "#FF6B6B"),
    ("instagramable", "Cocok untuk foto", "#4ECDC4"),
    ("keluarga", "Ramah keluarga", "#45B7D1"),
    ("romantis", "Cocok untuk pasangan", "#F7DC6F"),
    ("petualangan", "Aktivitas petualangan", "#BB8FCE"),
    ("budaya", "Wisata budaya", "#F8C471"),
    ("alam", "Wisata alam", "#82E0AA"),
    ("kuliner", "Wisata kuliner", "#F1948A"),
];

const FACILITIES: [(&str, &str, &str); 8] = [
    ("Parkir", "parking", "Area parkir tersedia"),
    ("Toilet", "restroom", "Fasilitas toilet"),
    ("Warung", "restaurant", "Warung makan"),
    ("WiFi", "wifi", "Internet gratis"),
    ("ATM", "atm", "Mesin ATM"),
    ("Mushola", "mosque", "Tempat ibadah"),
    ("Souvenir", "shop", "Toko souvenir"),
    ("Guide", "person", "Pemandu wisata"),
];

const UNSPLASH_TEMPLE: &str = "https://images.unsplash.com/photo-1578662996442-48f60103fc96";
const UNSPLASH_VIEW: &str = "https://images.unsplash.com/photo-1506905925346-21bda4d32df4";

const DESTINATIONS: [SeedDestination; 5] = [
    SeedDestination {
        name: "Pantai Kuta",
        description: "Pantai terkenal di Bali dengan sunset yang menakjubkan dan ombak yang cocok untuk surfing. Tempat yang sempurna untuk bersantai dan menikmati keindahan alam.",
        category: DestinationCategory::Beach,
        latitude: -8.7205,
        longitude: 115.1693,
        address: "Jl. Pantai Kuta, Kuta",
        city: "Badung",
        province: "Bali",
        rating: 4.3,
        review_count: 1250,
        price_range: PriceRange::Budget,
        entry_fee: 0.0,
        images: [
            "https://images.unsplash.com/photo-1537953773345-d172ccf13cf1",
            UNSPLASH_VIEW,
        ],
        hours: ("00:00", "23:59"),
        slug: "pantai-kuta-bali",
        is_featured: true,
        tags: &["populer", "instagramable", "keluarga"],
        facilities: &["Parkir", "Toilet", "Warung", "Souvenir"],
    },
    SeedDestination {
        name: "Candi Borobudur",
        description: "Candi Buddha terbesar di dunia dan situs warisan dunia UNESCO. Masterpiece arsitektur dan spiritual yang menakjubkan.",
        category: DestinationCategory::Historical,
        latitude: -7.6079,
        longitude: 110.2038,
        address: "Jl. Badrawati, Borobudur",
        city: "Magelang",
        province: "Jawa Tengah",
        rating: 4.6,
        review_count: 2100,
        price_range: PriceRange::Moderate,
        entry_fee: 50000.0,
        images: [
            "https://images.unsplash.com/photo-1596422846543-75c6fc197f07",
            UNSPLASH_TEMPLE,
        ],
        hours: ("06:00", "17:00"),
        slug: "candi-borobudur-magelang",
        is_featured: true,
        tags: &["populer", "budaya", "instagramable"],
        facilities: &["Parkir", "Toilet", "Warung", "Guide", "Souvenir", "Mushola"],
    },
    SeedDestination {
        name: "Kawah Ijen",
        description: "Kawah vulkanik dengan fenomena blue fire yang langka dan danau asam terbesar di dunia. Pengalaman hiking yang menantang dengan pemandangan spektakuler.",
        category: DestinationCategory::Mountain,
        latitude: -8.0587,
        longitude: 114.2421,
        address: "Kawah Ijen, Licin",
        city: "Banyuwangi",
        province: "Jawa Timur",
        rating: 4.5,
        review_count: 890,
        price_range: PriceRange::Moderate,
        entry_fee: 30000.0,
        images: [UNSPLASH_TEMPLE, UNSPLASH_VIEW],
        hours: ("02:00", "12:00"),
        slug: "kawah-ijen-banyuwangi",
        is_featured: true,
        tags: &["petualangan", "alam", "instagramable"],
        facilities: &["Parkir", "Toilet", "Guide"],
    },
    SeedDestination {
        name: "Malioboro Street",
        description: "Jalan legendaris di Yogyakarta dengan berbagai toko, kuliner khas, dan pertunjukan seni jalanan. Pusat wisata belanja dan kuliner.",
        category: DestinationCategory::Urban,
        latitude: -7.7956,
        longitude: 110.3695,
        address: "Jl. Malioboro, Yogyakarta",
        city: "Yogyakarta",
        province: "DI Yogyakarta",
        rating: 4.2,
        review_count: 1680,
        price_range: PriceRange::Budget,
        entry_fee: 0.0,
        images: [UNSPLASH_TEMPLE, UNSPLASH_VIEW],
        hours: ("00:00", "23:59"),
        slug: "malioboro-street-yogyakarta",
        is_featured: false,
        tags: &["populer", "kuliner", "budaya", "keluarga"],
        facilities: &["Parkir", "Toilet", "Warung", "ATM", "Souvenir"],
    },
    SeedDestination {
        name: "Danau Toba",
        description: "Danau vulkanik terbesar di Indonesia dengan Pulau Samosir di tengahnya. Keindahan alam yang memukau dengan budaya Batak yang kaya.",
        category: DestinationCategory::Nature,
        latitude: 2.6845,
        longitude: 98.8756,
        address: "Danau Toba, Samosir",
        city: "Samosir",
        province: "Sumatera Utara",
        rating: 4.4,
        review_count: 756,
        price_range: PriceRange::Moderate,
        entry_fee: 0.0,
        images: [UNSPLASH_TEMPLE, UNSPLASH_VIEW],
        hours: ("00:00", "23:59"),
        slug: "danau-toba-samosir",
        is_featured: true,
        tags: &["alam", "budaya", "romantis", "keluarga"],
        facilities: &["Parkir", "Toilet", "Warung", "Souvenir"],
    },
];

pub fn sample_tags() -> Vec<Tag> {
    let now = Utc::now();
    TAGS.iter()
        .map(|(name, description, color)| Tag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            color: Some(color.to_string()),
            created_at: now,
        })
        .collect()
}

pub fn sample_facilities() -> Vec<Facility> {
    let now = Utc::now();
    FACILITIES
        .iter()
        .map(|(name, icon, description)| Facility {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            description: Some(description.to_string()),
            created_at: now,
        })
        .collect()
}

/// The five sample destinations. Tag and facility names that are not in the
/// catalogs are dropped.
pub fn sample_destinations() -> Vec<Destination> {
    let now = Utc::now();
    DESTINATIONS
        .iter()
        .map(|seed| Destination {
            id: Uuid::new_v4().to_string(),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            location: GeoLocation {
                latitude: seed.latitude,
                longitude: seed.longitude,
                address: seed.address.to_string(),
                city: seed.city.to_string(),
                province: seed.province.to_string(),
                country: "Indonesia".to_string(),
            },
            category: seed.category,
            images: seed.images.iter().map(|url| url.to_string()).collect(),
            rating: seed.rating,
            review_count: seed.review_count,
            price_range: seed.price_range,
            entry_fee: Some(seed.entry_fee),
            opening_hours: daily_hours(seed.hours.0, seed.hours.1),
            slug: seed.slug.to_string(),
            is_active: true,
            is_featured: seed.is_featured,
            facilities: seed
                .facilities
                .iter()
                .filter(|name| FACILITIES.iter().any(|(known, _, _)| known == *name))
                .map(|name| name.to_string())
                .collect(),
            tags: seed
                .tags
                .iter()
                .filter(|name| TAGS.iter().any(|(known, _, _)| known == *name))
                .map(|name| name.to_string())
                .collect(),
            sentiment: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Populates an empty store. Returns false when destinations already exist.
pub async fn seed_database(store: &dyn Store) -> Result<bool, StoreError> {
    if store.count_destinations().await? > 0 {
        log::info!("Database already contains destinations, skipping seed");
        return Ok(false);
    }

    log::info!("Seeding database with sample data");
    store.insert_tags(sample_tags()).await?;
    store.insert_facilities(sample_facilities()).await?;

    let destinations = sample_destinations();
    let count = destinations.len();
    store.insert_destinations(destinations).await?;

    log::info!("Created {} sample destinations with tags and facilities", count);
    Ok(true)
}
