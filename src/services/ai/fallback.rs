//! Canned answers used whenever no model answer is available.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};

use crate::models::query::{ParsedTravelQuery, TravelerType};

pub const FALLBACK_CONFIDENCE: f64 = 0.6;

pub const ITINERARY_REASONING: &str = "Itinerary dibuat berdasarkan preferensi Anda dengan mempertimbangkan jarak, waktu, dan minat wisata.";

pub const ALTERNATIVE_SUGGESTIONS: [&str; 2] = [
    "Pertimbangkan untuk menambah 1 hari untuk eksplorasi lebih mendalam",
    "Coba kunjungi pasar lokal untuk pengalaman kuliner yang autentik",
];

pub const CHAT_FAILURE_REPLY: &str =
    "Maaf, saya mengalami kesulitan memproses pertanyaan Anda. Silakan coba lagi.";

const KNOWN_DESTINATIONS: [&str; 8] = [
    "bali",
    "jakarta",
    "yogyakarta",
    "bandung",
    "surabaya",
    "lombok",
    "flores",
    "komodo",
];

const INTEREST_TERMS: [(&str, &[&str]); 5] = [
    ("pantai", &["pantai", "beach"]),
    ("kuliner", &["kuliner", "makanan", "food"]),
    ("budaya", &["budaya", "culture", "sejarah"]),
    ("alam", &["alam", "nature", "gunung"]),
    ("adventure", &["adventure", "petualangan"]),
];

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*hari").expect("valid duration pattern"));
static BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*juta").expect("valid budget pattern"));

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keyword parser for Indonesian and English travel queries.
pub fn fallback_parse_query(query: &str) -> ParsedTravelQuery {
    let text = query.to_lowercase();
    let mut keywords = Vec::new();

    let destination = KNOWN_DESTINATIONS
        .iter()
        .find(|name| text.contains(*name))
        .map(|name| {
            keywords.push(name.to_string());
            title_case(name)
        });

    let duration = DURATION_RE
        .captures(&text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .inspect(|days| keywords.push(format!("{} hari", days)));

    let budget = BUDGET_RE.captures(&text).and_then(|caps| {
        let millions = caps[1].parse::<u64>().ok()?;
        keywords.push(format!("{} juta", &caps[1]));
        Some(millions as f64 * 1_000_000.0)
    });

    let traveler_type = if ["keluarga", "family"].iter().any(|w| text.contains(w)) {
        keywords.push("keluarga".to_string());
        Some(TravelerType::Family)
    } else if ["pasangan", "couple"].iter().any(|w| text.contains(w)) {
        keywords.push("pasangan".to_string());
        Some(TravelerType::Couple)
    } else if ["teman", "friends"].iter().any(|w| text.contains(w)) {
        keywords.push("teman".to_string());
        Some(TravelerType::Friends)
    } else {
        None
    };

    let mut interests = Vec::new();
    for (interest, terms) in INTEREST_TERMS {
        let matched: Vec<&str> = terms.iter().copied().filter(|t| text.contains(t)).collect();
        if !matched.is_empty() {
            interests.push(interest.to_string());
            keywords.extend(matched.into_iter().map(str::to_string));
        }
    }

    ParsedTravelQuery {
        destination,
        duration,
        budget,
        traveler_count: None,
        traveler_type,
        interests,
        activity_level: None,
        start_date: None,
        extracted_keywords: keywords,
        confidence: FALLBACK_CONFIDENCE,
    }
}

pub fn recommendations(destination: Option<&str>) -> Value {
    let destination = destination.filter(|d| !d.is_empty()).unwrap_or("Indonesia");
    json!({
        "recommendations": [
            {
                "name": format!("Destinasi Populer di {}", destination),
                "location": destination,
                "category": "cultural",
                "match_score": 0.8,
                "reasons": ["Sesuai dengan minat Anda", "Dalam budget"],
                "best_time": "Sepanjang tahun",
                "estimated_cost": "Moderate",
                "highlights": ["Pemandangan indah", "Budaya lokal", "Kuliner khas"]
            }
        ],
        "reasoning": "Rekomendasi berdasarkan preferensi umum dan popularitas destinasi"
    })
}

/// Visits the destinations in the given order with flat per-leg estimates.
pub fn route(destinations: &[String], start_location: &str) -> Value {
    let legs: Vec<Value> = destinations
        .iter()
        .enumerate()
        .map(|(i, to)| {
            let from = if i == 0 {
                start_location
            } else {
                destinations[i - 1].as_str()
            };
            json!({
                "from": from,
                "to": to,
                "distance_km": 50,
                "travel_time_minutes": 90,
                "transportation": "car",
                "cost_estimate": 100000
            })
        })
        .collect();
    let n = destinations.len() as u64;

    json!({
        "optimized_route": destinations,
        "route_details": legs,
        "total_distance": n * 50,
        "total_time": n * 90,
        "total_cost": n * 100_000,
        "optimization_score": 0.7,
        "alternatives": ["Pertimbangkan transportasi umum untuk menghemat biaya"]
    })
}

pub fn chat_reply(message: &str) -> &'static str {
    let text = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));

    if mentions(&["halo", "hai", "hello"]) {
        "Halo! Saya adalah asisten perjalanan Jelajah Nusantara AI. Ada yang bisa saya bantu untuk merencanakan perjalanan Anda?"
    } else if mentions(&["budget", "biaya", "harga"]) {
        "Untuk estimasi budget perjalanan, saya bisa membantu menghitung berdasarkan destinasi, durasi, dan preferensi Anda. Bisa ceritakan rencana perjalanan Anda?"
    } else if mentions(&["rekomendasi", "saran", "destinasi"]) {
        "Saya bisa memberikan rekomendasi destinasi wisata di Indonesia berdasarkan minat Anda. Apa jenis wisata yang Anda sukai? Pantai, gunung, budaya, atau kuliner?"
    } else if mentions(&["cuaca", "waktu", "musim"]) {
        "Waktu terbaik untuk berkunjung tergantung destinasi. Secara umum, musim kemarau (April-Oktober) cocok untuk sebagian besar destinasi di Indonesia."
    } else {
        "Terima kasih atas pertanyaan Anda. Saya siap membantu merencanakan perjalanan wisata Anda di Indonesia. Silakan ceritakan lebih detail tentang rencana perjalanan Anda."
    }
}

const BUDGET_SHARES: [(&str, f64); 5] = [
    ("accommodation", 0.35),
    ("food", 0.25),
    ("transportation", 0.20),
    ("activities", 0.15),
    ("miscellaneous", 0.05),
];

pub fn daily_base_budget(comfort_level: &str) -> f64 {
    match comfort_level.trim().to_lowercase().as_str() {
        "budget" => 300_000.0,
        "luxury" => 1_200_000.0,
        _ => 600_000.0,
    }
}

pub fn budget(duration: u32, traveler_count: u32, comfort_level: &str) -> Value {
    let daily = daily_base_budget(comfort_level);
    let total = daily * f64::from(duration) * f64::from(traveler_count);

    let breakdown: serde_json::Map<String, Value> = BUDGET_SHARES
        .iter()
        .map(|(category, share)| {
            (
                category.to_string(),
                json!({ "percentage": share, "amount": total * share }),
            )
        })
        .collect();

    json!({
        "total_budget": { "min": total * 0.7, "recommended": total, "max": total * 1.5 },
        "daily_budget": { "min": daily * 0.7, "recommended": daily, "max": daily * 1.5 },
        "breakdown": breakdown
    })
}

/// Plan returned by the provider chain when every provider failed.
pub fn mock_travel_plan(query: &str) -> Value {
    let now = Utc::now();
    let excerpt: String = query.chars().take(100).collect();
    json!({
        "id": format!("mock-{}", now.timestamp()),
        "title": "Jelajah Bali 3 Hari 2 Malam",
        "description": format!("Itinerary berdasarkan: {}...", excerpt),
        "duration": 3,
        "total_budget": 5000000,
        "destinations": [
            {
                "name": "Pantai Kuta",
                "category": "beach",
                "description": "Pantai terkenal dengan sunset indah",
                "estimated_cost": 150000
            },
            {
                "name": "Pura Tanah Lot",
                "category": "cultural",
                "description": "Pura Hindu di atas batu karang",
                "estimated_cost": 200000
            }
        ],
        "daily_schedule": [
            {
                "day": 1,
                "activities": ["Tiba di Bali", "Check-in hotel", "Jelajah Pantai Kuta"],
                "estimated_cost": 1500000
            },
            {
                "day": 2,
                "activities": ["Kunjungi Pura Tanah Lot", "Sunset viewing", "Kuliner lokal"],
                "estimated_cost": 1800000
            }
        ],
        "tips": [
            "Bawa sunscreen untuk perlindungan kulit",
            "Hormati adat dan budaya lokal",
            "Coba kuliner khas Bali"
        ],
        "ai_provider": "mock_data",
        "generated_at": now.to_rfc3339(),
        "note": "Demo data - AI providers tidak tersedia"
    })
}
