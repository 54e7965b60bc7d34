//! Indonesian prompt templates, one per AI task.

use std::collections::BTreeMap;

use serde_json::Value;

pub fn travel_query_parser(query: &str) -> String {
    format!(
        r#"Anda adalah asisten perencana perjalanan wisata Indonesia yang ahli. Analisis query perjalanan berikut dan ekstrak informasi terstruktur.

PENTING: Berikan respons dalam format JSON yang valid saja, tanpa teks tambahan.

Query: "{query}"

Ekstrak informasi berikut:
- destination: string (nama kota/daerah yang disebutkan, null jika tidak ada)
- duration: integer (jumlah hari perjalanan, null jika tidak disebutkan)
- budget: float (anggaran dalam rupiah, konversi jika disebutkan dalam juta/ribu, null jika tidak ada)
- traveler_count: integer (jumlah orang, null jika tidak disebutkan)
- traveler_type: string (solo/couple/family/friends/business berdasarkan konteks)
- interests: array of strings (minat/aktivitas yang disebutkan seperti pantai, kuliner, budaya, dll)
- activity_level: string (low/moderate/high berdasarkan jenis aktivitas)
- extracted_keywords: array of strings (kata kunci penting dari query)
- confidence: float (0-1, tingkat kepercayaan ekstraksi)

Contoh respons:
{{
  "destination": "Bali",
  "duration": 3,
  "budget": 5000000,
  "traveler_count": 4,
  "traveler_type": "family",
  "interests": ["pantai", "kuliner", "budaya"],
  "activity_level": "moderate",
  "extracted_keywords": ["Bali", "3 hari", "keluarga", "pantai", "kuliner", "5 juta"],
  "confidence": 0.9
}}

JSON Response:
"#
    )
}

/// Asks for the reasoning behind an assembled itinerary, not for the
/// schedule itself.
pub fn itinerary_generator(
    destination: &str,
    duration: u32,
    interests: &[String],
    budget: f64,
    traveler_type: &str,
) -> String {
    let interests = if interests.is_empty() {
        "umum".to_string()
    } else {
        interests.join(", ")
    };
    let budget = format_rupiah(budget);

    format!(
        r#"Anda adalah perencana perjalanan wisata Indonesia yang berpengalaman. Sebuah itinerary telah disusun untuk:

Destinasi: {destination}
Durasi: {duration} hari
Minat: {interests}
Budget: Rp {budget}
Tipe Wisatawan: {traveler_type}

Jelaskan secara singkat alasan susunan itinerary ini dengan mempertimbangkan jarak, waktu, minat, dan budget, lalu berikan saran alternatif.

Format respons dalam JSON dengan struktur:
{{
  "reasoning": "string",
  "alternatives": ["string"]
}}

JSON Response:
"#
    )
}

pub fn destination_recommender(preferences: &Value, location_context: &str) -> String {
    let preferences = serde_json::to_string_pretty(preferences).unwrap_or_default();
    format!(
        r#"Anda adalah ahli pariwisata {location_context}. Berdasarkan preferensi berikut, rekomendasikan destinasi wisata yang paling sesuai:

Preferensi:
{preferences}

Berikan 5-10 rekomendasi destinasi dengan format JSON:
{{
  "recommendations": [
    {{
      "name": "string",
      "location": "string",
      "category": "string",
      "match_score": 0.95,
      "reasons": ["string"],
      "best_time": "string",
      "estimated_cost": "string",
      "highlights": ["string"]
    }}
  ],
  "reasoning": "string"
}}

JSON Response:
"#
    )
}

pub fn sentiment_analyzer(reviews: &[String], destination_name: &str) -> String {
    let reviews = reviews
        .iter()
        .take(10)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"Analisis sentimen untuk ulasan destinasi wisata: {destination_name}

Ulasan:
{reviews}

Berikan analisis sentimen dalam format JSON:
{{
  "overall_sentiment": 0.7,
  "sentiment_breakdown": {{
    "positive": 0.6,
    "neutral": 0.3,
    "negative": 0.1
  }},
  "key_themes": {{
    "positive": ["string"],
    "negative": ["string"]
  }},
  "summary": "string",
  "recommendation_score": 0.8,
  "confidence": 0.9
}}

JSON Response:
"#
    )
}

pub fn route_optimizer(
    destinations: &[String],
    start_point: &str,
    preferences: &BTreeMap<String, Value>,
) -> String {
    let destinations = destinations.join(", ");
    let preferences = serde_json::to_string(preferences).unwrap_or_default();
    format!(
        r#"Optimasi rute perjalanan untuk:

Titik Awal: {start_point}
Destinasi: {destinations}
Preferensi: {preferences}

Berikan rute optimal dalam format JSON:
{{
  "optimized_route": ["string"],
  "route_details": [
    {{
      "from": "string",
      "to": "string",
      "distance_km": 50,
      "travel_time_minutes": 90,
      "transportation": "string",
      "cost_estimate": 100000
    }}
  ],
  "total_distance": 200,
  "total_time": 360,
  "total_cost": 400000,
  "optimization_score": 0.85,
  "alternatives": ["string"]
}}

JSON Response:
"#
    )
}

pub fn chat_assistant(message: &str, context: Option<&Value>) -> String {
    let context = match context {
        Some(value) if !value.is_null() => value.to_string(),
        _ => "Tidak ada konteks sebelumnya".to_string(),
    };
    format!(
        r#"Anda adalah asisten perjalanan wisata Indonesia yang ramah dan berpengetahuan luas.
Jawab pertanyaan pengguna dengan informatif dan membantu.

Konteks percakapan: {context}

Pertanyaan: "{message}"

Berikan respons yang:
1. Ramah dan personal
2. Informatif dan akurat
3. Memberikan saran praktis
4. Menggunakan bahasa Indonesia yang natural

Jika diperlukan, sertakan:
- Rekomendasi spesifik
- Tips praktis
- Informasi biaya
- Alternatif pilihan

Respons:
"#
    )
}

pub fn budget_estimator(
    destination: &str,
    duration: u32,
    traveler_count: u32,
    comfort_level: &str,
) -> String {
    format!(
        r#"Estimasi budget perjalanan untuk:

Destinasi: {destination}
Durasi: {duration} hari
Jumlah Orang: {traveler_count}
Tingkat Kenyamanan: {comfort_level}

Berikan estimasi budget detail dalam format JSON:
{{
  "total_budget": {{
    "min": 2000000,
    "recommended": 3500000,
    "max": 5000000
  }},
  "daily_budget": {{
    "min": 400000,
    "recommended": 700000,
    "max": 1000000
  }},
  "breakdown": {{
    "accommodation": {{ "percentage": 0.35, "amount": 1225000, "options": ["string"] }},
    "food": {{ "percentage": 0.25, "amount": 875000, "options": ["string"] }},
    "transportation": {{ "percentage": 0.20, "amount": 700000, "options": ["string"] }},
    "activities": {{ "percentage": 0.15, "amount": 525000, "options": ["string"] }},
    "miscellaneous": {{ "percentage": 0.05, "amount": 175000, "options": ["string"] }}
  }},
  "money_saving_tips": ["string"],
  "splurge_options": ["string"]
}}

JSON Response:
"#
    )
}

pub fn travel_planner(query: &str, preferences: Option<&BTreeMap<String, Value>>) -> String {
    let mut prompt = format!(
        "Anda adalah AI travel planner expert untuk Indonesia. Buatkan itinerary travel berdasarkan permintaan berikut:\n\nPERMINTAAN: {query}\n\nPREFERENSI:\n"
    );

    for (key, value) in preferences.into_iter().flatten() {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        prompt.push_str(&format!("- {}: {}\n", key, value));
    }

    prompt.push_str(
        r#"
INSTRUKSI:
1. Buat itinerary yang detail dan praktis untuk Indonesia
2. Sertakan estimasi budget dalam Rupiah
3. Rekomendasikan destinasi wisata Indonesia yang sesuai
4. Berikan tips praktis untuk perjalanan
5. Format response dalam JSON dengan struktur:
{
  "title": "Judul Itinerary",
  "duration": "durasi dalam hari",
  "total_budget": "estimasi budget total",
  "destinations": ["list destinasi"],
  "daily_schedule": ["jadwal harian"],
  "tips": ["tips perjalanan"]
}

RESPONSE (JSON only):
"#,
    );
    prompt
}

/// Whole rupiah with comma thousands separators: 5000000.0 -> "5,000,000".
pub fn format_rupiah(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 && whole > 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
