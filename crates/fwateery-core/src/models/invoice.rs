//! Invoice data models: raw model extractions and persisted records.

use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::language::Language;

/// One invoice as read by the vision model, before any validation.
///
/// Every field is optional: the model may omit keys, send `null`, or
/// return a number where a string was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    #[serde(default, deserialize_with = "string_or_number")]
    pub patient_name: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub procedure: Option<String>,

    /// Price text, possibly with currency symbols or OCR noise.
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: Option<String>,

    /// Ideally `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "string_or_number")]
    pub date: Option<String>,

    /// Weekday name in the requested language.
    #[serde(default, deserialize_with = "string_or_number")]
    pub day_name: Option<String>,
}

/// Plain decimal text of a JSON number; never exponent notation.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| format!("{}", f)).unwrap_or_default()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(number_text(&n)),
        _ => None,
    })
}

/// Lifecycle tag of an invoice record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Processing,
    #[default]
    Completed,
    Failed,
}

impl InvoiceStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "processing" => Some(InvoiceStatus::Processing),
            "completed" => Some(InvoiceStatus::Completed),
            "failed" => Some(InvoiceStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Processing => "processing",
            InvoiceStatus::Completed => "completed",
            InvoiceStatus::Failed => "failed",
        }
    }
}

/// A validated, persisted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Unique within a user's store, never reused.
    pub id: String,

    pub patient_name: String,

    pub procedure: String,

    /// Non-negative integer as text.
    pub price: String,

    /// `YYYY-MM-DD`.
    pub date: String,

    #[serde(default)]
    pub day_name: String,

    #[serde(default)]
    pub status: InvoiceStatus,

    /// Source image as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
}

/// Field edits applied to an existing record. `id` is never editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceUpdate {
    pub patient_name: Option<String>,
    pub procedure: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
    pub day_name: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl InvoiceRecord {
    /// Build a record from an extraction that has already been through
    /// [`apply_business_rules`](crate::normalize::apply_business_rules).
    ///
    /// Blank text fields get the language placeholder, a missing price
    /// becomes `"0"` and a missing date becomes `today`.
    pub fn from_extraction(
        raw: RawExtraction,
        lang: Language,
        original_image: Option<String>,
        today: NaiveDate,
    ) -> Self {
        let date = non_blank(raw.date).unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
        let day_name = day_name_for(&date, lang)
            .map(str::to_string)
            .or_else(|| non_blank(raw.day_name))
            .unwrap_or_default();

        Self {
            id: generate_id(),
            patient_name: non_blank(raw.patient_name).unwrap_or_else(|| lang.unknown().to_string()),
            procedure: non_blank(raw.procedure).unwrap_or_else(|| lang.unknown().to_string()),
            price: non_blank(raw.price).unwrap_or_else(|| "0".to_string()),
            date,
            day_name,
            status: InvoiceStatus::Completed,
            original_image,
        }
    }

    /// Same as [`from_extraction`](Self::from_extraction) with today's UTC date.
    pub fn from_extraction_now(
        raw: RawExtraction,
        lang: Language,
        original_image: Option<String>,
    ) -> Self {
        Self::from_extraction(raw, lang, original_image, Utc::now().date_naive())
    }

    /// Apply user edits. Changing the date re-derives the weekday.
    pub fn apply(&mut self, update: InvoiceUpdate, lang: Language) {
        if let Some(patient_name) = update.patient_name {
            self.patient_name = patient_name;
        }
        if let Some(procedure) = update.procedure {
            self.procedure = procedure;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(date) = update.date {
            self.day_name = day_name_for(&date, lang).unwrap_or_default().to_string();
            self.date = date;
        }
        if let Some(day_name) = update.day_name {
            self.day_name = day_name;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    /// Parsed invoice date, if well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Weekday to display: derived from the date, else the stored name.
    pub fn display_day_name(&self, lang: Language) -> String {
        day_name_for(&self.date, lang)
            .map(str::to_string)
            .unwrap_or_else(|| self.day_name.clone())
    }

    /// Plain-text block suitable for pasting elsewhere.
    pub fn summary_text(&self, lang: Language) -> String {
        let [patient, procedure, price, date] = lang.field_labels();
        format!(
            "{}: {}\n{}: {}\n{}: {} {}\n{}: {} ({})",
            patient,
            self.patient_name,
            procedure,
            self.procedure,
            price,
            self.price,
            lang.currency(),
            date,
            self.date,
            self.display_day_name(lang),
        )
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Weekday name of a `YYYY-MM-DD` date in the given language.
pub fn day_name_for(date: &str, lang: Language) -> Option<&'static str> {
    parse_date(date).map(|d| lang.weekday_name(d.weekday()))
}

/// New record id: unix milliseconds followed by nine random base36 chars.
pub fn generate_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_raw_extraction_accepts_numbers_and_nulls() {
        let raw: RawExtraction = serde_json::from_str(
            r#"{"patientName": "Ahmed", "procedure": null, "price": 150, "date": "2024-01-06"}"#,
        )
        .unwrap();

        assert_eq!(raw.patient_name.as_deref(), Some("Ahmed"));
        assert_eq!(raw.procedure, None);
        assert_eq!(raw.price.as_deref(), Some("150"));
        assert_eq!(raw.day_name, None);
    }

    #[test]
    fn test_from_extraction_defaults() {
        let record = InvoiceRecord::from_extraction(RawExtraction::default(), Language::En, None, today());

        assert_eq!(record.patient_name, "Unknown");
        assert_eq!(record.procedure, "Unknown");
        assert_eq!(record.price, "0");
        assert_eq!(record.date, "2024-05-20");
        assert_eq!(record.day_name, "Monday");
        assert_eq!(record.status, InvoiceStatus::Completed);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_from_extraction_arabic_placeholder() {
        let raw = RawExtraction {
            patient_name: Some("   ".to_string()),
            ..Default::default()
        };
        let record = InvoiceRecord::from_extraction(raw, Language::Ar, None, today());

        assert_eq!(record.patient_name, "غير متوفر");
        assert_eq!(record.day_name, "الاثنين");
    }

    #[test]
    fn test_day_name_follows_date() {
        let raw = RawExtraction {
            date: Some("2024-01-06".to_string()),
            day_name: Some("Tuesday".to_string()),
            ..Default::default()
        };
        let record = InvoiceRecord::from_extraction(raw, Language::En, None, today());
        assert_eq!(record.day_name, "Saturday");
    }

    #[test]
    fn test_day_name_carried_when_date_malformed() {
        let raw = RawExtraction {
            date: Some("06/01/2024".to_string()),
            day_name: Some("السبت".to_string()),
            ..Default::default()
        };
        let record = InvoiceRecord::from_extraction(raw, Language::Ar, None, today());
        assert_eq!(record.date, "06/01/2024");
        assert_eq!(record.day_name, "السبت");
    }

    #[test]
    fn test_generate_id_shape() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.len() >= 10);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_apply_update_rederives_day_name() {
        let mut record = InvoiceRecord::from_extraction(RawExtraction::default(), Language::En, None, today());
        let id = record.id.clone();

        record.apply(
            InvoiceUpdate {
                price: Some("200".to_string()),
                date: Some("2024-01-07".to_string()),
                ..Default::default()
            },
            Language::En,
        );

        assert_eq!(record.id, id);
        assert_eq!(record.price, "200");
        assert_eq!(record.day_name, "Sunday");
    }

    #[test]
    fn test_record_json_layout() {
        let mut record = InvoiceRecord::from_extraction(RawExtraction::default(), Language::En, None, today());
        record.id = "1700000000000abcdefghi".to_string();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["patientName"], "Unknown");
        assert_eq!(json["dayName"], "Monday");
        assert_eq!(json["status"], "completed");
        assert!(json.get("originalImage").is_none());
    }

    #[test]
    fn test_summary_text() {
        let record = InvoiceRecord {
            id: "1".to_string(),
            patient_name: "Sara Ali".to_string(),
            procedure: "X-Ray".to_string(),
            price: "450".to_string(),
            date: "2024-01-06".to_string(),
            day_name: String::new(),
            status: InvoiceStatus::Completed,
            original_image: None,
        };

        assert_eq!(
            record.summary_text(Language::En),
            "Patient Name: Sara Ali\nProcedure: X-Ray\nPrice: 450 EGP\nDate: 2024-01-06 (Saturday)"
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(InvoiceStatus::from_str("Failed"), Some(InvoiceStatus::Failed));
        assert_eq!(InvoiceStatus::from_str("done"), None);
    }
}
