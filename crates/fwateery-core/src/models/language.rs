//! Active display language and the few localized strings the core needs.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const WEEKDAYS_AR: [&str; 7] = [
    "الأحد",
    "الاثنين",
    "الثلاثاء",
    "الأربعاء",
    "الخميس",
    "الجمعة",
    "السبت",
];

const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS_AR: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو",
    "يوليو", "أغسطس", "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Language used for model prompts, placeholders and labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic (right-to-left, default).
    #[default]
    Ar,
    /// English.
    En,
}

impl Language {
    /// Two-letter language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    /// Parse a language code; anything other than `ar`/`en` is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ar" => Some(Language::Ar),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Placeholder for a field the model could not read.
    pub fn unknown(&self) -> &'static str {
        match self {
            Language::Ar => "غير متوفر",
            Language::En => "Unknown",
        }
    }

    /// Currency label shown after prices.
    pub fn currency(&self) -> &'static str {
        match self {
            Language::Ar => "ج.م",
            Language::En => "EGP",
        }
    }

    /// Full weekday name.
    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_sunday() as usize;
        match self {
            Language::Ar => WEEKDAYS_AR[idx],
            Language::En => WEEKDAYS_EN[idx],
        }
    }

    /// "Month Year" label used to group invoices.
    pub fn month_year(&self, date: NaiveDate) -> String {
        let idx = date.month0() as usize;
        match self {
            Language::Ar => format!("{} {}", MONTHS_AR[idx], self.digits(&date.year().to_string())),
            Language::En => format!("{} {}", MONTHS_EN[idx], date.year()),
        }
    }

    /// Render ASCII digits in the language's numeral system.
    pub fn digits(&self, s: &str) -> String {
        match self {
            Language::En => s.to_string(),
            Language::Ar => s
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
                    None => c,
                })
                .collect(),
        }
    }

    pub fn all_invoices(&self) -> &'static str {
        match self {
            Language::Ar => "جميع الفواتير",
            Language::En => "All Invoices",
        }
    }

    pub fn unknown_date(&self) -> &'static str {
        match self {
            Language::Ar => "تاريخ غير معروف",
            Language::En => "Unknown Date",
        }
    }

    /// Field labels: patient, procedure, price, date.
    pub fn field_labels(&self) -> [&'static str; 4] {
        match self {
            Language::Ar => ["اسم المريض", "الإجراء", "السعر", "التاريخ"],
            Language::En => ["Patient Name", "Procedure", "Price", "Date"],
        }
    }

    /// Aggregate outcome of a multi-image upload.
    pub fn batch_outcome(&self, succeeded: usize, failed: usize) -> String {
        match self {
            Language::Ar => format!("تمت معالجة {} بنجاح، وفشل {}", succeeded, failed),
            Language::En => format!("{} succeeded, {} failed", succeeded, failed),
        }
    }

    /// First assistant message of a chat session.
    pub fn welcome_message(&self) -> &'static str {
        match self {
            Language::Ar => "مرحبًا! أنا مساعدك الطبي الذكي. كيف يمكنني مساعدتك في فواتيرك اليوم؟",
            Language::En => "Hello! I'm your smart medical assistant. How can I help you with your invoices today?",
        }
    }

    /// Assistant turn shown when the chat collaborator fails.
    pub fn chat_error_message(&self) -> &'static str {
        match self {
            Language::Ar => "عذرًا، حدث خطأ أثناء الاتصال بالمساعد. يرجى المحاولة مرة أخرى.",
            Language::En => "Sorry, something went wrong while contacting the assistant. Please try again.",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
