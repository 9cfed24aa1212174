//! Per-user invoice store persisted as a flat JSON array.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::invoice::{InvoiceRecord, InvoiceUpdate};
use crate::models::language::Language;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Column to order invoices by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Price,
    PatientName,
    Procedure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A titled run of invoices for display.
#[derive(Debug, Clone)]
pub struct InvoiceGroup<'a> {
    pub title: String,
    pub invoices: Vec<&'a InvoiceRecord>,
}

/// Ordered collection of one user's invoices, newest first.
#[derive(Debug)]
pub struct InvoiceStore {
    path: PathBuf,
    language: Language,
    records: Vec<InvoiceRecord>,
}

impl InvoiceStore {
    /// Open the store of `user_id` under `data_dir`. A missing file is an
    /// empty store; an unreadable one is an error and is left untouched.
    pub fn open(data_dir: &Path, user_id: &str, language: Language) -> Result<Self> {
        let path = data_dir.join(store_file_name(user_id));
        let records = if path.exists() {
            load_records(&path)?
        } else {
            debug!("No store at {}, starting empty", path.display());
            Vec::new()
        };

        info!("Opened store {} with {} invoice(s)", path.display(), records.len());
        Ok(Self {
            path,
            language,
            records,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InvoiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Insert a new record at the front.
    pub fn add(&mut self, record: InvoiceRecord) -> Result<()> {
        if self.get(&record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.insert(0, record);
        Ok(())
    }

    /// Edit a record in place. The id never changes.
    pub fn update(&mut self, id: &str, update: InvoiceUpdate) -> Result<&InvoiceRecord> {
        let language = self.language;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.apply(update, language);
        Ok(record)
    }

    /// Delete a record, returning it.
    pub fn remove(&mut self, id: &str) -> Result<InvoiceRecord> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.records.remove(idx))
    }

    /// Write the whole collection back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved {} invoice(s) to {}", self.records.len(), self.path.display());
        Ok(())
    }

    /// Records ordered by `key`. Ties keep store order.
    pub fn sorted(&self, key: SortKey, direction: SortDirection) -> Vec<&InvoiceRecord> {
        let mut sorted: Vec<&InvoiceRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = compare(a, b, key);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        sorted
    }

    /// Sorted records split into display groups: by month when sorting by
    /// date, otherwise a single group.
    pub fn grouped(&self, key: SortKey, direction: SortDirection, lang: Language) -> Vec<InvoiceGroup<'_>> {
        let sorted = self.sorted(key, direction);

        if key != SortKey::Date {
            return vec![InvoiceGroup {
                title: lang.all_invoices().to_string(),
                invoices: sorted,
            }];
        }

        let mut groups: Vec<InvoiceGroup<'_>> = Vec::new();
        for record in sorted {
            let title = match record.parsed_date() {
                Some(date) => lang.month_year(date),
                None => lang.unknown_date().to_string(),
            };

            match groups.iter_mut().find(|g| g.title == title) {
                Some(group) => group.invoices.push(record),
                None => groups.push(InvoiceGroup {
                    title,
                    invoices: vec![record],
                }),
            }
        }
        groups
    }

    /// Sum of all prices; non-numeric prices count as zero. Saturates
    /// instead of overflowing on absurd hand-entered prices.
    pub fn total(&self) -> Decimal {
        self.records
            .iter()
            .map(|r| numeric_price(&r.price))
            .fold(Decimal::ZERO, |acc, price| acc.saturating_add(price))
    }
}

/// File name of a user's store. Characters outside `[A-Za-z0-9_-]` are
/// replaced so the id cannot escape the data directory.
pub fn store_file_name(user_id: &str) -> String {
    let safe: String = user_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("fwateery_data_{}.json", safe)
}

/// Numeric value of a price string, ignoring currency noise.
///
/// Only digits, `.` and `-` are kept and the leading number is read, so
/// `"1.2.3"` is 1.2 and `"12-3"` is 12. Values beyond the decimal range
/// clamp to its bounds.
pub fn numeric_price(price: &str) -> Decimal {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let (negative, int_part, frac_part) = leading_number(&cleaned);
    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let mut literal = String::with_capacity(cleaned.len() + 1);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    match Decimal::from_str(&literal) {
        Ok(value) => value,
        Err(_) if negative => Decimal::MIN,
        Err(_) => Decimal::MAX,
    }
}

/// Split off an optional sign, integer digits and fraction digits.
fn leading_number(s: &str) -> (bool, &str, &str) {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let int_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let int_part = &rest[..int_end];

    let frac_part = match rest[int_end..].strip_prefix('.') {
        Some(after) => {
            let frac_end = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
            &after[..frac_end]
        }
        None => "",
    };

    (negative, int_part, frac_part)
}

fn load_records(path: &Path) -> Result<Vec<InvoiceRecord>> {
    let content = fs::read_to_string(path)?;
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    if !value.is_array() {
        return Err(corrupt("expected a JSON array".to_string()));
    }
    serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))
}

fn compare(a: &InvoiceRecord, b: &InvoiceRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => numeric_price(&a.price).cmp(&numeric_price(&b.price)),
        SortKey::Date => a.parsed_date().cmp(&b.parsed_date()),
        SortKey::PatientName => a.patient_name.to_lowercase().cmp(&b.patient_name.to_lowercase()),
        SortKey::Procedure => a.procedure.to_lowercase().cmp(&b.procedure.to_lowercase()),
    }
}
