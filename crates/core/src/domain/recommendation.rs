use crate::domain::layout::{Field, RawEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lowercase tokens that mark a status as active, matched by containment.
pub const ACTIVE_STATUS_TOKENS: [&str; 2] = ["active", "live"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Intraday,
    ShortTerm,
    LongTerm,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Intraday, Bucket::ShortTerm, Bucket::LongTerm];

    /// Key of this bucket in the feed payload.
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Intraday => "intraday",
            Bucket::ShortTerm => "shortterm",
            Bucket::LongTerm => "longterm",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Bucket::Intraday => "Intraday",
            Bucket::ShortTerm => "Short Term",
            Bucket::LongTerm => "Long Term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub date: String,
    pub symbol: String,
    pub company: String,
    pub entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub status: String,
    pub trader: String,
    pub sector: String,
    pub current_price: f64,
    pub profit_loss_percent: f64,
    pub remarks: Option<String>,
    pub reported: Reported,
}

/// Values exactly as the feed sent them. Display fields above carry defaults;
/// aggregation must not count those defaults as real data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reported {
    pub status: Option<String>,
    pub trader: Option<String>,
    pub profit_loss_percent: Option<f64>,
}

impl Recommendation {
    pub fn from_raw(raw: &RawEntry<'_>) -> Self {
        Self {
            date: raw.text(Field::Date),
            symbol: raw.text(Field::Symbol),
            company: raw.text(Field::Company),
            entry: raw.number(Field::Entry),
            target: raw.number(Field::Target),
            stop_loss: raw.number(Field::StopLoss),
            status: raw.text(Field::Status),
            trader: raw.text(Field::Trader),
            sector: raw.text(Field::Sector),
            current_price: raw.number(Field::CurrentPrice),
            profit_loss_percent: raw.number(Field::ProfitLossPercent),
            remarks: raw.reported_text(Field::Remarks),
            reported: Reported {
                status: raw.reported_text(Field::Status),
                trader: raw.reported_text(Field::Trader),
                profit_loss_percent: raw.reported_number(Field::ProfitLossPercent),
            },
        }
    }

    /// Classified from the reported status, so a blank status shown as
    /// "ACTIVE" still does not count.
    pub fn is_active(&self) -> bool {
        self.reported
            .status
            .as_deref()
            .is_some_and(is_active_status)
    }

    /// Zero counts as positive for display.
    pub fn is_positive(&self) -> bool {
        self.profit_loss_percent >= 0.0
    }
}

pub fn normalize(raw: &Value) -> Recommendation {
    Recommendation::from_raw(&RawEntry::from_value(raw))
}

pub fn is_active_status(status: &str) -> bool {
    let lower = status.to_lowercase();
    ACTIVE_STATUS_TOKENS
        .iter()
        .any(|token| lower.contains(token))
}

/// Normalized recommendations per bucket, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub intraday: Vec<Recommendation>,
    pub shortterm: Vec<Recommendation>,
    pub longterm: Vec<Recommendation>,
}

impl Feed {
    pub fn bucket(&self, bucket: Bucket) -> &[Recommendation] {
        match bucket {
            Bucket::Intraday => &self.intraday,
            Bucket::ShortTerm => &self.shortterm,
            Bucket::LongTerm => &self.longterm,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Recommendation> {
        match bucket {
            Bucket::Intraday => &mut self.intraday,
            Bucket::ShortTerm => &mut self.shortterm,
            Bucket::LongTerm => &mut self.longterm,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &Recommendation)> + '_ {
        Bucket::ALL
            .into_iter()
            .flat_map(move |bucket| self.bucket(bucket).iter().map(move |r| (bucket, r)))
    }

    pub fn len(&self) -> usize {
        self.intraday.len() + self.shortterm.len() + self.longterm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
