// Rate card model
//
// Each company has at most one rate card. A booking is priced as
//   subtotal    = base_rate + per_article_rate * articles + surcharge[parcel_type]
//   gst         = subtotal * gst_rate
//   grand_total = subtotal + gst
// with every figure rounded to cents.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::round_money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCard {
    pub id: String,
    pub company_id: String,
    /// Resolved from companies on read
    pub company_name: Option<String>,
    pub base_rate: Decimal,
    pub per_article_rate: Decimal,
    /// Extra charge per parcel type, e.g. {"Express": 150, "Fragile": 75}
    pub surcharges: BTreeMap<String, Decimal>,
    pub effective_from: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

/// Amounts charged for one booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub grand_total: Decimal,
}

impl Quote {
    /// Apply GST to an already-known subtotal
    pub fn from_subtotal(subtotal: Decimal, gst_rate: Decimal) -> Self {
        let subtotal = round_money(subtotal);
        let gst = round_money(subtotal * gst_rate);
        Self {
            subtotal,
            gst,
            grand_total: subtotal + gst,
        }
    }
}

impl RateCard {
    /// Surcharge for `parcel_type`; unlisted types carry none
    pub fn surcharge_for(&self, parcel_type: &str) -> Decimal {
        self.surcharges
            .iter()
            .find(|(kind, _)| kind.eq_ignore_ascii_case(parcel_type))
            .map(|(_, amount)| *amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn quote(&self, article_count: i32, parcel_type: &str, gst_rate: Decimal) -> Quote {
        let subtotal = self.base_rate
            + self.per_article_rate * Decimal::from(article_count)
            + self.surcharge_for(parcel_type);
        Quote::from_subtotal(subtotal, gst_rate)
    }
}

/// Request body for PUT /ratecards
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRateCardRequest {
    pub company_id: String,
    pub base_rate: Decimal,
    pub per_article_rate: Decimal,
    #[serde(default)]
    pub surcharges: BTreeMap<String, Decimal>,
    /// Defaults to the current day
    pub effective_from: Option<NaiveDate>,
}
