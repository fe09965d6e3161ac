//! Deal records as delivered by the remote catalog service.
//!
//! These are plain data: the feed controllers only append and hand them to
//! the renderer, never mutate them.

use serde::Deserialize;

/// A single time-limited discount offer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: u64,
    pub title: String,
    pub original_price: u64,
    pub discounted_price: u64,
    pub discount_rate: u32,
    pub image: String,
    /// End of the discount, as an ISO-8601 string.  Only brand deals carry it.
    #[serde(default)]
    pub discount_end_date: Option<String>,
    /// Remaining stock, 0–100.
    #[serde(default)]
    pub stock_percentage: Option<f64>,
}

/// One page of a paginated deal listing.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealPage {
    pub item_list: Vec<Deal>,
    pub is_last_page: bool,
}

/// Format a price with thousands separators and the won suffix
/// (e.g. `12900` → `"12,900원"`).
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

#[cfg(test)]
pub(crate) fn sample_deal(id: u64) -> Deal {
    Deal {
        id,
        title: format!("deal #{id}"),
        original_price: 20_000,
        discounted_price: 12_900,
        discount_rate: 35,
        image: format!("https://img.example/{id}.png"),
        discount_end_date: None,
        stock_percentage: None,
    }
}
