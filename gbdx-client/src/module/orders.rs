//! Imagery ordering and order status.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{join_url, path_segment};
use crate::error::Result;
use crate::session::{self, HttpSession};

/// Acknowledgement returned when an order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Order number ("soli") to poll with [`get_order_status`].
    #[serde(default)]
    pub sales_order_number: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub sales_order_number: String,

    #[serde(default)]
    pub lines: Vec<OrderLine>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line item of an order, kept as the raw field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OrderLine {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// `percentDelivered`, which the service reports as a string or a number.
    pub fn percent_delivered(&self) -> Option<f64> {
        match self.fields.get("percentDelivered")? {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.percent_delivered().is_some_and(|p| p >= 100.0)
    }
}

impl OrderStatus {
    pub fn is_delivered(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(OrderLine::is_delivered)
    }
}

/// Places an order for the given catalog ids.
pub async fn order_images<S, I>(session: &S, cat_ids: &[I]) -> Result<OrderReceipt>
where
    S: HttpSession + ?Sized,
    I: AsRef<str>,
{
    let url = join_url(session.base_url(), &["orders", "v1"]);
    let ids: Vec<&str> = cat_ids.iter().map(|id| id.as_ref()).collect();
    let payload = session::encode(&url, &ids)?;

    tracing::info!("Ordering {} catalog ids", ids.len());
    let body = session.post_json(&url, payload).await?;
    Ok(session::decode(&url, body)?)
}

pub async fn get_order_status<S>(session: &S, soli: &str) -> Result<OrderStatus>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(session.base_url(), &["orders", "v1", "status", &path_segment(soli)]);
    tracing::info!("Fetching status of order {}", soli);
    let body = session.get_json(&url).await?;
    Ok(session::decode(&url, body)?)
}
