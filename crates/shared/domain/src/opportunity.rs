use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub entity_id: Option<Uuid>,
    pub name: String,
    pub status_id: Option<Uuid>,
    pub type_id: Option<Uuid>,
    pub detail: String,
    pub amount: Option<Decimal>,
    pub ended: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Success probability in percent
    pub probability: i32,
}
