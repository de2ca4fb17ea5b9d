use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::compute::PayrollInput;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,

    /// First day of the pay period this record covers.
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period: NaiveDate,

    pub number_of_regular_hours: f64,
    pub hourly_rate: f64,
    pub regular_night_differential: f64,
    pub special_holiday: f64,
    pub regular_holiday: f64,
    pub overtime: f64,
    pub prorated_13th_month_pay: f64,
    pub service_incentive_leave: f64,
    pub hdmf: f64,
    pub hdmf_loans: f64,
    pub sss: f64,
    pub phic: f64,

    // Derived columns, recomputed on every write
    pub total_regular_wage: f64,
    pub total_amount: f64,
    pub net_pay: f64,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payroll {
    /// Reassembles the raw inputs this record was derived from, for
    /// recomputation on partial update and for the payslip export.
    pub fn input(&self) -> PayrollInput {
        PayrollInput {
            number_of_regular_hours: self.number_of_regular_hours,
            hourly_rate: self.hourly_rate,
            regular_night_differential: self.regular_night_differential,
            special_holiday: self.special_holiday,
            regular_holiday: self.regular_holiday,
            overtime: self.overtime,
            prorated_13th_month_pay: self.prorated_13th_month_pay,
            service_incentive_leave: self.service_incentive_leave,
            hdmf: self.hdmf,
            hdmf_loans: self.hdmf_loans,
            sss: self.sss,
            phic: self.phic,
        }
    }
}

/// Payroll record lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    Pending,
    Processed,
}

impl PayrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::Pending => "pending",
            PayrollStatus::Processed => "processed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::derive_totals;

    #[test]
    fn test_input_round_trips_through_derivation() {
        let record = Payroll {
            id: 7,
            employee_id: 1001,
            period: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            number_of_regular_hours: 80.0,
            hourly_rate: 81.25,
            regular_night_differential: 0.0,
            special_holiday: 0.0,
            regular_holiday: 0.0,
            overtime: 0.0,
            prorated_13th_month_pay: 0.0,
            service_incentive_leave: 0.0,
            hdmf: 100.0,
            hdmf_loans: 0.0,
            sss: 585.0,
            phic: 325.0,
            total_regular_wage: 6500.0,
            total_amount: 6500.0,
            net_pay: 5490.0,
            status: "pending".to_string(),
            created_at: None,
        };

        let totals = derive_totals(&record.input());
        assert_eq!(totals.total_regular_wage, record.total_regular_wage);
        assert_eq!(totals.total_amount, record.total_amount);
        assert_eq!(totals.net_pay, record.net_pay);
    }

    #[test]
    fn test_status_labels_match_persisted_values() {
        assert_eq!(PayrollStatus::Pending.as_str(), "pending");
        assert_eq!(PayrollStatus::Processed.as_str(), "processed");
    }
}
