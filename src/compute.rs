//! Payroll wage derivation.
//!
//! Pure arithmetic over a submitted timesheet/benefit record. Presentation
//! layers own the currency rounding; nothing here rounds or fails.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-unit peso rates mandated by the current wage order.
/// TODO: re-check against the next wage order before the January run.
pub const NIGHT_DIFF_RATE: f64 = 8.06;
pub const SPECIAL_HOLIDAY_RATE: f64 = 104.81;
pub const REGULAR_HOLIDAY_RATE: f64 = 161.25;
pub const OVERTIME_RATE: f64 = 100.78;

/// Raw payroll inputs for one employee and one pay period.
///
/// Every field is optional on the wire; a field the client leaves out is
/// read as zero.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PayrollInput {
    #[schema(example = 80.0)]
    pub number_of_regular_hours: f64,
    #[schema(example = 81.25)]
    pub hourly_rate: f64,
    /// Night differential hours worked (22:00-06:00).
    #[schema(example = 8.0)]
    pub regular_night_differential: f64,
    /// Special non-working holiday units.
    #[schema(example = 1.0)]
    pub special_holiday: f64,
    /// Regular holiday units.
    #[schema(example = 1.0)]
    pub regular_holiday: f64,
    /// Overtime units beyond the regular schedule.
    #[schema(example = 2.0)]
    pub overtime: f64,
    #[schema(example = 541.66)]
    pub prorated_13th_month_pay: f64,
    #[schema(example = 325.0)]
    pub service_incentive_leave: f64,
    /// Pag-IBIG contribution.
    #[schema(example = 100.0)]
    pub hdmf: f64,
    /// Pag-IBIG loan amortization.
    #[schema(example = 0.0)]
    pub hdmf_loans: f64,
    /// Social Security System contribution.
    #[schema(example = 585.0)]
    pub sss: f64,
    /// PhilHealth contribution.
    #[schema(example = 325.0)]
    pub phic: f64,
}

/// Wage totals derived from a [`PayrollInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollTotals {
    #[schema(example = 6500.0)]
    pub total_regular_wage: f64,
    #[schema(example = 7800.0)]
    pub total_amount: f64,
    #[schema(example = 6790.0)]
    pub net_pay: f64,
}

/// Derives gross wage, total amount and net pay from raw inputs.
///
/// Deterministic and total: the same input always produces the same totals,
/// and `total_amount - net_pay` is exactly the sum of the four deductions.
pub fn derive_totals(input: &PayrollInput) -> PayrollTotals {
    let total_regular_wage = input.number_of_regular_hours * input.hourly_rate;

    let total_amount = total_regular_wage
        + input.regular_night_differential * NIGHT_DIFF_RATE
        + input.prorated_13th_month_pay
        + input.special_holiday * SPECIAL_HOLIDAY_RATE
        + input.regular_holiday * REGULAR_HOLIDAY_RATE
        + input.service_incentive_leave
        + input.overtime * OVERTIME_RATE;

    let net_pay = total_amount - input.hdmf - input.hdmf_loans - input.sss - input.phic;

    PayrollTotals {
        total_regular_wage,
        total_amount,
        net_pay,
    }
}

/// Presentation tag for a payroll status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusStyle {
    Warning,
    Success,
    Default,
}

/// Maps a payroll status label to its badge style.
///
/// Unknown or empty labels fall back to [`StatusStyle::Default`].
pub fn status_style(status: &str) -> StatusStyle {
    match status.to_ascii_lowercase().as_str() {
        "pending" => StatusStyle::Warning,
        "processed" => StatusStyle::Success,
        _ => StatusStyle::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_input_derives_all_zero_totals() {
        let totals = derive_totals(&PayrollInput::default());

        assert_eq!(totals.total_regular_wage, 0.0);
        assert_eq!(totals.total_amount, 0.0);
        assert_eq!(totals.net_pay, 0.0);
    }

    #[test]
    fn test_regular_hours_times_rate() {
        let input = PayrollInput {
            number_of_regular_hours: 8.0,
            hourly_rate: 100.0,
            ..Default::default()
        };

        let totals = derive_totals(&input);

        assert_eq!(totals.total_regular_wage, 800.0);
        assert_eq!(totals.total_amount, 800.0);
        assert_eq!(totals.net_pay, 800.0);
    }

    #[test]
    fn test_overtime_units_use_fixed_rate() {
        let input = PayrollInput {
            overtime: 2.0,
            ..Default::default()
        };

        let totals = derive_totals(&input);

        assert!((totals.total_amount - 201.56).abs() < 1e-9);
    }

    #[test]
    fn test_deductions_identity_holds_exactly() {
        let input = PayrollInput {
            number_of_regular_hours: 88.0,
            hourly_rate: 81.25,
            regular_night_differential: 6.0,
            special_holiday: 1.0,
            regular_holiday: 2.0,
            overtime: 3.5,
            prorated_13th_month_pay: 541.66,
            service_incentive_leave: 325.0,
            hdmf: 100.0,
            hdmf_loans: 250.0,
            sss: 585.0,
            phic: 325.0,
        };

        let totals = derive_totals(&input);

        let deductions = input.hdmf + input.hdmf_loans + input.sss + input.phic;
        assert_eq!(totals.total_amount - totals.net_pay, deductions);
    }

    #[test]
    fn test_identical_inputs_yield_identical_totals() {
        let input = PayrollInput {
            number_of_regular_hours: 80.0,
            hourly_rate: 75.0,
            overtime: 1.0,
            sss: 500.0,
            ..Default::default()
        };

        assert_eq!(derive_totals(&input), derive_totals(&input));
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let input: PayrollInput =
            serde_json::from_str(r#"{"hourly_rate": 100.0, "number_of_regular_hours": 8.0}"#)
                .unwrap();

        assert_eq!(input.hourly_rate, 100.0);
        assert_eq!(input.number_of_regular_hours, 8.0);
        assert_eq!(input.hdmf, 0.0);
        assert_eq!(input.sss, 0.0);

        let totals = derive_totals(&input);
        assert_eq!(totals.net_pay, 800.0);
    }

    #[test]
    fn test_status_style_known_labels_are_distinct() {
        assert_eq!(status_style("Pending"), StatusStyle::Warning);
        assert_eq!(status_style("Processed"), StatusStyle::Success);
        assert_ne!(status_style("Pending"), status_style("Processed"));
    }

    #[test]
    fn test_status_style_is_case_insensitive_for_known_labels() {
        assert_eq!(status_style("pending"), StatusStyle::Warning);
        assert_eq!(status_style("PROCESSED"), StatusStyle::Success);
    }

    #[test]
    fn test_status_style_unknown_and_empty_fall_back_to_default() {
        assert_eq!(status_style(""), StatusStyle::Default);
        assert_eq!(status_style("archived"), StatusStyle::Default);
    }
}
