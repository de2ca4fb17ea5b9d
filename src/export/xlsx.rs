//! Payslip workbook layout.
//!
//! One worksheet per payslip: an identity header, an earnings block, a
//! deductions block and the net pay line, written at fixed row offsets.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::compute::{
    self, NIGHT_DIFF_RATE, OVERTIME_RATE, REGULAR_HOLIDAY_RATE, SPECIAL_HOLIDAY_RATE, StatusStyle,
};
use crate::export::ExportError;
use crate::model::{employee::Employee, payroll::Payroll};

const COL_LABEL: u16 = 0;
const COL_UNITS: u16 = 1;
const COL_AMOUNT: u16 = 2;

const COL_LABEL_WIDTH: f64 = 28.0;
const COL_UNITS_WIDTH: f64 = 12.0;
const COL_AMOUNT_WIDTH: f64 = 16.0;

// Row offsets of the fixed payslip layout
const ROW_TITLE: u32 = 0;
const ROW_EMPLOYEE: u32 = 2;
const ROW_CODE: u32 = 3;
const ROW_PERIOD: u32 = 4;
const ROW_STATUS: u32 = 5;
const ROW_EARNINGS_HEADER: u32 = 7;
const EARNINGS_ROWS: u32 = 7;
const ROW_TOTAL_AMOUNT: u32 = ROW_EARNINGS_HEADER + 1 + EARNINGS_ROWS;
const ROW_DEDUCTIONS_HEADER: u32 = ROW_TOTAL_AMOUNT + 2;
const DEDUCTION_ROWS: u32 = 4;
const ROW_NET_PAY: u32 = ROW_DEDUCTIONS_HEADER + 1 + DEDUCTION_ROWS + 1;

fn status_fill(style: StatusStyle) -> Option<Color> {
    match style {
        StatusStyle::Warning => Some(Color::RGB(0xFFF3CD)),
        StatusStyle::Success => Some(Color::RGB(0xD1E7DD)),
        StatusStyle::Default => None,
    }
}

/// Renders one payslip workbook and returns it as an in-memory xlsx buffer.
pub fn payslip(employee: &Employee, record: &Payroll) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Payslip")?;

    worksheet.set_column_width(COL_LABEL, COL_LABEL_WIDTH)?;
    worksheet.set_column_width(COL_UNITS, COL_UNITS_WIDTH)?;
    worksheet.set_column_width(COL_AMOUNT, COL_AMOUNT_WIDTH)?;

    let title = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let section = Format::new().set_bold().set_border(FormatBorder::Thin);
    let label = Format::new().set_border(FormatBorder::Thin);
    let units = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("0.00")
        .set_align(FormatAlign::Right);
    let amount = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);
    let total = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);

    let mut status = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    if let Some(fill) = status_fill(compute::status_style(&record.status)) {
        status = status.set_background_color(fill);
    }

    worksheet.merge_range(ROW_TITLE, COL_LABEL, ROW_TITLE, COL_AMOUNT, "PAYSLIP", &title)?;

    worksheet.write_string_with_format(ROW_EMPLOYEE, COL_LABEL, "Employee", &label)?;
    worksheet.merge_range(
        ROW_EMPLOYEE,
        COL_UNITS,
        ROW_EMPLOYEE,
        COL_AMOUNT,
        &employee.display_name(),
        &label,
    )?;
    worksheet.write_string_with_format(ROW_CODE, COL_LABEL, "Employee code", &label)?;
    worksheet.merge_range(
        ROW_CODE,
        COL_UNITS,
        ROW_CODE,
        COL_AMOUNT,
        &employee.employee_code,
        &label,
    )?;
    worksheet.write_string_with_format(ROW_PERIOD, COL_LABEL, "Pay period", &label)?;
    worksheet.merge_range(
        ROW_PERIOD,
        COL_UNITS,
        ROW_PERIOD,
        COL_AMOUNT,
        &record.period.format("%Y-%m-%d").to_string(),
        &label,
    )?;
    worksheet.write_string_with_format(ROW_STATUS, COL_LABEL, "Status", &label)?;
    worksheet.merge_range(
        ROW_STATUS,
        COL_UNITS,
        ROW_STATUS,
        COL_AMOUNT,
        &record.status,
        &status,
    )?;

    // -------- earnings --------
    worksheet.merge_range(
        ROW_EARNINGS_HEADER,
        COL_LABEL,
        ROW_EARNINGS_HEADER,
        COL_AMOUNT,
        "EARNINGS",
        &section,
    )?;

    let earnings: [(&str, f64, f64); EARNINGS_ROWS as usize] = [
        (
            "Regular wage",
            record.number_of_regular_hours,
            record.total_regular_wage,
        ),
        (
            "Night differential",
            record.regular_night_differential,
            record.regular_night_differential * NIGHT_DIFF_RATE,
        ),
        (
            "Special holiday",
            record.special_holiday,
            record.special_holiday * SPECIAL_HOLIDAY_RATE,
        ),
        (
            "Regular holiday",
            record.regular_holiday,
            record.regular_holiday * REGULAR_HOLIDAY_RATE,
        ),
        ("Overtime", record.overtime, record.overtime * OVERTIME_RATE),
        (
            "13th month pay (prorated)",
            0.0,
            record.prorated_13th_month_pay,
        ),
        (
            "Service incentive leave",
            0.0,
            record.service_incentive_leave,
        ),
    ];

    for (offset, (name, unit_count, peso)) in earnings.iter().enumerate() {
        let row = ROW_EARNINGS_HEADER + 1 + offset as u32;
        worksheet.write_string_with_format(row, COL_LABEL, *name, &label)?;
        worksheet.write_number_with_format(row, COL_UNITS, *unit_count, &units)?;
        worksheet.write_number_with_format(row, COL_AMOUNT, *peso, &amount)?;
    }

    worksheet.write_string_with_format(ROW_TOTAL_AMOUNT, COL_LABEL, "Total amount", &section)?;
    worksheet.write_string_with_format(ROW_TOTAL_AMOUNT, COL_UNITS, "", &label)?;
    worksheet.write_number_with_format(ROW_TOTAL_AMOUNT, COL_AMOUNT, record.total_amount, &total)?;

    // -------- deductions --------
    worksheet.merge_range(
        ROW_DEDUCTIONS_HEADER,
        COL_LABEL,
        ROW_DEDUCTIONS_HEADER,
        COL_AMOUNT,
        "DEDUCTIONS",
        &section,
    )?;

    let deductions: [(&str, f64); DEDUCTION_ROWS as usize] = [
        ("HDMF", record.hdmf),
        ("HDMF loans", record.hdmf_loans),
        ("SSS", record.sss),
        ("PhilHealth", record.phic),
    ];

    for (offset, (name, peso)) in deductions.iter().enumerate() {
        let row = ROW_DEDUCTIONS_HEADER + 1 + offset as u32;
        worksheet.write_string_with_format(row, COL_LABEL, *name, &label)?;
        worksheet.write_string_with_format(row, COL_UNITS, "", &label)?;
        worksheet.write_number_with_format(row, COL_AMOUNT, *peso, &amount)?;
    }

    worksheet.write_string_with_format(ROW_NET_PAY, COL_LABEL, "NET PAY", &section)?;
    worksheet.write_string_with_format(ROW_NET_PAY, COL_UNITS, "", &label)?;
    worksheet.write_number_with_format(ROW_NET_PAY, COL_AMOUNT, record.net_pay, &total)?;

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_employee() -> Employee {
        Employee {
            id: 1,
            employee_code: "EMP-001".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: "maria.santos@company.com".to_string(),
            phone: None,
            department: Some("Accounting".to_string()),
            position: Some("Payroll Officer".to_string()),
            status: "active".to_string(),
            sss_no: None,
            philhealth_no: None,
            pagibig_no: None,
            tin_no: None,
            hire_date: None,
            created_at: None,
        }
    }

    fn sample_payroll(status: &str) -> Payroll {
        Payroll {
            id: 7,
            employee_id: 1,
            period: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            number_of_regular_hours: 80.0,
            hourly_rate: 81.25,
            regular_night_differential: 8.0,
            special_holiday: 1.0,
            regular_holiday: 1.0,
            overtime: 2.0,
            prorated_13th_month_pay: 541.66,
            service_incentive_leave: 325.0,
            hdmf: 100.0,
            hdmf_loans: 0.0,
            sss: 585.0,
            phic: 325.0,
            total_regular_wage: 6500.0,
            total_amount: 7898.66,
            net_pay: 6888.66,
            status: status.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_payslip_builds_a_nonempty_xlsx_buffer() {
        let buffer = payslip(&sample_employee(), &sample_payroll("pending")).unwrap();

        // xlsx is a zip container
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_payslip_builds_for_every_status_style() {
        for status in ["pending", "processed", "archived"] {
            assert!(payslip(&sample_employee(), &sample_payroll(status)).is_ok());
        }
    }

    #[test]
    fn test_status_fill_matches_badge_styles() {
        assert!(status_fill(StatusStyle::Warning).is_some());
        assert!(status_fill(StatusStyle::Success).is_some());
        assert!(status_fill(StatusStyle::Default).is_none());
    }
}
