//! Employee listing PDF.
//!
//! Letter-size pages, builtin Helvetica, one row per employee at fixed
//! column x-offsets. The whole document is assembled in memory.

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfLayerReference};

use crate::export::ExportError;
use crate::model::employee::Employee;

const PAGE_WIDTH: f32 = 215.9; // US Letter
const PAGE_HEIGHT: f32 = 279.4;

const MARGIN_LEFT: f32 = 12.0;
const MARGIN_BOTTOM: f32 = 15.0;
const TITLE_Y: f32 = 265.0;
const HEADER_Y: f32 = 253.0;
const ROW_STEP: f32 = 6.0;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 10.0;
const ROW_SIZE: f32 = 9.0;

// Column x-offsets, relative to the left margin
const COL_CODE: f32 = 0.0;
const COL_NAME: f32 = 28.0;
const COL_DEPARTMENT: f32 = 88.0;
const COL_POSITION: f32 = 130.0;
const COL_STATUS: f32 = 175.0;

const COLUMNS: [(&str, f32); 5] = [
    ("Code", COL_CODE),
    ("Name", COL_NAME),
    ("Department", COL_DEPARTMENT),
    ("Position", COL_POSITION),
    ("Status", COL_STATUS),
];

fn write_header(layer: &PdfLayerReference, font: &printpdf::IndirectFontRef) {
    for (label, x) in COLUMNS {
        layer.use_text(label, HEADER_SIZE, Mm(MARGIN_LEFT + x), Mm(HEADER_Y), font);
    }
}

/// Renders the tabular employee listing and returns the PDF bytes.
pub fn employee_listing(employees: &[Employee]) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Employee Listing",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Listing",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    layer.use_text(
        "Employee Listing",
        TITLE_SIZE,
        Mm(MARGIN_LEFT),
        Mm(TITLE_Y),
        &font_bold,
    );
    write_header(&layer, &font_bold);

    let mut y = HEADER_Y - ROW_STEP;

    for employee in employees {
        if y < MARGIN_BOTTOM {
            let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Listing");
            layer = doc.get_page(page).get_layer(layer_idx);
            write_header(&layer, &font_bold);
            y = HEADER_Y - ROW_STEP;
        }

        let cells = [
            (COL_CODE, employee.employee_code.clone()),
            (COL_NAME, employee.display_name()),
            (
                COL_DEPARTMENT,
                employee.department.clone().unwrap_or_default(),
            ),
            (COL_POSITION, employee.position.clone().unwrap_or_default()),
            (COL_STATUS, employee.status.clone()),
        ];

        for (x, text) in cells {
            layer.use_text(text, ROW_SIZE, Mm(MARGIN_LEFT + x), Mm(y), &font);
        }

        y -= ROW_STEP;
    }

    let bytes = doc.save_to_bytes()?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_employee(id: u64) -> Employee {
        Employee {
            id,
            employee_code: format!("EMP-{:03}", id),
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

    #[test]
    fn test_listing_produces_pdf_bytes() {
        let employees = vec![sample_employee(1), sample_employee(2)];

        let bytes = employee_listing(&employees).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_listing_still_renders_headers() {
        let bytes = employee_listing(&[]).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_listing_paginates() {
        let employees: Vec<Employee> = (1..=120).map(sample_employee).collect();

        let bytes = employee_listing(&employees).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
