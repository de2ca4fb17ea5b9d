//! Document exports: payslip workbooks and the employee listing PDF.
//!
//! Builders work entirely in memory and hand back a byte buffer; a failed
//! build drops the buffer, so nothing partial ever reaches a response.

pub mod pdf;
pub mod xlsx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet library rejected a cell write or the workbook save.
    #[error("workbook build failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF library rejected a font load or the document save.
    #[error("document build failed: {0}")]
    Document(#[from] printpdf::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ExportError>();
    }
}
