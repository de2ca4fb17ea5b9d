use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

use crate::auth::auth::AuthUser;
use crate::export;
use crate::model::{employee::Employee, payroll::Payroll};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Export the employee listing as a PDF
#[utoipa::path(
    get,
    path = "/api/v1/employees/export/pdf",
    responses(
        (status = 200, description = "Tabular employee listing", content_type = "application/pdf"),
        (status = 500, description = "Export failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
pub async fn employees_pdf(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id DESC")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employees for export");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let bytes = match export::pdf::employee_listing(&employees) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Employee listing export failed");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Failed to generate the employee listing"
            })));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"employees.pdf\"",
        ))
        .body(bytes))
}

/// Export one payroll record as a payslip workbook
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}/payslip",
    params(
        ("payroll_id" = u64, Path, description = "ID of the payroll record to export")
    ),
    responses(
        (status = 200, description = "Styled payslip workbook"),
        (status = 404, description = "Payroll or employee not found"),
        (status = 500, description = "Export failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
pub async fn payslip_xlsx(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let record = sqlx::query_as::<_, Payroll>("SELECT * FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch payroll for export");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let record = match record {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Payroll not found"
            })));
        }
    };

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(record.employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch employee for export");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Employee not found"
            })));
        }
    };

    let buffer = match export::xlsx::payslip(&employee, &record) {
        Ok(buffer) => buffer,
        Err(e) => {
            error!(error = %e, payroll_id, "Payslip export failed");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Failed to generate the payslip"
            })));
        }
    };

    let filename = format!(
        "attachment; filename=\"payslip-{}-{}.xlsx\"",
        employee.employee_code,
        record.period.format("%Y-%m-%d")
    );

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(("Content-Disposition", filename))
        .body(buffer))
}
