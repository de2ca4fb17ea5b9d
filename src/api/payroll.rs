use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::compute::{self, PayrollInput, StatusStyle};
use crate::model::payroll::{Payroll, PayrollStatus};

#[derive(Deserialize, ToSchema)]
pub struct CreatePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,

    /// First day of the pay period.
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub period: NaiveDate,

    #[serde(flatten)]
    pub input: PayrollInput,
}

/// Partial update; absent fields keep their stored values.
#[derive(Deserialize, ToSchema)]
pub struct UpdatePayroll {
    #[schema(example = "2026-01-16", value_type = String, format = "date")]
    pub period: Option<NaiveDate>,
    pub number_of_regular_hours: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub regular_night_differential: Option<f64>,
    pub special_holiday: Option<f64>,
    pub regular_holiday: Option<f64>,
    pub overtime: Option<f64>,
    pub prorated_13th_month_pay: Option<f64>,
    pub service_incentive_leave: Option<f64>,
    pub hdmf: Option<f64>,
    pub hdmf_loans: Option<f64>,
    pub sss: Option<f64>,
    pub phic: Option<f64>,
}

impl UpdatePayroll {
    /// Overlays the provided fields on top of the stored inputs.
    fn merge_into(&self, current: &Payroll) -> PayrollInput {
        PayrollInput {
            number_of_regular_hours: self
                .number_of_regular_hours
                .unwrap_or(current.number_of_regular_hours),
            hourly_rate: self.hourly_rate.unwrap_or(current.hourly_rate),
            regular_night_differential: self
                .regular_night_differential
                .unwrap_or(current.regular_night_differential),
            special_holiday: self.special_holiday.unwrap_or(current.special_holiday),
            regular_holiday: self.regular_holiday.unwrap_or(current.regular_holiday),
            overtime: self.overtime.unwrap_or(current.overtime),
            prorated_13th_month_pay: self
                .prorated_13th_month_pay
                .unwrap_or(current.prorated_13th_month_pay),
            service_incentive_leave: self
                .service_incentive_leave
                .unwrap_or(current.service_incentive_leave),
            hdmf: self.hdmf.unwrap_or(current.hdmf),
            hdmf_loans: self.hdmf_loans.unwrap_or(current.hdmf_loans),
            sss: self.sss.unwrap_or(current.sss),
            phic: self.phic.unwrap_or(current.phic),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PayrollResponse {
    #[serde(flatten)]
    pub record: Payroll,

    /// Badge style for the status field.
    pub status_style: StatusStyle,
}

impl From<Payroll> for PayrollResponse {
    fn from(record: Payroll) -> Self {
        let status_style = compute::status_style(&record.status);
        PayrollResponse {
            record,
            status_style,
        }
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    #[schema(example = "pending")]
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

async fn employee_exists(pool: &MySqlPool, employee_id: u64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?)")
        .bind(employee_id)
        .fetch_one(pool)
        .await
}

#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll created with derived totals"),
        (status = 400, description = "Unknown employee"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn create_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let known = employee_exists(pool.get_ref(), payload.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to check employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !known {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee not found"
        })));
    }

    let totals = compute::derive_totals(&payload.input);

    let result = sqlx::query(
        r#"
        INSERT INTO payroll
        (employee_id, period,
         number_of_regular_hours, hourly_rate, regular_night_differential,
         special_holiday, regular_holiday, overtime, prorated_13th_month_pay,
         service_incentive_leave, hdmf, hdmf_loans, sss, phic,
         total_regular_wage, total_amount, net_pay, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.period)
    .bind(payload.input.number_of_regular_hours)
    .bind(payload.input.hourly_rate)
    .bind(payload.input.regular_night_differential)
    .bind(payload.input.special_holiday)
    .bind(payload.input.regular_holiday)
    .bind(payload.input.overtime)
    .bind(payload.input.prorated_13th_month_pay)
    .bind(payload.input.service_incentive_leave)
    .bind(payload.input.hdmf)
    .bind(payload.input.hdmf_loans)
    .bind(payload.input.sss)
    .bind(payload.input.phic)
    .bind(totals.total_regular_wage)
    .bind(totals.total_amount)
    .bind(totals.net_pay)
    .bind(PayrollStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create payroll");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Payroll created successfully",
        "id": result.last_insert_id(),
        "totals": totals
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    request_body = UpdatePayroll,
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll updated, totals recomputed"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdatePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let current = sqlx::query_as::<_, Payroll>("SELECT * FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch payroll");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let current = match current {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Payroll record not found"
            })));
        }
    };

    let period = body.period.unwrap_or(current.period);
    let input = body.merge_into(&current);
    let totals = compute::derive_totals(&input);

    sqlx::query(
        r#"
        UPDATE payroll
        SET period = ?,
            number_of_regular_hours = ?, hourly_rate = ?, regular_night_differential = ?,
            special_holiday = ?, regular_holiday = ?, overtime = ?, prorated_13th_month_pay = ?,
            service_incentive_leave = ?, hdmf = ?, hdmf_loans = ?, sss = ?, phic = ?,
            total_regular_wage = ?, total_amount = ?, net_pay = ?
        WHERE id = ?
        "#,
    )
    .bind(period)
    .bind(input.number_of_regular_hours)
    .bind(input.hourly_rate)
    .bind(input.regular_night_differential)
    .bind(input.special_holiday)
    .bind(input.regular_holiday)
    .bind(input.overtime)
    .bind(input.prorated_13th_month_pay)
    .bind(input.service_incentive_leave)
    .bind(input.hdmf)
    .bind(input.hdmf_loans)
    .bind(input.sss)
    .bind(input.phic)
    .bind(totals.total_regular_wage)
    .bind(totals.total_amount)
    .bind(totals.net_pay)
    .bind(payroll_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, payroll_id, "Failed to update payroll");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll updated successfully",
        "totals": totals
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, body = PayrollResponse),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let payroll = sqlx::query_as::<_, Payroll>("SELECT * FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to fetch payroll");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match payroll {
        Some(p) => Ok(HttpResponse::Ok().json(PayrollResponse::from(p))),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        conditions.push("employee_id = ?");
        bindings.push(employee_id.to_string());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM payroll {}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count payrolls");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM payroll {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, Payroll>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let records = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch payroll list");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data: records.into_iter().map(PayrollResponse::from).collect(),
        page,
        per_page,
        total,
    }))
}

/// Mark a pending payroll as processed
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/process",
    params(
        ("payroll_id" = u64, Path, description = "ID of the payroll record to process")
    ),
    responses(
        (status = 200, description = "Payroll marked as processed", body = Object, example = json!({
            "message": "Payroll processed"
        })),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Payroll already processed"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn process_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE payroll
        SET status = ?
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(PayrollStatus::Processed.as_str())
    .bind(payroll_id)
    .bind(PayrollStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, payroll_id, "Process payroll failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        // distinguish missing from already-processed
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM payroll WHERE id = ?)",
        )
        .bind(payroll_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to check payroll");
            ErrorInternalServerError("Internal Server Error")
        })?;

        if exists {
            return Ok(HttpResponse::Conflict().json(json!({
                "message": "Payroll already processed"
            })));
        }

        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payroll processed"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll deleted"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn delete_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let result = sqlx::query("DELETE FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id, "Failed to delete payroll");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Payroll not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
