use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::payroll::{
    CreatePayroll, PaginatedPayrollResponse, PayrollQuery, PayrollResponse, UpdatePayroll,
};
use crate::compute::{PayrollInput, PayrollTotals, StatusStyle};
use crate::model::employee::Employee;
use crate::model::payroll::{Payroll, PayrollStatus};
use crate::models::{ChangePasswordReq, LoginReqDto, UserReq};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll HR API",
        version = "1.0.0",
        description = r#"
## Payroll & Employee Records API

This API powers a payroll and employee-records system for HR staff.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, view and delete employee profiles
- **Payroll Management**
  - Submit timesheet/benefit inputs; gross, total and net pay are derived server-side
  - Process pending payroll records
- **Exports**
  - Tabular employee listing as PDF
  - Styled per-period payslip workbook (xlsx)
- **Account Security**
  - Registration with password policy, token refresh/rotation, password change

### 🔐 Security
Endpoints under the API prefix require **JWT Bearer authentication**.
Employee management is open to **HR** and **Admin** roles; payroll and
payslip exports are **Admin** only.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::change_password,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::create_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::process_payroll,
        crate::api::payroll::delete_payroll,

        crate::api::export::employees_pdf,
        crate::api::export::payslip_xlsx
    ),
    components(
        schemas(
            UserReq,
            LoginReqDto,
            ChangePasswordReq,
            Employee,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Payroll,
            PayrollStatus,
            PayrollInput,
            PayrollTotals,
            StatusStyle,
            CreatePayroll,
            UpdatePayroll,
            PayrollQuery,
            PayrollResponse,
            PaginatedPayrollResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and account security APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
        (name = "Export", description = "PDF and spreadsheet export APIs"),
    )
)]
pub struct ApiDoc;
