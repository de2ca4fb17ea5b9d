use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "Maria",
        "last_name": "Santos",
        "email": "maria.santos@company.com",
        "phone": "+639171234567",
        "department": "Accounting",
        "position": "Payroll Officer",
        "status": "active",
        "sss_no": "34-1234567-8",
        "philhealth_no": "12-345678901-2",
        "pagibig_no": "1234-5678-9012",
        "tin_no": "123-456-789-000",
        "hire_date": "2024-01-01",
        "created_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Maria")]
    pub first_name: String,

    #[schema(example = "Santos")]
    pub last_name: String,

    #[schema(example = "maria.santos@company.com")]
    pub email: String,

    #[schema(example = "+639171234567", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Accounting", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "Payroll Officer", nullable = true)]
    pub position: Option<String>,

    #[schema(example = "active")]
    pub status: String,

    // Government-mandated contribution IDs
    #[schema(example = "34-1234567-8", nullable = true)]
    pub sss_no: Option<String>,

    #[schema(example = "12-345678901-2", nullable = true)]
    pub philhealth_no: Option<String>,

    #[schema(example = "1234-5678-9012", nullable = true)]
    pub pagibig_no: Option<String>,

    #[schema(example = "123-456-789-000", nullable = true)]
    pub tin_no: Option<String>,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub hire_date: Option<NaiveDate>,

    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// "Last, First" form used by the payslip header and the PDF listing.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_last_comma_first() {
        let employee = Employee {
            id: 1,
            employee_code: "EMP-001".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: "maria.santos@company.com".to_string(),
            phone: None,
            department: None,
            position: None,
            status: "active".to_string(),
            sss_no: None,
            philhealth_no: None,
            pagibig_no: None,
            tin_no: None,
            hire_date: None,
            created_at: None,
        };

        assert_eq!(employee.display_name(), "Santos, Maria");
    }
}
