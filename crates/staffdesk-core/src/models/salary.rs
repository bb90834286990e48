use serde::{Deserialize, Serialize};

use super::Id;

/// Payslip for one employee and month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct SalarySlip {
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Option<Id>,
    #[serde(rename = "employeeName", alias = "employee_name")]
    pub employee_name: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub earnings: Vec<SalaryComponent>,
    pub deductions: Vec<SalaryComponent>,
    #[serde(rename = "grossPay", alias = "gross_pay")]
    pub gross_pay: Option<f64>,
    #[serde(rename = "netPay", alias = "net_pay")]
    pub net_pay: Option<f64>,
    #[serde(rename = "paidOn", alias = "paid_on")]
    pub paid_on: Option<String>,
}

impl SalarySlip {
    pub fn total_earnings(&self) -> f64 {
        self.earnings.iter().map(|c| c.amount).sum()
    }

    pub fn total_deductions(&self) -> f64 {
        self.deductions.iter().map(|c| c.amount).sum()
    }

    /// Gross as reported, or the sum of earnings when the server omits it.
    pub fn gross(&self) -> f64 {
        self.gross_pay.unwrap_or_else(|| self.total_earnings())
    }

    /// Net as reported, or gross minus deductions when the server omits it.
    pub fn net(&self) -> f64 {
        self.net_pay
            .unwrap_or_else(|| self.gross() - self.total_deductions())
    }
}

/// A single earning or deduction line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct SalaryComponent {
    #[serde(alias = "title")]
    pub name: String,
    pub amount: f64,
}
