pub use super::attendance::Entity as Attendance;
pub use super::employee::Entity as Employee;
pub use super::holiday::Entity as Holiday;
pub use super::organization::Entity as Organization;
pub use super::payroll_run::Entity as PayrollRun;
pub use super::payslip::Entity as Payslip;
pub use super::user::Entity as User;
