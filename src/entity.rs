pub mod prelude;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod organization;
pub mod payroll_run;
pub mod payslip;
pub mod sea_orm_active_enums;
pub mod user;
