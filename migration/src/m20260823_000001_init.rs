use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, DefaultColumn}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(schema.create_enum_from_active_enum::<RoleType>()).await.unwrap();
        manager
            .create_type(schema.create_enum_from_active_enum::<AttendanceStatus>()).await.unwrap();
        manager
            .create_type(schema.create_enum_from_active_enum::<SalaryType>()).await.unwrap();
        manager
            .create_type(schema.create_enum_from_active_enum::<RunStatus>()).await.unwrap();
        manager
            .create_type(schema.create_enum_from_active_enum::<HolidayKind>()).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(Organization::Table)
                .col(ColumnDef::new(Organization::Name)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Organization::PayrollSettings)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(Organization::Departments)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(Organization::LeaveTypes)
                    .json_binary()
                    .not_null())
                .take()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::OrganizationId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // Password should be in a hashed format
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(User::Table, User::OrganizationId)
            .to(Organization::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Employee::Table)
                .col(ColumnDef::new(Employee::OrganizationId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Employee::FirstName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::LastName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::MiddleName)
                    .text())
                .col(ColumnDef::new(Employee::Email)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::Phone)
                    .text())
                .col(ColumnDef::new(Employee::Position)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::Department)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::EmploymentType)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::HireDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Employee::BasicSalary)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Employee::Allowance)
                    .double())
                .col(ColumnDef::new(Employee::SalaryType)
                    .custom(SalaryType::name())
                    .not_null())
                .col(ColumnDef::new(Employee::RegularHolidayRate).double())
                .col(ColumnDef::new(Employee::SpecialHolidayRate).double())
                .col(ColumnDef::new(Employee::NightDiffPercent).double())
                .col(ColumnDef::new(Employee::OvertimeRegularRate).double())
                .col(ColumnDef::new(Employee::OvertimeRestDayRate).double())
                .col(ColumnDef::new(Employee::RegularHolidayOtRate).double())
                .col(ColumnDef::new(Employee::SpecialHolidayOtRate).double())
                .col(ColumnDef::new(Employee::DefaultSchedule)
                    .json_binary()
                    .not_null())
                .take()
            ).await.unwrap();
        setup_user_table_fk!(manager, Employee::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Employee::Table, Employee::OrganizationId)
            .to(Organization::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::ScheduleIn)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Attendance::ScheduleOut)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Attendance::ActualIn)
                    .text())
                .col(ColumnDef::new(Attendance::ActualOut)
                    .text())
                .col(ColumnDef::new(Attendance::Status)
                    .custom(AttendanceStatus::name())
                    .not_null())
                .col(ColumnDef::new(Attendance::LateMinutes)
                    .integer())
                .col(ColumnDef::new(Attendance::UndertimeHours)
                    .double())
                .col(ColumnDef::new(Attendance::OvertimeHours)
                    .double())
                .col(ColumnDef::new(Attendance::Remarks)
                    .text())
                .take()
            ).await.unwrap();
        setup_user_table_fk!(manager, Attendance::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Attendance::Table, Attendance::EmployeeId)
            .to(Employee::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        // one attendance row per employee per day
        manager.create_index(Index::create()
            .name("uq-attendance-employee-date")
            .table(Attendance::Table)
            .col(Attendance::EmployeeId)
            .col(Attendance::Date)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(PayrollRun::Table)
                .col(ColumnDef::new(PayrollRun::OrganizationId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollRun::CutoffStart)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollRun::CutoffEnd)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollRun::EmployeeIds)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(PayrollRun::DeductionsEnabled)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(PayrollRun::GovernmentDeductions)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(PayrollRun::Status)
                    .custom(RunStatus::name())
                    .not_null())
                .take()
            ).await.unwrap();
        setup_user_table_fk!(manager, PayrollRun::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(PayrollRun::Table, PayrollRun::OrganizationId)
            .to(Organization::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Payslip::Table)
                .col(ColumnDef::new(Payslip::PayrollRunId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payslip::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payslip::PeriodStart)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Payslip::PeriodEnd)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Payslip::BasePay)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payslip::GrossPay)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payslip::NetPay)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payslip::NonTaxableAllowance)
                    .double()
                    .not_null()
                    .default(0.0))
                .col(ColumnDef::new(Payslip::Deductions)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(Payslip::Incentives)
                    .json_binary()
                    .not_null())
                .take()
            ).await.unwrap();
        setup_user_table_fk!(manager, Payslip::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Payslip::Table, Payslip::PayrollRunId)
            .to(PayrollRun::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Payslip::Table, Payslip::EmployeeId)
            .to(Employee::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        // one payslip per employee per run
        manager.create_index(Index::create()
            .name("uq-payslip-run-employee")
            .table(Payslip::Table)
            .col(Payslip::PayrollRunId)
            .col(Payslip::EmployeeId)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Holiday::Table)
                .col(ColumnDef::new(Holiday::OrganizationId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Holiday::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Holiday::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Holiday::Kind)
                    .custom(HolidayKind::name())
                    .not_null())
                .col(ColumnDef::new(Holiday::Recurring)
                    .boolean()
                    .not_null()
                    .default(false))
                .take()
            ).await.unwrap();
        setup_user_table_fk!(manager, Holiday::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Holiday::Table, Holiday::OrganizationId)
            .to(Organization::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        manager.create_index(Index::create()
            .name("uq-holiday-org-date-name")
            .table(Holiday::Table)
            .col(Holiday::OrganizationId)
            .col(Holiday::Date)
            .col(Holiday::Name)
            .unique()
            .take()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            TableDropStatement::new().table(Payslip::Table).take(),
            TableDropStatement::new().table(PayrollRun::Table).take(),
            TableDropStatement::new().table(Attendance::Table).take(),
            TableDropStatement::new().table(Holiday::Table).take(),
            TableDropStatement::new().table(Employee::Table).take(),
            TableDropStatement::new().table(User::Table).take(),
            TableDropStatement::new().table(Organization::Table).take(),
        ] {
            manager.drop_table(table).await.unwrap();
        }

        for name in [
            RoleType::name(),
            AttendanceStatus::name(),
            SalaryType::name(),
            RunStatus::name(),
            HolidayKind::name(),
        ] {
            manager
                .drop_type(TypeDropStatement::new()
                    .name(name)
                    .to_owned()
                ).await.unwrap();
        }

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Organization {
    Table,
    Name,
    PayrollSettings,
    Departments,
    LeaveTypes,
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    OrganizationId,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
pub(crate) enum Employee {
    Table,
    OrganizationId,
    FirstName,
    LastName,
    MiddleName,
    Email,
    Phone,
    Position,
    Department,
    EmploymentType,
    HireDate,
    BasicSalary,
    Allowance,
    SalaryType,
    RegularHolidayRate,
    SpecialHolidayRate,
    NightDiffPercent,
    OvertimeRegularRate,
    OvertimeRestDayRate,
    RegularHolidayOtRate,
    SpecialHolidayOtRate,
    DefaultSchedule,
}

#[derive(Iden)]
enum Attendance {
    Table,
    EmployeeId,
    Date,
    ScheduleIn,
    ScheduleOut,
    ActualIn,
    ActualOut,
    Status,
    LateMinutes,
    UndertimeHours,
    OvertimeHours,
    Remarks,
}

#[derive(Iden)]
enum PayrollRun {
    Table,
    OrganizationId,
    CutoffStart,
    CutoffEnd,
    EmployeeIds,
    DeductionsEnabled,
    GovernmentDeductions,
    Status,
}

#[derive(Iden)]
enum Payslip {
    Table,
    PayrollRunId,
    EmployeeId,
    PeriodStart,
    PeriodEnd,
    BasePay,
    GrossPay,
    NetPay,
    NonTaxableAllowance,
    Deductions,
    Incentives,
}

#[derive(Iden)]
enum Holiday {
    Table,
    OrganizationId,
    Name,
    Date,
    Kind,
    Recurring,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "leave")]
    Leave,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "salary_type")]
enum SalaryType {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "hourly")]
    Hourly,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "run_status")]
enum RunStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "finalized")]
    Finalized,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "holiday_kind")]
enum HolidayKind {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "special")]
    Special,
    #[sea_orm(string_value = "special_working")]
    SpecialWorking,
}
