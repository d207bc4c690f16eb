//! CSV bulk import/export. Row validation mirrors the interactive employee
//! form field for field, so both entry paths persist identical records.

use std::sync::LazyLock;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::entity::employee;
use crate::entity::sea_orm_active_enums::{HolidayKind, SalaryType};

/// The template header, also the only header the importer accepts.
pub const EMPLOYEE_CSV_HEADER: &str = "firstName,lastName,middleName,email,phone,position,department,employmentType,hireDate,basicSalary,allowance,salaryType,regularHolidayRate,specialHolidayRate,nightDiffPercent,overtimeRegularRate,overtimeRestDayRate,regularHolidayOtRate,specialHolidayOtRate";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("csv input is empty")]
    Empty,
    #[error("unexpected header row, expected the employee template header")]
    HeaderMismatch,
    #[error("csv parse error: {0}")]
    Malformed(#[from] csv::Error),
}

/// One employee row that passed validation. Rate columns arrive as whole
/// percentages in the sheet and are already divided by 100 here, matching
/// the decimals the interactive form stores directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRow {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub department: String,
    pub employment_type: String,
    pub hire_date: NaiveDate,
    pub basic_salary: f64,
    pub allowance: Option<f64>,
    pub salary_type: SalaryType,
    pub regular_holiday_rate: Option<f64>,
    pub special_holiday_rate: Option<f64>,
    pub night_diff_percent: Option<f64>,
    pub overtime_regular_rate: Option<f64>,
    pub overtime_rest_day_rate: Option<f64>,
    pub regular_holiday_ot_rate: Option<f64>,
    pub special_holiday_ot_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Errors for one rejected row. `row` is the 1-based sheet position, so the
/// first data row reports as row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Default, Serialize)]
pub struct EmployeeImport {
    pub valid_rows: Vec<EmployeeRow>,
    pub invalid_rows: Vec<RowError>,
}

pub fn parse_employee_csv(input: &str) -> Result<EmployeeImport, CsvImportError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input.as_bytes());

    let header = reader.headers()?.clone();
    if header.is_empty() || header.iter().all(str::is_empty) {
        return Err(CsvImportError::Empty);
    }
    if header != StringRecord::from(EMPLOYEE_CSV_HEADER.split(',').collect::<Vec<_>>()) {
        return Err(CsvImportError::HeaderMismatch);
    }

    let mut import = EmployeeImport::default();

    for (index, record) in reader.records().enumerate() {
        // header is row 1
        let row = index + 2;

        let record = record?;
        match validate_employee_record(&record) {
            Ok(employee) => import.valid_rows.push(employee),
            Err(errors) => import.invalid_rows.push(RowError { row, errors }),
        }
    }

    Ok(import)
}

fn validate_employee_record(record: &StringRecord) -> Result<EmployeeRow, Vec<FieldError>> {
    let mut errors = Vec::new();
    let field = |index: usize| record.get(index).unwrap_or_default().trim();

    let required = |errors: &mut Vec<FieldError>, index: usize, name: &'static str| {
        let value = field(index);
        if value.is_empty() {
            errors.push(FieldError {
                field: name,
                message: format!("{name} is required"),
            });
        }

        value.to_string()
    };

    let first_name = required(&mut errors, 0, "firstName");
    let last_name = required(&mut errors, 1, "lastName");
    let middle_name = optional(field(2));

    let email = required(&mut errors, 3, "email");
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
        errors.push(FieldError {
            field: "email",
            message: format!("`{email}` is not a valid email address"),
        });
    }

    let phone = optional(field(4));
    let position = required(&mut errors, 5, "position");
    let department = required(&mut errors, 6, "department");
    let employment_type = required(&mut errors, 7, "employmentType");

    let hire_date = match NaiveDate::parse_from_str(field(8), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError {
                field: "hireDate",
                message: format!("`{}` is not a valid YYYY-MM-DD date", field(8)),
            });
            None
        }
    };

    let basic_salary = match field(9).parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(FieldError {
                field: "basicSalary",
                message: format!("`{}` is not a number", field(9)),
            });
            None
        }
    };

    let allowance = parse_optional_number(&mut errors, field(10), "allowance");

    let salary_type = match field(11) {
        "monthly" => Some(SalaryType::Monthly),
        "daily" => Some(SalaryType::Daily),
        "hourly" => Some(SalaryType::Hourly),
        other => {
            errors.push(FieldError {
                field: "salaryType",
                message: format!("`{other}` is not one of monthly, daily, hourly"),
            });
            None
        }
    };

    // The sheet carries whole percentages; storage expects decimals.
    let percent = |errors: &mut Vec<FieldError>, index: usize, name: &'static str| {
        parse_optional_number(errors, field(index), name).map(|value| value / 100.0)
    };

    let regular_holiday_rate = percent(&mut errors, 12, "regularHolidayRate");
    let special_holiday_rate = percent(&mut errors, 13, "specialHolidayRate");
    let night_diff_percent = percent(&mut errors, 14, "nightDiffPercent");
    let overtime_regular_rate = percent(&mut errors, 15, "overtimeRegularRate");
    let overtime_rest_day_rate = percent(&mut errors, 16, "overtimeRestDayRate");
    let regular_holiday_ot_rate = percent(&mut errors, 17, "regularHolidayOtRate");
    let special_holiday_ot_rate = percent(&mut errors, 18, "specialHolidayOtRate");

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(EmployeeRow {
        first_name,
        last_name,
        middle_name,
        email,
        phone,
        position,
        department,
        employment_type,
        hire_date: hire_date.expect("validated above"),
        basic_salary: basic_salary.expect("validated above"),
        allowance,
        salary_type: salary_type.expect("validated above"),
        regular_holiday_rate,
        special_holiday_rate,
        night_diff_percent,
        overtime_regular_rate,
        overtime_rest_day_rate,
        regular_holiday_ot_rate,
        special_holiday_ot_rate,
    })
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_optional_number(errors: &mut Vec<FieldError>, value: &str, name: &'static str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }

    match value.parse::<f64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError {
                field: name,
                message: format!("`{value}` is not a number"),
            });
            None
        }
    }
}

/// Header plus one sample row. Round-trips through [`parse_employee_csv`]
/// with zero validation errors.
pub fn employee_csv_template() -> String {
    format!(
        "{EMPLOYEE_CSV_HEADER}\nJuan,Dela Cruz,Protacio,juan.delacruz@example.com,+63 917 555 0101,Software Engineer,Engineering,regular,2023-01-15,35000,2000,monthly,100,30,10,125,169,200,169\n"
    )
}

/// Standard CSV escaping (quotes doubled, fields with separators wrapped)
/// comes from the csv writer.
pub fn export_employees_csv(employees: &[employee::Model]) -> String {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(EMPLOYEE_CSV_HEADER.split(','))
        .expect("writing to a Vec cannot fail");

    for employee in employees {
        let percent = |rate: Option<f64>| rate.map(|value| format!("{}", value * 100.0)).unwrap_or_default();

        writer
            .write_record([
                employee.first_name.clone(),
                employee.last_name.clone(),
                employee.middle_name.clone().unwrap_or_default(),
                employee.email.clone(),
                employee.phone.clone().unwrap_or_default(),
                employee.position.clone(),
                employee.department.clone(),
                employee.employment_type.clone(),
                employee.hire_date.format("%Y-%m-%d").to_string(),
                employee.basic_salary.to_string(),
                employee.allowance.map(|value| value.to_string()).unwrap_or_default(),
                match employee.salary_type {
                    SalaryType::Monthly => "monthly".to_string(),
                    SalaryType::Daily => "daily".to_string(),
                    SalaryType::Hourly => "hourly".to_string(),
                },
                percent(employee.regular_holiday_rate),
                percent(employee.special_holiday_rate),
                percent(employee.night_diff_percent),
                percent(employee.overtime_regular_rate),
                percent(employee.overtime_rest_day_rate),
                percent(employee.regular_holiday_ot_rate),
                percent(employee.special_holiday_ot_rate),
            ])
            .expect("writing to a Vec cannot fail");
    }

    String::from_utf8(writer.into_inner().expect("writing to a Vec cannot fail"))
        .expect("csv output is utf-8")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayRow {
    pub name: String,
    pub date: NaiveDate,
    pub kind: HolidayKind,
    pub recurring: bool,
}

/// Holiday sheets are `Name,Date(YYYY-MM-DD),Type,Recurring`. Lines that do
/// not parse are dropped from the batch without individual reporting, which
/// also swallows an optional header line.
pub fn parse_holiday_csv(input: &str) -> Vec<HolidayRow> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    reader
        .records()
        .filter_map(|record| {
            let record = record.ok()?;
            if record.len() < 4 {
                return None;
            }

            let name = record.get(0)?.trim();
            if name.is_empty() {
                return None;
            }

            let date = NaiveDate::parse_from_str(record.get(1)?.trim(), "%Y-%m-%d").ok()?;

            let kind = match record.get(2)?.trim() {
                "regular" => HolidayKind::Regular,
                "special" => HolidayKind::Special,
                "special_working" => HolidayKind::SpecialWorking,
                _ => return None,
            };

            let recurring = match record.get(3)?.trim() {
                "true" => true,
                "false" => false,
                _ => return None,
            };

            Some(HolidayRow {
                name: name.to_string(),
                date,
                kind,
                recurring,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trips() {
        let import = parse_employee_csv(&employee_csv_template()).unwrap();

        assert_eq!(import.valid_rows.len(), 1);
        assert!(import.invalid_rows.is_empty());

        let row = &import.valid_rows[0];
        assert_eq!(row.first_name, "Juan");
        assert_eq!(row.salary_type, SalaryType::Monthly);
        // whole percentages divided down to decimals
        assert_eq!(row.regular_holiday_rate, Some(1.0));
        assert_eq!(row.overtime_regular_rate, Some(1.25));
        assert_eq!(row.night_diff_percent, Some(0.1));
    }

    #[test]
    fn test_missing_email_is_keyed_to_the_field() {
        let input = format!(
            "{EMPLOYEE_CSV_HEADER}\nJuan,Dela Cruz,,,,Engineer,Engineering,regular,2023-01-15,35000,,monthly,,,,,,,\n"
        );

        let import = parse_employee_csv(&input).unwrap();
        assert!(import.valid_rows.is_empty());

        assert_eq!(import.invalid_rows.len(), 1);
        let row_error = &import.invalid_rows[0];
        assert_eq!(row_error.row, 2);
        assert!(row_error.errors.iter().any(|error| error.field == "email"));
    }

    #[test]
    fn test_partial_success_keeps_row_numbers_stable() {
        let input = format!(
            "{EMPLOYEE_CSV_HEADER}\n\
             Ana,Reyes,,ana@example.com,,Clerk,Admin,regular,2024-02-01,18000,,daily,,,,,,,\n\
             ,Cruz,,bad-email,,Clerk,Admin,regular,not-a-date,abc,,weekly,,,,,,,\n\
             Leo,Garcia,,leo@example.com,,Guard,Admin,contractual,2024-03-01,16000,,monthly,,,,,,,\n"
        );

        let import = parse_employee_csv(&input).unwrap();
        assert_eq!(import.valid_rows.len(), 2);
        assert_eq!(import.invalid_rows.len(), 1);

        let row_error = &import.invalid_rows[0];
        assert_eq!(row_error.row, 3);
        let fields = row_error.errors.iter().map(|error| error.field).collect::<Vec<_>>();
        for expected in ["firstName", "email", "hireDate", "basicSalary", "salaryType"] {
            assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
        }
    }

    #[test]
    fn test_header_mismatch_rejected() {
        assert!(matches!(
            parse_employee_csv("firstName,lastName\nJuan,Dela Cruz\n"),
            Err(CsvImportError::HeaderMismatch)
        ));
    }

    #[test]
    fn test_export_escapes_embedded_separators() {
        let import = parse_employee_csv(&employee_csv_template()).unwrap();
        let mut employee = model_from_row(import.valid_rows[0].clone());
        employee.position = "Engineer, Senior \"Backend\"".to_string();

        let exported = export_employees_csv(&[employee]);
        assert!(exported.contains(r#""Engineer, Senior ""Backend""""#));

        // and the escaped output parses right back
        let reparsed = parse_employee_csv(&exported).unwrap();
        assert_eq!(reparsed.valid_rows.len(), 1);
        assert_eq!(reparsed.valid_rows[0].position, "Engineer, Senior \"Backend\"");
    }

    #[test]
    fn test_holiday_import_drops_bad_lines_silently() {
        let input = "\
            Name,Date,Type,Recurring\n\
            New Year's Day,2025-01-01,regular,true\n\
            Broken Line,not-a-date,regular,true\n\
            Short Line,2025-02-01\n\
            EDSA Anniversary,2025-02-25,special_working,false\n";

        let rows = parse_holiday_csv(input);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "New Year's Day");
        assert_eq!(rows[0].kind, HolidayKind::Regular);
        assert!(rows[0].recurring);
        assert_eq!(rows[1].kind, HolidayKind::SpecialWorking);
    }

    fn model_from_row(row: EmployeeRow) -> employee::Model {
        use crate::entity::employee::WeekSchedule;

        employee::Model {
            id: uuid::Uuid::new_v4(),
            created_at: chrono::Local::now().into(),
            updated_at: chrono::Local::now().into(),
            created_by: None,
            updated_by: None,
            organization_id: uuid::Uuid::new_v4(),
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            email: row.email,
            phone: row.phone,
            position: row.position,
            department: row.department,
            employment_type: row.employment_type,
            hire_date: row.hire_date,
            basic_salary: row.basic_salary,
            allowance: row.allowance,
            salary_type: row.salary_type,
            regular_holiday_rate: row.regular_holiday_rate,
            special_holiday_rate: row.special_holiday_rate,
            night_diff_percent: row.night_diff_percent,
            overtime_regular_rate: row.overtime_regular_rate,
            overtime_rest_day_rate: row.overtime_rest_day_rate,
            regular_holiday_ot_rate: row.regular_holiday_ot_rate,
            special_holiday_ot_rate: row.special_holiday_ot_rate,
            default_schedule: WeekSchedule::default(),
        }
    }
}
