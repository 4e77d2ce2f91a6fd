//! Workbook rendering for the weekly report.
//!
//! One worksheet per model, named after it, with the columns
//! `Модель | Версия | Количество за неделю` and one row per version. When no
//! model qualifies the workbook holds a single empty `Sheet`.

use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};

use super::WeeklySummary;

const HEADER: [&str; 3] = ["Модель", "Версия", "Количество за неделю"];
const COLUMN_WIDTHS: [f64; 3] = [10.0, 10.0, 25.0];
const EMPTY_SHEET_NAME: &str = "Sheet";

/// Characters Excel refuses in sheet names.
const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Build the workbook for `summary`.
///
/// # Errors
///
/// Returns `XlsxError` if a sheet cannot be named or written.
pub fn build_workbook(summary: &WeeklySummary) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let mut taken = HashSet::new();
    for model in &summary.models {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(model.model.as_str(), &mut taken))?;

        for (col, (title, width)) in (0u16..).zip(HEADER.iter().zip(COLUMN_WIDTHS)) {
            worksheet.set_column_width(col, width)?;
            worksheet.write_string_with_format(0, col, *title, &header_format)?;
        }

        for (row, entry) in (1u32..).zip(&model.versions) {
            worksheet.write_string(row, 0, model.model.as_str())?;
            worksheet.write_string(row, 1, entry.version.as_str())?;
            #[allow(clippy::cast_precision_loss)] // weekly unit counts stay far below 2^52
            worksheet.write_number(row, 2, entry.count as f64)?;
        }
    }

    if summary.models.is_empty() {
        workbook.add_worksheet().set_name(EMPTY_SHEET_NAME)?;
    }

    Ok(workbook)
}

/// Render `summary` and save it to `path`, returning the sheet count.
///
/// # Errors
///
/// Returns `XlsxError` if rendering or saving fails.
pub fn write_workbook(summary: &WeeklySummary, path: &Path) -> Result<usize, XlsxError> {
    let mut workbook = build_workbook(summary)?;
    workbook.save(path)?;
    Ok(summary.models.len().max(1))
}

/// A valid, unique sheet name for `model`.
///
/// Forbidden characters become `_`; a leading or trailing apostrophe is
/// replaced too. Collisions get a numeric suffix.
fn sheet_name(model: &str, taken: &mut HashSet<String>) -> String {
    let mut base: String = model
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    if base.starts_with('\'') {
        base.replace_range(..1, "_");
    }
    if base.ends_with('\'') {
        base.pop();
        base.push('_');
    }

    let mut name = base.clone();
    let mut suffix = 2;
    while !taken.insert(name.to_lowercase()) {
        name = format!("{base} ({suffix})");
        suffix += 1;
    }
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use r4c_core::RobotCode;

    use super::*;
    use crate::services::report::{ModelSummary, VersionCount};

    fn summary(models: &[(&str, Vec<(&str, i64)>)]) -> WeeklySummary {
        let to = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        WeeklySummary {
            from: to - chrono::Duration::days(7),
            to,
            models: models
                .iter()
                .map(|(model, versions)| ModelSummary {
                    model: RobotCode::new(model).unwrap(),
                    versions: versions
                        .iter()
                        .map(|(version, count)| VersionCount {
                            version: RobotCode::new(version).unwrap(),
                            count: *count,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_sheet_per_model() {
        let mut workbook = build_workbook(&summary(&[
            ("R2", vec![("D2", 3), ("D3", 1)]),
            ("C3", vec![("PO", 2)]),
        ]))
        .unwrap();

        assert!(workbook.worksheet_from_name("R2").is_ok());
        assert!(workbook.worksheet_from_name("C3").is_ok());
        assert!(workbook.worksheet_from_name(EMPTY_SHEET_NAME).is_err());
    }

    #[test]
    fn test_empty_summary_keeps_single_sheet() {
        let mut workbook = build_workbook(&summary(&[])).unwrap();
        assert!(workbook.worksheet_from_name(EMPTY_SHEET_NAME).is_ok());
        assert!(workbook.save_to_buffer().unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_sheet_names_are_sanitized_and_unique() {
        let mut taken = HashSet::new();
        assert_eq!(sheet_name("R/", &mut taken), "R_");
        assert_eq!(sheet_name("R\\", &mut taken), "R_ (2)");
        assert_eq!(sheet_name("'A", &mut taken), "_A");
        assert_eq!(sheet_name("A'", &mut taken), "A_");
    }

    #[test]
    fn test_write_workbook_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let sheets = write_workbook(&summary(&[("R2", vec![("D2", 3)])]), &path).unwrap();

        assert_eq!(sheets, 1);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
