//! Staffing-scale import from CSV.
//!
//! A scale file has the columns `Técnico,Paciente,Data,Turno,Leito` in that order, with a header
//! row. Rows are checked one at a time: bad rows are reported as `Linha N: <motivo>` (N counts
//! file lines, the header being line 1) and skipped, good rows become unvalidated entries at the
//! top of the scale. Only a wrong file type, an unreadable file or a wrong header abort the import.

use crate::constants::{SCALE_CSV_HEADER, SCALE_TEMPLATE};
use crate::error::{ImportError, ImportResult};
use crate::model::{ScaleEntry, Shift};
use crate::roster::Roster;
use crate::{WardError, WardResult};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uti_ids::{RecordId, TimestampIdGenerator};

/// Outcome of one import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub file_name: String,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
    /// Ids of the entries created, in file order.
    pub imported: Vec<RecordId>,
}

/// The scale template offered for download.
pub fn template() -> &'static str {
    SCALE_TEMPLATE
}

/// Rejects anything not named `*.csv`.
pub fn ensure_csv_name(file_name: &str) -> ImportResult<()> {
    let is_csv = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ImportError::NotCsv(file_name.to_string()))
    }
}

fn check_header(header: &StringRecord) -> ImportResult<()> {
    let found: Vec<&str> = header
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect();
    if found == SCALE_CSV_HEADER {
        Ok(())
    } else {
        Err(ImportError::InvalidHeader {
            expected: SCALE_CSV_HEADER.join(","),
            found: found.join(","),
        })
    }
}

/// A row that passed every check, before it gets an id.
struct ScaleRow {
    technician: String,
    patient: String,
    date: NaiveDate,
    shift: Shift,
    bed_number: String,
}

fn required<'r>(record: &'r StringRecord, index: usize, missing: &str) -> Result<&'r str, String> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(missing.to_string()),
    }
}

fn parse_row(record: &StringRecord, roster: Option<&Roster>) -> Result<ScaleRow, String> {
    if record.len() != SCALE_CSV_HEADER.len() {
        return Err(format!(
            "esperadas {} colunas, encontradas {}",
            SCALE_CSV_HEADER.len(),
            record.len()
        ));
    }
    let technician = required(record, 0, "Técnico não informado")?;
    let patient = required(record, 1, "Paciente não informado")?;
    let date = required(record, 2, "Data não informada")?
        .parse::<NaiveDate>()
        .map_err(|_| "Data em formato inválido".to_string())?;
    let shift = required(record, 3, "Turno não informado")?
        .parse::<Shift>()
        .map_err(|_| "Turno inválido".to_string())?;
    let bed_number = required(record, 4, "Leito não informado")?;
    if let Some(roster) = roster {
        if roster.find_by_bed(bed_number).is_none() {
            return Err("Leito não existe".to_string());
        }
    }
    Ok(ScaleRow {
        technician: technician.to_string(),
        patient: patient.to_string(),
        date,
        shift,
        bed_number: bed_number.to_string(),
    })
}

/// The staffing scale and the result of the last import.
#[derive(Clone, Debug, Default)]
pub struct ScaleBoard {
    entries: Vec<ScaleEntry>,
    last_import: Option<ImportReport>,
}

impl ScaleBoard {
    pub fn new(entries: Vec<ScaleEntry>) -> Self {
        Self {
            entries,
            last_import: None,
        }
    }

    pub fn entries(&self) -> &[ScaleEntry] {
        &self.entries
    }

    pub fn last_import(&self) -> Option<&ImportReport> {
        self.last_import.as_ref()
    }

    /// Imports the file at `path`. The extension is checked before the file is opened.
    pub fn import_path(
        &mut self,
        path: &Path,
        roster: Option<&Roster>,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> ImportResult<&ImportReport> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ensure_csv_name(&file_name)?;
        let file = File::open(path).map_err(ImportError::FileRead)?;
        self.import_reader(&file_name, file, roster, ids, now)
    }

    /// Imports an uploaded file body named `file_name`.
    pub fn import_reader<R: Read>(
        &mut self,
        file_name: &str,
        reader: R,
        roster: Option<&Roster>,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> ImportResult<&ImportReport> {
        ensure_csv_name(file_name)?;

        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let mut records = csv.records();
        let header = records.next().ok_or(ImportError::Empty)??;
        check_header(&header)?;

        let mut report = ImportReport {
            file_name: file_name.to_string(),
            ..ImportReport::default()
        };
        let mut fresh = Vec::new();
        for record in records {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            match parse_row(&record, roster) {
                Ok(row) => {
                    let entry = ScaleEntry {
                        id: ids.next_record_id_at(now),
                        technician: row.technician,
                        patient: row.patient,
                        date: row.date,
                        shift: row.shift,
                        bed_number: row.bed_number,
                        validated: false,
                    };
                    report.imported.push(entry.id.clone());
                    fresh.push(entry);
                }
                Err(reason) => report.errors.push(format!("Linha {line}: {reason}")),
            }
        }
        report.valid = fresh.len();
        report.invalid = report.errors.len();

        if report.invalid > 0 {
            tracing::warn!(file = file_name, invalid = report.invalid, "scale rows rejected");
        }
        tracing::info!(file = file_name, valid = report.valid, "scale imported");

        fresh.append(&mut self.entries);
        self.entries = fresh;
        Ok(&*self.last_import.insert(report))
    }

    /// Marks an entry as checked by the nurse.
    pub fn validate_entry(&mut self, id: &RecordId) -> WardResult<&ScaleEntry> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| WardError::not_found("scale entry", id))?;
        entry.validated = true;
        Ok(&*entry)
    }

    pub fn remove_entry(&mut self, id: &RecordId) -> WardResult<ScaleEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| WardError::not_found("scale entry", id))?;
        Ok(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use chrono::TimeZone;
    use std::io::Write;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 21, 8, 0, 0).unwrap()
    }

    fn board() -> ScaleBoard {
        ScaleBoard::new(seed(now()).unwrap().scale_entries)
    }

    fn roster() -> Roster {
        Roster::new(seed(now()).unwrap().patients)
    }

    #[test]
    fn template_is_importable() {
        let mut board = board();
        let mut ids = TimestampIdGenerator::new();
        let report = board
            .import_reader("template_escala.csv", template().as_bytes(), Some(&roster()), &mut ids, now())
            .unwrap()
            .clone();
        assert_eq!(report.valid, 2);
        assert_eq!(report.invalid, 0);
        assert_eq!(board.entries().len(), 4);
        assert_eq!(board.entries()[0].technician, "João Silva");
        assert_eq!(board.entries()[1].shift, Shift::Afternoon);
        assert!(!board.entries()[0].validated);
        assert_eq!(board.entries()[2].id.as_str(), "1");
    }

    #[test]
    fn bad_rows_are_reported_by_line_and_skipped() {
        let body = "Técnico,Paciente,Data,Turno,Leito\n\
                    João Silva,Maria Santos,21/01/2024,morning,101\n\
                    Ana Costa,Pedro Lima,2024-01-21,evening,102\n\
                    ,Pedro Lima,2024-01-21,night,102\n\
                    Ana Costa,Pedro Lima,2024-01-21,night,999\n\
                    Ana Costa,Pedro Lima,2024-01-21,night\n\
                    Ana Costa,Pedro Lima,2024-01-21,night,106\n";
        let mut board = board();
        let mut ids = TimestampIdGenerator::new();
        let report = board
            .import_reader("escala.csv", body.as_bytes(), Some(&roster()), &mut ids, now())
            .unwrap();
        assert_eq!(
            report.errors,
            vec![
                "Linha 2: Data em formato inválido",
                "Linha 3: Turno inválido",
                "Linha 4: Técnico não informado",
                "Linha 5: Leito não existe",
                "Linha 6: esperadas 5 colunas, encontradas 4",
            ]
        );
        assert_eq!(report.valid, 1);
        assert_eq!(board.entries().len(), 3);
        assert_eq!(board.entries()[0].bed_number, "106");
    }

    #[test]
    fn unknown_beds_pass_without_a_roster() {
        let body = "Técnico,Paciente,Data,Turno,Leito\nAna Costa,Pedro Lima,2024-01-21,night,999\n";
        let mut board = ScaleBoard::default();
        let report = board
            .import_reader("escala.csv", body.as_bytes(), None, &mut TimestampIdGenerator::new(), now())
            .unwrap();
        assert_eq!(report.valid, 1);
    }

    #[test]
    fn non_csv_files_are_rejected() {
        let mut board = board();
        let err = board
            .import_reader("escala.xlsx", template().as_bytes(), None, &mut TimestampIdGenerator::new(), now())
            .unwrap_err();
        assert!(matches!(err, ImportError::NotCsv(name) if name == "escala.xlsx"));
        assert_eq!(board.entries().len(), 2);
        assert!(board.last_import().is_none());
    }

    #[test]
    fn wrong_header_aborts() {
        let body = "Nome,Paciente,Data,Turno,Leito\nAna,Pedro,2024-01-21,night,101\n";
        let err = board()
            .import_reader("escala.csv", body.as_bytes(), None, &mut TimestampIdGenerator::new(), now())
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidHeader { .. }));

        let err = board()
            .import_reader("escala.csv", "".as_bytes(), None, &mut TimestampIdGenerator::new(), now())
            .unwrap_err();
        assert!(matches!(err, ImportError::Empty));
    }

    #[test]
    fn imports_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("escala.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "\u{feff}{}", template()).unwrap();
        drop(file);

        let mut board = board();
        let report = board
            .import_path(&path, None, &mut TimestampIdGenerator::new(), now())
            .unwrap();
        assert_eq!(report.file_name, "escala.csv");
        assert_eq!(report.valid, 2);

        let missing = dir.path().join("nada.csv");
        assert!(matches!(
            board.import_path(&missing, None, &mut TimestampIdGenerator::new(), now()),
            Err(ImportError::FileRead(_))
        ));
    }

    #[test]
    fn entries_can_be_validated_and_removed() {
        let mut board = board();
        let id = RecordId::parse("2").unwrap();
        assert!(board.validate_entry(&id).unwrap().validated);
        assert_eq!(board.remove_entry(&id).unwrap().technician, "Ana Costa");
        assert!(matches!(
            board.remove_entry(&id),
            Err(WardError::NotFound { .. })
        ));
    }
}
