// src/services/parse.rs

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::common::error::AppError;

// Uma linha crua do arquivo: nome da coluna -> valor como texto
pub type RawRow = HashMap<String, String>;

// Despacha pela extensão. Extensão desconhecida vira lista vazia, que o
// orquestrador trata como "arquivo sem dados válidos".
pub fn parse_upload(path: &Path, extension: &str) -> Result<Vec<RawRow>, AppError> {
    match extension {
        "csv" => parse_csv(path),
        "xlsx" | "xls" => Ok(parse_excel(path)),
        _ => Ok(Vec::new()),
    }
}

// CSV: primeira linha é o cabeçalho, cada linha seguinte vira um registro.
// Materializa tudo antes de retornar (uma passada só). Erros de leitura ou
// de CSV malformado sobem como erro (classe inesperada, 500).
pub fn parse_csv(path: &Path) -> Result<Vec<RawRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// Planilha: só a primeira aba. Qualquer erro do calamine degrada para lista
// vazia em vez de derrubar a requisição (falha recuperada, logada).
pub fn parse_excel(path: &Path) -> Vec<RawRow> {
    match read_first_sheet(path) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Erro ao ler a planilha {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn read_first_sheet(path: &Path) -> Result<Vec<RawRow>, calamine::Error> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Vec::new()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let data = rows
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell_to_string(cell)))
                .collect()
        })
        .collect();

    Ok(data)
}

// Toda célula vira texto. Números inteiros saem sem o ".0" do float, senão
// um telefone 11987654321 viraria "11987654321.0".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            tracing::warn!("Célula com erro na planilha: {:?}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_rows_are_keyed_by_header() {
        let file = write_csv("FirstName,Phone,Notes\nAna,11999990000,VIP\nBruno,21888880000,\n");

        let rows = parse_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["FirstName"], "Ana");
        assert_eq!(rows[0]["Phone"], "11999990000");
        assert_eq!(rows[0]["Notes"], "VIP");
        assert_eq!(rows[1]["FirstName"], "Bruno");
        assert_eq!(rows[1]["Notes"], "");
    }

    #[test]
    fn csv_preserves_input_order() {
        let file = write_csv("FirstName,Phone\nA,1\nB,2\nC,3\n");

        let rows = parse_csv(file.path()).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["FirstName"].as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn unknown_extension_yields_no_rows() {
        let file = write_csv("FirstName,Phone\nAna,123\n");
        let rows = parse_upload(file.path(), "pdf").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn broken_spreadsheet_degrades_to_empty() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"this is not a workbook").unwrap();

        let rows = parse_upload(file.path(), "xlsx").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn integral_floats_lose_the_decimal_suffix() {
        assert_eq!(cell_to_string(&Data::Float(11987654321.0)), "11987654321");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
