// Bulk import of responses from a spreadsheet export.
//
// Online form collectors (Google Forms, Microsoft Forms) export one row per
// submission. The expected column order is: locale, satisfaction,
// interaction frequency, benefits text, concerns text; the first row is the
// header. Every row goes through the same validate-translate-append
// pipeline as a single submission; rejected rows are skipped with a warning
// rather than aborting the whole import.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::{debug, info, warn};
use snafu::prelude::*;

use survey_analytics::{validate, RawResponse, DEFAULT_LOCALE};

use crate::survey::store::RecordStore;
use crate::survey::translate::Translate;
use crate::survey::{apply_canonical_text, EmptyExcelSnafu, OpeningExcelSnafu, SurveyResult};

pub fn import_workbook(
    store: &mut RecordStore,
    translator: &dyn Translate,
    path: &str,
    worksheet: Option<&str>,
) -> SurveyResult<usize> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.to_string() })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path: path.to_string() })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path: path.to_string() })?,
    };

    let header = wrange.rows().next().context(EmptyExcelSnafu {})?;
    debug!("import_workbook: header: {:?}", header);

    let mut iter = wrange.rows();
    iter.next();
    let mut imported = 0usize;
    for (idx, row) in iter.enumerate() {
        // Row 1 is the header.
        let rowno = idx + 2;
        let raw = match parse_row(row) {
            Some(r) => r,
            None => {
                warn!("import_workbook: row {}: unreadable cells, skipping", rowno);
                continue;
            }
        };
        match validate(&raw) {
            Ok(mut response) => {
                apply_canonical_text(&mut response, translator);
                store.append(response)?;
                imported += 1;
            }
            Err(e) => {
                warn!("import_workbook: row {}: rejected: {}", rowno, e);
            }
        }
    }
    info!(
        "import_workbook: imported {} responses from {:?}",
        imported, path
    );
    Ok(imported)
}

fn parse_row(row: &[DataType]) -> Option<RawResponse> {
    let locale = match row.first() {
        Some(DataType::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_LOCALE.to_string(),
    };
    let satisfaction = match row.get(1) {
        Some(DataType::Int(i)) => *i,
        // Spreadsheets store numbers as floats. Only whole scores are
        // admissible, a fractional score is not a valid answer.
        Some(DataType::Float(f)) if f.fract() == 0.0 => *f as i64,
        Some(DataType::String(s)) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    let interaction = match row.get(2) {
        Some(DataType::String(s)) => s.clone(),
        _ => return None,
    };
    Some(RawResponse {
        locale,
        satisfaction,
        interaction,
        benefits: cell_text(row.get(3)),
        concerns: cell_text(row.get(4)),
    })
}

fn cell_text(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(s)) => s.clone(),
        _ => String::new(),
    }
}
