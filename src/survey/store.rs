// Durable storage for the accumulated responses.
//
// The store is an append-only table in a flat CSV file. The full table is
// loaded in memory on open and rewritten in full on each append, through a
// temporary file that replaces the durable one with a rename. The durable
// file is therefore always a complete table: either the one before the
// append or the one after it.

use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::{debug, info};
use snafu::prelude::*;

use survey_analytics::{InteractionFrequency, Response};

use crate::survey::{
    CorruptStoreSnafu, StoreOpenSnafu, StoreReplaceSnafu, StoreSerializeSnafu, SurveyResult,
};

/// The header of the durable table, in column order.
pub const COLUMNS: [&str; 7] = [
    "locale",
    "satisfaction",
    "interaction_frequency",
    "benefits_text",
    "concerns_text",
    "benefits_text_canonical",
    "concerns_text_canonical",
];

pub struct RecordStore {
    path: PathBuf,
    responses: Vec<Response>,
}

impl RecordStore {
    /// Loads the full table from the durable file.
    ///
    /// A missing file is the first run and yields an empty store. Anything
    /// else that cannot be read back as the expected table is a corrupt
    /// store, never silently an empty one.
    pub fn open(path: &Path) -> SurveyResult<RecordStore> {
        if !path.exists() {
            info!("open: no store at {:?} yet, starting empty", path);
            return Ok(RecordStore {
                path: path.to_path_buf(),
                responses: Vec::new(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .context(StoreOpenSnafu {
                path: path.display().to_string(),
            })?;

        let header = match rdr.headers() {
            Ok(h) => h.clone(),
            Err(e) => {
                return CorruptStoreSnafu {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .fail()
            }
        };
        ensure!(
            header.iter().eq(COLUMNS.iter().copied()),
            CorruptStoreSnafu {
                path: path.display().to_string(),
                reason: format!("unexpected header {:?}", header),
            }
        );

        let mut responses: Vec<Response> = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            // Line 1 is the header.
            let lineno = idx + 2;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    return CorruptStoreSnafu {
                        path: path.display().to_string(),
                        reason: format!("line {}: {}", lineno, e),
                    }
                    .fail()
                }
            };
            responses.push(parse_record(path, lineno, &record)?);
        }
        debug!("open: loaded {} responses from {:?}", responses.len(), path);

        Ok(RecordStore {
            path: path.to_path_buf(),
            responses,
        })
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Appends one response and commits the updated table.
    ///
    /// Insertion order is preserved and records are never deduplicated.
    pub fn append(&mut self, response: Response) -> SurveyResult<()> {
        self.responses.push(response);
        self.rewrite()
    }

    // Writes the whole table to a temporary file next to the durable one,
    // then renames it over the durable file. The rename is atomic on the
    // platforms this runs on, so a crash mid-write leaves the previous
    // table intact.
    fn rewrite(&self) -> SurveyResult<()> {
        let tmp = tmp_path(&self.path);
        {
            let mut wtr = csv::Writer::from_path(&tmp).context(StoreOpenSnafu {
                path: tmp.display().to_string(),
            })?;
            wtr.write_record(COLUMNS).context(StoreSerializeSnafu {})?;
            for r in self.responses.iter() {
                let satisfaction = r.satisfaction.to_string();
                wtr.write_record([
                    r.locale.as_str(),
                    satisfaction.as_str(),
                    r.interaction.as_str(),
                    opt_field(&r.benefits),
                    opt_field(&r.concerns),
                    opt_field(&r.benefits_canonical),
                    opt_field(&r.concerns_canonical),
                ])
                .context(StoreSerializeSnafu {})?;
            }
            wtr.flush().context(StoreReplaceSnafu {
                path: tmp.display().to_string(),
            })?;
        }
        fs::rename(&tmp, &self.path).context(StoreReplaceSnafu {
            path: self.path.display().to_string(),
        })
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

fn opt_field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn parse_record(path: &Path, lineno: usize, record: &StringRecord) -> SurveyResult<Response> {
    ensure!(
        record.len() == COLUMNS.len(),
        CorruptStoreSnafu {
            path: path.display().to_string(),
            reason: format!(
                "line {}: expected {} columns, found {}",
                lineno,
                COLUMNS.len(),
                record.len()
            ),
        }
    );
    let satisfaction = match record[1].parse::<u8>() {
        Ok(s) if (1..=5).contains(&s) => s,
        _ => {
            return CorruptStoreSnafu {
                path: path.display().to_string(),
                reason: format!("line {}: bad satisfaction score {:?}", lineno, &record[1]),
            }
            .fail()
        }
    };
    let interaction = match InteractionFrequency::parse(&record[2]) {
        Some(f) => f,
        None => {
            return CorruptStoreSnafu {
                path: path.display().to_string(),
                reason: format!(
                    "line {}: bad interaction frequency {:?}",
                    lineno, &record[2]
                ),
            }
            .fail()
        }
    };
    let benefits = non_empty(&record[3]);
    let concerns = non_empty(&record[4]);
    let benefits_canonical = non_empty(&record[5]);
    let concerns_canonical = non_empty(&record[6]);
    // A canonical text is derived from its source answer at submission
    // time. One without the other cannot come from the write path.
    for (field, source, canonical) in [
        ("benefits", &benefits, &benefits_canonical),
        ("concerns", &concerns, &concerns_canonical),
    ] {
        ensure!(
            source.is_some() == canonical.is_some(),
            CorruptStoreSnafu {
                path: path.display().to_string(),
                reason: format!(
                    "line {}: the {} text and its canonical form must be both present or both absent",
                    lineno, field
                ),
            }
        );
    }
    Ok(Response {
        locale: record[0].to_string(),
        satisfaction,
        interaction,
        benefits,
        concerns,
        benefits_canonical,
        concerns_canonical,
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
pub mod testing {
    use std::path::PathBuf;

    // A unique path per test and per process, so parallel test runs do not
    // step on each other.
    pub fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tourstat_{}_{}.csv", name, std::process::id()))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::scratch_path;
    use super::*;
    use crate::survey::SurveyError;

    fn response(locale: &str, satisfaction: u8, interaction: InteractionFrequency) -> Response {
        Response {
            locale: locale.to_string(),
            satisfaction,
            interaction,
            benefits: None,
            concerns: None,
            benefits_canonical: None,
            concerns_canonical: None,
        }
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let path = scratch_path("missing");
        let store = RecordStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn round_trip_preserves_tricky_text() {
        let path = scratch_path("round_trip");
        let mut first = response("en", 5, InteractionFrequency::Daily);
        first.benefits = Some("cafés, \"bars\", restaurants".to_string());
        first.benefits_canonical = first.benefits.clone();
        first.concerns = Some("noise\nat night, and\r\ncrowds".to_string());
        first.concerns_canonical = first.concerns.clone();
        let second = response("es", 2, InteractionFrequency::Rarely);

        {
            let mut store = RecordStore::open(&path).unwrap();
            store.append(first.clone()).unwrap();
            store.append(second.clone()).unwrap();
        }

        let reloaded = RecordStore::open(&path).unwrap();
        assert_eq!(reloaded.responses(), &[first, second]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn insertion_order_is_preserved() {
        let path = scratch_path("order");
        let mut store = RecordStore::open(&path).unwrap();
        for score in [3, 1, 5, 1] {
            store
                .append(response("en", score, InteractionFrequency::Monthly))
                .unwrap();
        }
        let reloaded = RecordStore::open(&path).unwrap();
        let scores: Vec<u8> = reloaded.responses().iter().map(|r| r.satisfaction).collect();
        assert_eq!(scores, vec![3, 1, 5, 1]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unexpected_header_is_corrupt_not_empty() {
        let path = scratch_path("bad_header");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn short_row_is_corrupt() {
        let path = scratch_path("short_row");
        let header = COLUMNS.join(",");
        fs::write(&path, format!("{}\nen,4,Daily\n", header)).unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn out_of_range_score_in_file_is_corrupt() {
        let path = scratch_path("bad_score");
        let header = COLUMNS.join(",");
        fs::write(&path, format!("{}\nen,9,Daily,,,,\n", header)).unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_category_in_file_is_corrupt() {
        let path = scratch_path("bad_category");
        let header = COLUMNS.join(",");
        fs::write(&path, format!("{}\nen,3,sometimes,,,,\n", header)).unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn canonical_text_without_its_source_is_corrupt() {
        let path = scratch_path("orphan_canonical");
        let header = COLUMNS.join(",");
        fs::write(&path, format!("{}\nen,3,Daily,,,more jobs,\n", header)).unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn source_text_without_its_canonical_form_is_corrupt() {
        let path = scratch_path("orphan_source");
        let header = COLUMNS.join(",");
        fs::write(&path, format!("{}\nen,3,Daily,,ruido,,\n", header)).unwrap();
        let res = RecordStore::open(&path);
        assert!(matches!(res, Err(SurveyError::CorruptStore { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn stale_tmp_file_never_shadows_the_durable_table() {
        let path = scratch_path("stale_tmp");
        let mut store = RecordStore::open(&path).unwrap();
        store
            .append(response("en", 4, InteractionFrequency::Weekly))
            .unwrap();

        // A crash between the temporary write and the rename leaves a stray
        // .tmp file behind. The durable table must still load as-is.
        let tmp = tmp_path(&path);
        fs::write(&tmp, "garbage that is not a table").unwrap();
        let reloaded = RecordStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);

        // The next append replaces the stray file and commits cleanly.
        let mut reloaded = reloaded;
        reloaded
            .append(response("fr", 2, InteractionFrequency::Never))
            .unwrap();
        let after = RecordStore::open(&path).unwrap();
        assert_eq!(after.len(), 2);
        assert!(!tmp.exists());
        fs::remove_file(&path).unwrap();
    }
}
