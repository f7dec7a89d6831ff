//! The CSV table shared by the fetch, compare and plot steps.
//!
//! Columns, in order: `date,cloudcover,day_of_week,label`. Dates are stored as
//! `YYYY-MM-DD` and are unique; rows are kept sorted by date.

use crate::dataset::error::DatasetError;
use crate::dataset::samples::{GroupSamples, Observation};
use crate::types::daily_cloud_cover::DailyCloudCover;
use crate::types::day_type::DayType;
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

pub const DEFAULT_DATA_FILE: &str = "cloudcover_daily.csv";
pub const COLUMNS: [&str; 4] = ["date", "cloudcover", "day_of_week", "label"];
const ROW_INDEX: &str = "__row";

/// Concatenates `existing` and `fresh`, keeps the first row seen for every date
/// (so rows already on disk win) and returns them sorted by date.
pub fn merge(existing: Vec<DailyCloudCover>, fresh: Vec<DailyCloudCover>) -> Vec<DailyCloudCover> {
    let mut by_date: BTreeMap<NaiveDate, DailyCloudCover> = BTreeMap::new();
    for row in existing.into_iter().chain(fresh) {
        by_date.entry(row.date).or_insert(row);
    }
    by_date.into_values().collect()
}

pub struct CloudCoverStore {
    path: PathBuf,
}

impl CloudCoverStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when the file does not exist yet (first run) or is empty.
    async fn read_existing(&self) -> Result<Option<DataFrame>, DatasetError> {
        match fs::metadata(&self.path).await {
            Ok(meta) if meta.len() == 0 => {
                warn!("Data file {:?} is empty, treating it as a first run", self.path);
                Ok(None)
            }
            Ok(_) => {
                let path = self.path.clone();
                let df = task::spawn_blocking(move || read_frame(&path)).await??;
                Ok(Some(df))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No data file at {:?} yet, starting from an empty table", self.path);
                Ok(None)
            }
            Err(e) => Err(DatasetError::Metadata(self.path.clone(), e)),
        }
    }

    /// Loads every row of the table. A missing file yields an empty table.
    pub async fn load(&self) -> Result<Vec<DailyCloudCover>, DatasetError> {
        match self.read_existing().await? {
            Some(df) => frame_to_records(&df),
            None => Ok(Vec::new()),
        }
    }

    /// Writes the table atomically: a temporary file in the target directory
    /// is renamed over the destination once fully written.
    pub async fn save(&self, rows: &[DailyCloudCover]) -> Result<(), DatasetError> {
        let dir = parent_dir(&self.path);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DatasetError::DirCreation(dir.clone(), e))?;

        let df = records_to_frame(rows)?;
        let path = self.path.clone();
        task::spawn_blocking(move || write_frame(df, &path)).await??;
        debug!("Wrote {} rows to {:?}", rows.len(), self.path);
        Ok(())
    }

    /// Merges freshly fetched rows into the table on disk and saves the result.
    /// Running this twice with the same rows leaves the file unchanged.
    pub async fn merge_and_save(
        &self,
        fresh: Vec<DailyCloudCover>,
    ) -> Result<Vec<DailyCloudCover>, DatasetError> {
        let existing = self.load().await?;
        if !existing.is_empty() {
            info!("Merging with existing data ({} rows)", existing.len());
        }
        let merged = merge(existing, fresh);
        self.save(&merged).await?;
        info!("Saved {} total days of cloud cover data to {:?}", merged.len(), self.path);
        Ok(merged)
    }

    /// Loads the table and drops rows without cloud cover or label.
    pub async fn load_samples(&self) -> Result<GroupSamples, DatasetError> {
        match self.read_existing().await? {
            Some(df) => frame_to_samples(df),
            None => Ok(GroupSamples::default()),
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DatasetError> {
    df.column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))
}

fn parse_date(row: usize, value: Option<&str>) -> Result<NaiveDate, DatasetError> {
    let value = value.ok_or(DatasetError::MissingDate { row })?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| DatasetError::InvalidDate {
        row,
        value: value.to_string(),
        source: e,
    })
}

fn read_frame(path: &Path) -> Result<DataFrame, DatasetError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))
}

fn write_frame(mut df: DataFrame, path: &Path) -> Result<(), DatasetError> {
    let mut temp = NamedTempFile::new_in(parent_dir(path))
        .map_err(|e| DatasetError::CsvWriteIo(path.to_path_buf(), e))?;
    CsvWriter::new(temp.as_file_mut())
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| DatasetError::CsvWritePolars(path.to_path_buf(), e))?;
    temp.persist(path)
        .map_err(|e| DatasetError::CsvWriteIo(path.to_path_buf(), e.error))?;
    Ok(())
}

/// `day_of_week` and `label` are re-derived from the date rather than trusted.
fn frame_to_records(df: &DataFrame) -> Result<Vec<DailyCloudCover>, DatasetError> {
    let date_col = column(df, "date")?.cast(&DataType::String)?;
    let cloud_col = column(df, "cloudcover")?.cast(&DataType::Float64)?;
    let dates = date_col.str()?;
    let cloud = cloud_col.f64()?;

    dates
        .into_iter()
        .zip(cloud.into_iter())
        .enumerate()
        .map(|(row, (date, cloud_cover))| {
            Ok(DailyCloudCover::new(parse_date(row, date)?, cloud_cover))
        })
        .collect()
}

fn records_to_frame(rows: &[DailyCloudCover]) -> Result<DataFrame, DatasetError> {
    let dates: Vec<String> = rows
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    let cloud: Vec<Option<f64>> = rows.iter().map(|r| r.cloud_cover).collect();
    let day_names: Vec<&str> = rows.iter().map(|r| r.day_of_week.as_str()).collect();
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();

    Ok(df!(
        COLUMNS[0] => dates,
        COLUMNS[1] => cloud,
        COLUMNS[2] => day_names,
        COLUMNS[3] => labels
    )?)
}

fn frame_to_samples(df: DataFrame) -> Result<GroupSamples, DatasetError> {
    for name in ["date", "cloudcover", "label"] {
        column(&df, name)?;
    }
    let total = df.height();

    // Row positions of the file, so errors still point at the right row after filtering.
    let cleaned = df
        .with_row_index(ROW_INDEX.into(), None)?
        .lazy()
        .select([
            col(ROW_INDEX).cast(DataType::UInt64),
            col("date").cast(DataType::String),
            col("cloudcover").cast(DataType::Float64),
            col("label").cast(DataType::String),
        ])
        .filter(col("cloudcover").is_not_null().and(col("label").is_not_null()))
        .collect()?;

    let rows = cleaned.column(ROW_INDEX)?.u64()?;
    let dates = cleaned.column("date")?.str()?;
    let cloud = cleaned.column("cloudcover")?.f64()?;
    let labels = cleaned.column("label")?.str()?;

    let mut observations = Vec::with_capacity(cleaned.height());
    let mut unknown_labels = 0usize;
    for (((row, date), cloud_cover), label) in rows
        .into_iter()
        .zip(dates.into_iter())
        .zip(cloud.into_iter())
        .zip(labels.into_iter())
    {
        let (Some(row), Some(cloud_cover), Some(label)) = (row, cloud_cover, label) else {
            continue;
        };
        // a literal `NaN` cell parses as a float, treat it as missing
        if !cloud_cover.is_finite() {
            continue;
        }
        let Ok(label) = label.parse::<DayType>() else {
            unknown_labels += 1;
            continue;
        };
        observations.push(Observation {
            date: parse_date(row as usize, date)?,
            cloud_cover,
            label,
        });
    }

    if unknown_labels > 0 {
        warn!("Skipped {} rows with an unknown label", unknown_labels);
    }
    debug!(
        "Kept {} of {} rows after dropping missing values",
        observations.len(),
        total
    );
    Ok(GroupSamples::new(observations))
}
