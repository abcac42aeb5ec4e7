use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::data_type::{ByteArray, ByteArrayType, DataType, DoubleType, Int32Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::parser::parse_message_type;
use tracing::info;

use crate::frame::GameFrame;
use crate::pipeline::PipelineReport;

const TEXT_COLUMNS: &[&str] = &["game_id", "team", "opponent", "team_season_key", "game_date"];
const INT_COLUMNS: &[&str] = &["season_year", "week_num"];

pub fn schema_message(frame: &GameFrame) -> String {
    let mut message = String::from("message game_view {\n");
    for name in TEXT_COLUMNS {
        message.push_str(&format!("  REQUIRED BINARY {name} (UTF8);\n"));
    }
    for name in INT_COLUMNS {
        message.push_str(&format!("  REQUIRED INT32 {name};\n"));
    }
    for name in frame.column_names() {
        message.push_str(&format!("  OPTIONAL DOUBLE {name};\n"));
    }
    message.push('}');
    message
}

/// Writes one row group: identity columns first, then every feature as a nullable double.
pub fn write_games_parquet(frame: &GameFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let schema = Arc::new(
        parse_message_type(&schema_message(frame)).context("build parquet schema")?,
    );
    let props = Arc::new(WriterProperties::builder().build());

    let tmp = path.with_extension("parquet.tmp");
    let file = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut writer =
        SerializedFileWriter::new(file, schema, props).context("open parquet writer")?;
    let mut row_group = writer.next_row_group().context("open parquet row group")?;

    let keys = frame.keys();
    let text_values: [Vec<ByteArray>; 5] = [
        keys.iter().map(|k| ByteArray::from(k.game_id.as_str())).collect(),
        keys.iter().map(|k| ByteArray::from(k.team.as_str())).collect(),
        keys.iter().map(|k| ByteArray::from(k.opponent.as_str())).collect(),
        keys.iter()
            .map(|k| ByteArray::from(k.team_season_key.as_str()))
            .collect(),
        keys.iter()
            .map(|k| ByteArray::from(k.game_date.format("%Y-%m-%d").to_string().as_str()))
            .collect(),
    ];
    for values in &text_values {
        write_column::<ByteArrayType>(&mut row_group, values, None)?;
    }

    let seasons = keys.iter().map(|k| k.season_year).collect::<Vec<_>>();
    write_column::<Int32Type>(&mut row_group, &seasons, None)?;
    let weeks = keys
        .iter()
        .map(|k| i32::try_from(k.week_num).unwrap_or(i32::MAX))
        .collect::<Vec<_>>();
    write_column::<Int32Type>(&mut row_group, &weeks, None)?;

    for name in frame.column_names() {
        let column = frame.require(name)?;
        let present = column.iter().flatten().copied().collect::<Vec<f64>>();
        let levels = column
            .iter()
            .map(|v| i16::from(v.is_some()))
            .collect::<Vec<_>>();
        write_column::<DoubleType>(&mut row_group, &present, Some(&levels))
            .with_context(|| format!("write parquet column {name}"))?;
    }

    row_group.close().context("close parquet row group")?;
    writer.close().context("close parquet writer")?;
    fs::rename(&tmp, path).with_context(|| format!("move parquet into {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = frame.len(),
        columns = frame.column_names().len() + TEXT_COLUMNS.len() + INT_COLUMNS.len(),
        "wrote game features"
    );
    Ok(())
}

fn write_column<T: DataType>(
    row_group: &mut SerializedRowGroupWriter<'_, File>,
    values: &[T::T],
    def_levels: Option<&[i16]>,
) -> Result<()> {
    let mut column = row_group
        .next_column()
        .context("open parquet column")?
        .ok_or_else(|| anyhow!("parquet schema has fewer columns than the frame"))?;
    column
        .typed::<T>()
        .write_batch(values, def_levels, None)
        .context("write parquet batch")?;
    column.close().context("close parquet column")?;
    Ok(())
}

pub fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize pipeline report")?;
    fs::write(&tmp, json).context("write pipeline report")?;
    fs::rename(&tmp, path).context("swap pipeline report")?;
    Ok(())
}
