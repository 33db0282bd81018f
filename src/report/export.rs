//! CSV and JSON export of ranked trends

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::TrendReport;
use crate::analytics::RankingTable;
use crate::error::Result;

/// One CSV row
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Trend")]
    trend: &'a str,
    #[serde(rename = "Trend Strength")]
    trend_strength: f64,
    #[serde(rename = "Frequency")]
    frequency: u64,
    #[serde(rename = "Average Sentiment")]
    average_sentiment: f64,
}

/// Write the ranking table as CSV, strongest trends first
///
/// Columns: `Trend,Trend Strength,Frequency,Average Sentiment`. The header
/// is written even when the table is empty.
///
/// `Trend` is the bare term. A term tracked in two categories (brand "coach"
/// and garment "coach") yields two rows with the same `Trend` value; use the
/// JSON export when the category is needed.
pub fn write_csv<W: Write>(writer: W, table: &RankingTable) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(["Trend", "Trend Strength", "Frequency", "Average Sentiment"])?;

    for ranking in table.sorted_by_strength() {
        csv.serialize(CsvRow {
            trend: &ranking.term,
            trend_strength: ranking.trend_strength,
            frequency: ranking.frequency,
            average_sentiment: ranking.average_sentiment,
        })?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the ranking table to a CSV file
pub fn export_csv(path: &Path, table: &RankingTable) -> Result<()> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), table)?;
    tracing::info!(path = %path.display(), rows = table.len(), "Exported CSV");
    Ok(())
}

/// Write the full report as pretty-printed JSON
pub fn export_json(path: &Path, report: &TrendReport) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), "Exported JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{TrendCategory, TrendRanking};

    fn ranking(term: &str, strength: f64, frequency: u64) -> TrendRanking {
        TrendRanking {
            category: TrendCategory::Garment,
            term: term.to_string(),
            average_sentiment: strength / frequency as f64,
            frequency,
            trend_strength: strength,
        }
    }

    #[test]
    fn test_csv_sorted_with_header() {
        let table = RankingTable::from(vec![ranking("coat", 0.5, 1), ranking("gown", 1.5, 3)]);

        let mut out = Vec::new();
        write_csv(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Trend,Trend Strength,Frequency,Average Sentiment");
        assert_eq!(lines[1], "gown,1.5,3,0.5");
        assert_eq!(lines[2], "coat,0.5,1,0.5");
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let mut out = Vec::new();
        write_csv(&mut out, &RankingTable::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Trend,Trend Strength,Frequency,Average Sentiment\n"
        );
    }

    #[test]
    fn test_term_in_two_categories_yields_two_rows() {
        let mut brand = ranking("coach", 0.8, 2);
        brand.category = TrendCategory::Brand;
        let table = RankingTable::from(vec![brand, ranking("coach", 0.3, 1)]);

        let mut out = Vec::new();
        write_csv(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "coach,0.8,2,0.4");
        assert_eq!(lines[2], "coach,0.3,1,0.3");
    }

    #[test]
    fn test_quoting() {
        let table = RankingTable::from(vec![ranking("dolce & gabbana, srl", 1.0, 1)]);
        let mut out = Vec::new();
        write_csv(&mut out, &table).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"dolce & gabbana, srl\""));
    }
}
