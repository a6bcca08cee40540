//! Report generation
//!
//! Collects the decoded capture and the query results into a [`Report`] and
//! renders it as plain text or JSON.

use crate::config::{OutputFormat, QueryConfig, QueryKind};
use anyhow::Result;
use i2c_log_decoder::{Capture, Hit, StreamStats, Transaction};
use serde::Serialize;
use std::fmt::Write;

/// One transaction in the report, with its index in the capture
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub index: usize,
    pub transaction: Transaction,
}

impl From<Hit<'_>> for ReportEntry {
    fn from((index, transaction): Hit<'_>) -> Self {
        Self {
            index,
            transaction: transaction.clone(),
        }
    }
}

/// Results of one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub name: String,
    pub kind: QueryKind,
    pub patterns: Vec<String>,
    /// One entry per match; sequence matches hold one entry per pattern
    pub matches: Vec<Vec<ReportEntry>>,
}

/// Report for one capture file
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file: String,
    pub header: Vec<String>,
    pub stats: StreamStats,
    /// Transaction listing (only when no queries were run)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<ReportEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<QueryReport>,
}

impl Report {
    /// Run `queries` against the capture; without queries, list every transaction
    pub fn build(file: &str, capture: &Capture, queries: &[QueryConfig], show_invalid: bool) -> Self {
        let stream = &capture.stream;

        let transactions = if queries.is_empty() {
            stream
                .transactions()
                .iter()
                .enumerate()
                .filter(|(_, t)| show_invalid || t.is_valid())
                .map(ReportEntry::from)
                .collect()
        } else {
            Vec::new()
        };

        let queries = queries
            .iter()
            .map(|query| {
                let patterns = query.patterns();
                log::debug!("Running {:?} query '{}'", query.kind, query.name);

                let matches: Vec<Vec<ReportEntry>> = match query.kind {
                    QueryKind::Message => patterns
                        .first()
                        .map(|pattern| stream.find_message(pattern))
                        .unwrap_or_default()
                        .into_iter()
                        .map(|hit| vec![ReportEntry::from(hit)])
                        .collect(),
                    QueryKind::Sequence => stream
                        .find_sequence(&patterns)
                        .into_iter()
                        .map(|hits| hits.into_iter().map(ReportEntry::from).collect())
                        .collect(),
                };

                log::debug!("Query '{}' matched {} times", query.name, matches.len());
                QueryReport {
                    name: query.name.clone(),
                    kind: query.kind,
                    patterns: patterns.iter().map(|p| p.to_string()).collect(),
                    matches,
                }
            })
            .collect();

        Self {
            file: file.to_string(),
            header: capture.header.clone(),
            stats: stream.stats(),
            transactions,
            queries,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Txt => Ok(self.render_txt()?),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_txt(&self) -> std::result::Result<String, std::fmt::Error> {
        let mut out = String::new();

        writeln!(out, "═══════════════════════════════════════════════")?;
        writeln!(out, "  {}", self.file)?;
        writeln!(out, "═══════════════════════════════════════════════")?;
        writeln!(out, "  Events:       {}", self.stats.num_events)?;
        writeln!(out, "  Transactions: {}", self.stats.num_transactions)?;
        writeln!(out, "  Invalid:      {}", self.stats.num_invalid)?;

        if !self.transactions.is_empty() {
            writeln!(out, "\nTransactions:")?;
            for entry in &self.transactions {
                writeln!(out, "  #{:<6} {}", entry.index, entry.transaction)?;
            }
        }

        for query in &self.queries {
            writeln!(out, "\nQuery '{}' ({} match(es)):", query.name, query.matches.len())?;
            for pattern in &query.patterns {
                writeln!(out, "  pattern: {}", pattern)?;
            }
            for (n, entries) in query.matches.iter().enumerate() {
                if query.kind == QueryKind::Sequence {
                    writeln!(out, "  match {}:", n + 1)?;
                }
                for entry in entries {
                    writeln!(out, "    #{:<6} {}", entry.index, entry.transaction)?;
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternConfig;
    use i2c_log_decoder::{Event, I2cStream, TransactionKind};

    fn capture() -> Capture {
        let mut events = Vec::new();
        for (address, byte) in [(0x6B, 0x3E), (0x6B, 0x3F), (0x1E, 0x00)] {
            events.extend([
                Event::start(),
                Event::write(address),
                Event::ack(),
                Event::data(byte),
                Event::ack(),
                Event::stop(),
            ]);
        }
        events.extend([Event::start(), Event::none(), Event::stop()]);

        Capture {
            header: vec!["Time [s]".to_string(), "Event".to_string()],
            stream: I2cStream::from_events(events),
        }
    }

    fn query(name: &str, kind: QueryKind, patterns: Vec<PatternConfig>) -> QueryConfig {
        QueryConfig {
            name: name.to_string(),
            kind,
            patterns,
        }
    }

    fn write_to(address: u8) -> PatternConfig {
        PatternConfig {
            kind: Some(TransactionKind::Write),
            address: Some(address),
            ..PatternConfig::default()
        }
    }

    #[test]
    fn test_listing_without_queries() {
        let capture = capture();
        let report = Report::build("capture.csv", &capture, &[], false);
        assert_eq!(report.stats.num_transactions, 4);
        assert_eq!(report.stats.num_invalid, 1);
        assert_eq!(report.transactions.len(), 3);

        let with_invalid = Report::build("capture.csv", &capture, &[], true);
        assert_eq!(with_invalid.transactions.len(), 4);
    }

    #[test]
    fn test_message_and_sequence_queries() {
        let capture = capture();
        let queries = vec![
            query("writes", QueryKind::Message, vec![write_to(0x6B)]),
            query("pair", QueryKind::Sequence, vec![write_to(0x6B), write_to(0x1E)]),
        ];
        let report = Report::build("capture.csv", &capture, &queries, false);

        assert!(report.transactions.is_empty());
        assert_eq!(report.queries[0].matches.len(), 2);
        assert_eq!(report.queries[1].matches.len(), 1);
        let indices: Vec<usize> = report.queries[1].matches[0].iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_render_txt() {
        let capture = capture();
        let queries = vec![query("writes", QueryKind::Message, vec![write_to(0x1E)])];
        let text = Report::build("capture.csv", &capture, &queries, false)
            .render(OutputFormat::Txt)
            .unwrap();

        assert!(text.contains("Transactions: 4"));
        assert!(text.contains("Query 'writes' (1 match(es)):"));
        assert!(text.contains("pattern: Write 0x1E [*] *"));
        assert!(text.contains("Write 0x1E [00] ACK"));
    }

    #[test]
    fn test_render_json() {
        let capture = capture();
        let json = Report::build("capture.csv", &capture, &[], false)
            .render(OutputFormat::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["num_events"], 21);
        assert_eq!(value["transactions"][0]["transaction"]["kind"], "write");
        assert_eq!(value["transactions"][0]["transaction"]["address"], 0x6B);
        assert!(value.get("queries").is_none());
    }
}
