//! Turns catalog CSV text into validated records.
//!
//! Header problems and empty results fail the whole load; anything wrong with
//! a single row is logged, recorded on the catalog, and skipped so later rows
//! are unaffected.

use crate::catalog::csv::{
    non_empty, normalize_link, parse_flag, parse_header, parse_line, split_multi_value,
};
use crate::catalog::error::{LoadError, RowError, SkippedRow};
use crate::catalog::identity::{CatalogKind, RecordId};
use crate::catalog::model::{
    AiTool, Catalog, CatalogRecord, Course, DESCRIPTION_PLACEHOLDER, Event, Perk, Resource,
};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Columns that must appear in the header for each catalog kind.
pub fn required_columns(kind: CatalogKind) -> &'static [&'static str] {
    match kind {
        CatalogKind::Perks => &["id", "title", "description", "category", "discount", "link"],
        CatalogKind::AiTools => &[
            "id",
            "name",
            "description",
            "logo",
            "category",
            "pricing",
            "features",
            "link",
        ],
        CatalogKind::Courses => &["id", "title", "description", "provider", "category", "link"],
        CatalogKind::Resources => &["id", "title", "description", "category", "link"],
        CatalogKind::Events => &["id", "title", "description", "date", "location", "link"],
    }
}

/// Columns that must be non-blank on every row; a blank one skips the row.
pub fn essential_fields(kind: CatalogKind) -> &'static [&'static str] {
    match kind {
        CatalogKind::AiTools => &["id", "name", "link"],
        _ => &["title"],
    }
}

/// Read a catalog file from disk and parse it.
pub fn load_catalog_from_path(kind: CatalogKind, path: &Path) -> Result<Catalog, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(kind, &text)
}

/// Parse catalog text. Line 1 is the header; data rows start on line 2.
pub fn parse_catalog(kind: CatalogKind, text: &str) -> Result<Catalog, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(LoadError::EmptySource { kind });
    };
    let header = parse_header(header_line);
    let columns = index_columns(kind, &header)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut seen_ids: BTreeSet<RecordId> = BTreeSet::new();

    for (line, raw) in lines {
        let fields = parse_line(raw);
        let row = Row {
            columns: &columns,
            fields: &fields,
            line,
        };
        let outcome = check_width(header.len(), &fields)
            .and_then(|()| record_from_row(kind, &row))
            .and_then(|record| {
                if seen_ids.insert(record.id().clone()) {
                    Ok(record)
                } else {
                    Err(RowError::DuplicateId {
                        id: record.id().clone(),
                    })
                }
            });
        match outcome {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(kind = %kind, line, reason = %error, "skipping catalog row");
                skipped.push(SkippedRow { line, error });
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::NoValidRows {
            kind,
            skipped: skipped.len(),
        });
    }

    debug!(
        kind = %kind,
        records = records.len(),
        skipped = skipped.len(),
        "parsed catalog"
    );
    Ok(Catalog {
        kind,
        records,
        skipped,
    })
}

fn index_columns(
    kind: CatalogKind,
    header: &[String],
) -> Result<HashMap<String, usize>, LoadError> {
    let mut columns = HashMap::new();
    for (idx, name) in header.iter().enumerate() {
        // First occurrence wins when a header repeats a column name.
        columns.entry(name.clone()).or_insert(idx);
    }

    let missing: Vec<String> = required_columns(kind)
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { kind, missing });
    }
    Ok(columns)
}

fn check_width(expected: usize, fields: &[String]) -> Result<(), RowError> {
    if fields.len() < expected {
        return Err(RowError::TooFewFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// Header-indexed view over one parsed line.
struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    fields: &'a [String],
    line: usize,
}

impl Row<'_> {
    /// Cell text, or "" when the column is absent from this catalog.
    fn get(&self, column: &str) -> &str {
        self.columns
            .get(column)
            .and_then(|idx| self.fields.get(*idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn opt(&self, column: &str) -> Option<String> {
        non_empty(self.get(column))
    }

    fn list(&self, column: &str) -> Vec<String> {
        split_multi_value(self.get(column))
    }

    fn flag(&self, column: &str) -> bool {
        parse_flag(self.get(column))
    }

    fn link(&self) -> String {
        normalize_link(self.get("link"))
    }

    fn description(&self) -> String {
        self.opt("description")
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string())
    }

    fn require(&self, column: &str) -> Result<String, RowError> {
        self.opt(column).ok_or_else(|| RowError::MissingField {
            field: column.to_string(),
        })
    }

    fn id(&self) -> RecordId {
        self.opt("id")
            .map(RecordId)
            .unwrap_or_else(|| RecordId::from_line(self.line))
    }

    fn check_essentials(&self, kind: CatalogKind) -> Result<(), RowError> {
        for field in essential_fields(kind) {
            self.require(field)?;
        }
        Ok(())
    }
}

fn record_from_row(kind: CatalogKind, row: &Row<'_>) -> Result<CatalogRecord, RowError> {
    row.check_essentials(kind)?;
    let record = match kind {
        CatalogKind::Perks => CatalogRecord::Perk(Perk {
            id: row.id(),
            title: row.require("title")?,
            description: row.description(),
            category: row.list("category"),
            discount: row.opt("discount"),
            link: row.link(),
            logo: row.opt("logo"),
            provider: row.opt("provider"),
            valid_until: row.opt("valid_until"),
            verification_required: row.flag("verification_required"),
            popular: row.flag("popular"),
            is_new: row.flag("new"),
        }),
        CatalogKind::AiTools => CatalogRecord::AiTool(AiTool {
            id: row.id(),
            name: row.require("name")?,
            description: row.description(),
            logo: row.opt("logo"),
            category: row.list("category"),
            pricing: row.opt("pricing"),
            features: row.list("features"),
            link: row.link(),
            open_source: row.flag("open_source"),
            popular: row.flag("popular"),
            is_new: row.flag("new"),
        }),
        CatalogKind::Courses => CatalogRecord::Course(Course {
            id: row.id(),
            title: row.require("title")?,
            description: row.description(),
            provider: row.opt("provider"),
            category: row.list("category"),
            link: row.link(),
            logo: row.opt("logo"),
            level: row.opt("level"),
            duration: row.opt("duration"),
            pricing: row.opt("pricing"),
            certificate: row.flag("certificate"),
            popular: row.flag("popular"),
            is_new: row.flag("new"),
        }),
        CatalogKind::Resources => CatalogRecord::Resource(Resource {
            id: row.id(),
            title: row.require("title")?,
            description: row.description(),
            category: row.list("category"),
            link: row.link(),
            logo: row.opt("logo"),
            provider: row.opt("provider"),
            pricing: row.opt("pricing"),
            features: row.list("features"),
            popular: row.flag("popular"),
            is_new: row.flag("new"),
        }),
        CatalogKind::Events => CatalogRecord::Event(Event {
            id: row.id(),
            title: row.require("title")?,
            description: row.description(),
            date: row.opt("date"),
            location: row.opt("location"),
            link: row.link(),
            category: row.list("category"),
            organizer: row.opt("organizer"),
            logo: row.opt("logo"),
            online: row.flag("online"),
        }),
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS_HEADER: &str = "id,name,description,logo,category,pricing,features,link";

    #[test]
    fn parses_single_tool_row() {
        let text = format!("{TOOLS_HEADER}\n1,Foo,Desc,🤖,Dev,Free,X|Y,foo.com\n");
        let catalog = parse_catalog(CatalogKind::AiTools, &text).expect("parse tools");
        assert_eq!(catalog.len(), 1);
        let CatalogRecord::AiTool(tool) = &catalog.records[0] else {
            panic!("expected an AI tool record");
        };
        assert_eq!(tool.id, RecordId("1".to_string()));
        assert_eq!(tool.name, "Foo");
        assert_eq!(tool.category, vec!["Dev"]);
        assert_eq!(tool.features, vec!["X", "Y"]);
        assert_eq!(tool.link, "https://foo.com");
        assert_eq!(tool.logo.as_deref(), Some("🤖"));
        assert!(!tool.open_source);
    }

    #[test]
    fn missing_link_column_names_it() {
        let text = "id,name,description,logo,category,pricing,features\n1,Foo,Desc,x,Dev,Free,X\n";
        let err = parse_catalog(CatalogKind::AiTools, text).expect_err("missing link column");
        match &err {
            LoadError::MissingColumns { missing, .. } => assert_eq!(missing, &vec!["link"]),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("link"));
    }

    #[test]
    fn lists_every_missing_column() {
        let err = parse_catalog(CatalogKind::Perks, "id,title\n1,Foo\n").unwrap_err();
        let LoadError::MissingColumns { missing, .. } = err else {
            panic!("expected missing columns");
        };
        assert_eq!(missing, vec!["description", "category", "discount", "link"]);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let text = format!(
            "{TOOLS_HEADER}\n\
             1,Good,Desc,x,Dev,Free,X,good.com\n\
             2,Short,Desc\n\
             3,,Desc,x,Dev,Free,X,nameless.com\n\
             \n\
             4,AlsoGood,,x,Dev,Paid,,also.com\n"
        );
        let catalog = parse_catalog(CatalogKind::AiTools, &text).expect("parse tools");
        let titles: Vec<&str> = catalog.records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Good", "AlsoGood"]);
        assert_eq!(catalog.skipped.len(), 2);
        assert_eq!(catalog.skipped[0].line, 3);
        assert!(matches!(
            catalog.skipped[0].error,
            RowError::TooFewFields {
                expected: 8,
                found: 3
            }
        ));
        assert_eq!(
            catalog.skipped[1].error,
            RowError::MissingField {
                field: "name".to_string()
            }
        );

        let CatalogRecord::AiTool(also) = &catalog.records[1] else {
            panic!("expected tool");
        };
        assert_eq!(also.description, DESCRIPTION_PLACEHOLDER);
        assert!(also.features.is_empty());
    }

    #[test]
    fn zero_valid_rows_is_an_error() {
        let text = format!("{TOOLS_HEADER}\n1,,Desc,x,Dev,Free,X,foo.com\n");
        let err = parse_catalog(CatalogKind::AiTools, &text).unwrap_err();
        assert!(matches!(err, LoadError::NoValidRows { skipped: 1, .. }));

        let header_only = parse_catalog(CatalogKind::AiTools, TOOLS_HEADER).unwrap_err();
        assert!(matches!(header_only, LoadError::NoValidRows { skipped: 0, .. }));
    }

    #[test]
    fn empty_source_is_an_error() {
        let err = parse_catalog(CatalogKind::Perks, "  \n\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptySource { .. }));
    }

    #[test]
    fn blank_ids_fall_back_to_line_numbers_where_allowed() {
        let text = "id,title,description,category,link\n,Zotero,,Research,zotero.org\n";
        let catalog = parse_catalog(CatalogKind::Resources, text).unwrap();
        assert_eq!(catalog.records[0].id(), &RecordId::from_line(2));
        assert_eq!(catalog.records[0].link(), "https://zotero.org");
    }

    #[test]
    fn duplicate_ids_keep_first_row() {
        let text = "id,title,description,category,link\n\
                    r1,First,,Research,a.com\n\
                    r1,Second,,Research,b.com\n";
        let catalog = parse_catalog(CatalogKind::Resources, text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records[0].title(), "First");
        assert!(matches!(
            catalog.skipped[0].error,
            RowError::DuplicateId { .. }
        ));
    }

    #[test]
    fn optional_columns_carry_through() {
        let text = "id,title,description,category,discount,link,valid_until,verification_required,popular,new\n\
                    p1,Spotify,\"Music, podcasts\",Entertainment|Music,50% off,spotify.com,2026-12-31,TRUE,true,no\n";
        let catalog = parse_catalog(CatalogKind::Perks, text).unwrap();
        let CatalogRecord::Perk(perk) = &catalog.records[0] else {
            panic!("expected perk");
        };
        assert_eq!(perk.description, "Music, podcasts");
        assert_eq!(perk.category, vec!["Entertainment", "Music"]);
        assert_eq!(perk.discount.as_deref(), Some("50% off"));
        assert_eq!(perk.valid_until.as_deref(), Some("2026-12-31"));
        assert!(perk.verification_required);
        assert!(perk.popular);
        assert!(!perk.is_new);
        assert!(perk.logo.is_none());
    }

    #[test]
    fn loads_from_disk_and_reports_unreadable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        fs::write(
            &path,
            "id,title,description,date,location,link\ne1,Fair,,2026-11-12,Hall,\n",
        )
        .unwrap();
        let catalog = load_catalog_from_path(CatalogKind::Events, &path).unwrap();
        assert_eq!(catalog.records[0].link(), "");

        let err = load_catalog_from_path(CatalogKind::Events, &dir.path().join("nope.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
        assert_eq!(err.kind(), CatalogKind::Events);
    }

    #[test]
    fn returned_rows_never_exceed_data_lines() {
        let text = format!(
            "{TOOLS_HEADER}\n1,A,d,x,c,Free,f,a.com\n2,B,d,x,c,Free,f,b.com\n3,,d,x,c,Free,f,c.com\n"
        );
        let catalog = parse_catalog(CatalogKind::AiTools, &text).unwrap();
        let data_lines = text.lines().count() - 1;
        assert!(catalog.len() <= data_lines);
        assert!(catalog.records.iter().all(|r| !r.title().is_empty()));
    }
}
