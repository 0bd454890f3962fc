use csv::{ReaderBuilder, StringRecord, Trim};

use super::types::CandidateMovie;
use crate::entities::movies::VideoType;

/// The exact literals that mean "true" in uploaded boolean cells. Anything
/// else, including "false" and mixed case, is false.
const TRUE_LITERALS: [&str; 3] = ["true", "1", "TRUE"];

/// Column positions resolved from the header row. Header names are
/// case-sensitive; unknown extra columns are ignored.
struct ColumnMap {
    title: Option<usize>,
    description: Option<usize>,
    poster: Option<usize>,
    video_url: Option<usize>,
    video_type: Option<usize>,
    category: Option<usize>,
    batch_no: Option<usize>,
    duration: Option<usize>,
    featured: Option<usize>,
    is_premium: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            title: find("title"),
            description: find("description"),
            poster: find("poster"),
            video_url: find("videoUrl"),
            video_type: find("videoType"),
            category: find("category"),
            batch_no: find("batchNo"),
            duration: find("duration"),
            featured: find("featured"),
            is_premium: find("isPremium"),
        }
    }
}

/// A missing column or a short row both read as the empty string.
fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

fn parse_bool(raw: &str) -> bool {
    TRUE_LITERALS.contains(&raw)
}

fn parse_categories(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    // Pieces are trimmed but empty pieces are kept as-is; only titles are
    // ever deduplicated, and that happens later against the store.
    raw.split(',').map(|c| c.trim().to_string()).collect()
}

/// Parses an uploaded CSV payload into candidate movies.
///
/// Rows without a title are silently dropped, not errors. A malformed
/// stream (invalid UTF-8, broken quoting) aborts the whole parse.
pub fn parse_catalog_csv(data: &[u8]) -> Result<Vec<CandidateMovie>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let columns = ColumnMap::from_headers(reader.headers()?);

    let mut candidates = Vec::new();
    for record in reader.records() {
        let record = record?;

        let title = field(&record, columns.title);
        if title.is_empty() {
            continue;
        }

        candidates.push(CandidateMovie {
            title: title.to_string(),
            description: field(&record, columns.description).to_string(),
            poster: field(&record, columns.poster).to_string(),
            video_url: field(&record, columns.video_url).to_string(),
            video_type: VideoType::from_csv(field(&record, columns.video_type)),
            category: parse_categories(field(&record, columns.category)),
            batch_no: field(&record, columns.batch_no).to_string(),
            duration: field(&record, columns.duration).to_string(),
            featured: parse_bool(field(&record, columns.featured)),
            is_premium: parse_bool(field(&record, columns.is_premium)),
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str =
        "title,description,poster,videoUrl,videoType,category,batchNo,duration,featured,isPremium";

    fn parse(csv: &str) -> Vec<CandidateMovie> {
        parse_catalog_csv(csv.as_bytes()).expect("parse should succeed")
    }

    #[test]
    fn parses_a_complete_row() {
        let csv = format!(
            "{FULL_HEADER}\n\
             Dark,A family saga,https://img/dark.jpg,https://video/dark.mp4,youtube,\"Mystery,Sci-Fi\",BATCH-001,51min,true,1"
        );
        let rows = parse(&csv);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "Dark");
        assert_eq!(row.description, "A family saga");
        assert_eq!(row.video_type, VideoType::Youtube);
        assert_eq!(row.category, vec!["Mystery", "Sci-Fi"]);
        assert_eq!(row.batch_no, "BATCH-001");
        assert_eq!(row.duration, "51min");
        assert!(row.featured);
        assert!(row.is_premium);
    }

    #[test]
    fn drops_rows_with_blank_title() {
        let csv = format!(
            "{FULL_HEADER}\n\
             ,skipped,,,,,,,,\n\
                ,also skipped,,,,,,,,\n\
             Kept,,,,,,,,,"
        );
        let rows = parse(&csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Kept");
    }

    #[test]
    fn boolean_cells_accept_exactly_three_literals() {
        let cases = [
            ("true", true),
            ("1", true),
            ("TRUE", true),
            ("false", false),
            ("0", false),
            ("True", false),
            ("yes", false),
            ("", false),
        ];
        for (raw, expected) in cases {
            let csv = format!("{FULL_HEADER}\nMovie,,,,,,,,{raw},{raw}");
            let rows = parse(&csv);
            assert_eq!(rows[0].featured, expected, "featured for {raw:?}");
            assert_eq!(rows[0].is_premium, expected, "is_premium for {raw:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_from_values() {
        let csv = format!("{FULL_HEADER}\n  Dark  ,  spaced out  ,,,,,,,true ,");
        let rows = parse(&csv);
        assert_eq!(rows[0].title, "Dark");
        assert_eq!(rows[0].description, "spaced out");
        assert!(rows[0].featured);
    }

    #[test]
    fn category_splits_on_comma_and_keeps_empty_pieces() {
        let csv = format!("{FULL_HEADER}\nDark,,,,,\"Action, ,Drama,\",,,,");
        let rows = parse(&csv);
        assert_eq!(rows[0].category, vec!["Action", "", "Drama", ""]);
    }

    #[test]
    fn empty_category_cell_yields_empty_sequence() {
        let csv = format!("{FULL_HEADER}\nDark,,,,,,,,,");
        assert!(parse(&csv)[0].category.is_empty());
    }

    #[test]
    fn empty_video_type_defaults_to_direct() {
        let csv = format!("{FULL_HEADER}\nDark,,,,,,,,,");
        assert_eq!(parse(&csv)[0].video_type, VideoType::Direct);
    }

    #[test]
    fn short_rows_read_missing_fields_as_empty() {
        let csv = format!("{FULL_HEADER}\nDark,only a description");
        let rows = parse(&csv);
        assert_eq!(rows[0].title, "Dark");
        assert_eq!(rows[0].description, "only a description");
        assert_eq!(rows[0].poster, "");
        assert_eq!(rows[0].video_type, VideoType::Direct);
        assert!(!rows[0].featured);
    }

    #[test]
    fn header_only_payload_yields_no_candidates() {
        assert!(parse(FULL_HEADER).is_empty());
    }

    #[test]
    fn missing_title_column_yields_no_candidates() {
        let rows = parse("description,poster\nsomething,else");
        assert!(rows.is_empty());
    }

    #[test]
    fn intra_file_duplicate_titles_both_survive() {
        let csv = format!("{FULL_HEADER}\nDark,first,,,,,,,,\nDark,second,,,,,,,,");
        let rows = parse(&csv);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, rows[1].title);
    }

    #[test]
    fn invalid_utf8_aborts_the_parse() {
        let mut data = format!("{FULL_HEADER}\n").into_bytes();
        data.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);
        assert!(parse_catalog_csv(&data).is_err());
    }
}
