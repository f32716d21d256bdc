// 📂 Data Loaders - book file + member/rating file
//
// Book file:    one `author,title,year` line per book; line order gives ISBNs.
// Rating file:  alternating lines, a member name then that member's
//               whitespace-separated scores (one per book, in ISBN order).

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// RECORDS
// ============================================================================

/// One line of the book file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub author: String,
    pub title: String,
    pub year: String,
}

impl BookRecord {
    /// Build a record from comma-separated fields.
    ///
    /// The first field is the author and the last is the year; anything in
    /// between is the title, so a title containing commas survives intact.
    fn from_fields(fields: &[&str]) -> Self {
        let (author, title, year) = match fields {
            [] => ("", String::new(), ""),
            [author] => (*author, String::new(), ""),
            [author, title] => (*author, title.to_string(), ""),
            [author, middle @ .., year] => (*author, middle.join(","), *year),
        };

        BookRecord {
            author: author.to_string(),
            title,
            year: year.to_string(),
        }
    }
}

/// One name/ratings line pair of the rating file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub ratings: Vec<i32>,
}

// ============================================================================
// BOOK FILE
// ============================================================================

pub fn load_books(path: &Path) -> Result<Vec<BookRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open book file: {}", path.display()))?;

    // Plain comma splitting: quotes in titles are literal text
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut books = Vec::new();

    // Bytes outside UTF-8 (Latin-1 names) decode lossily instead of failing the file
    for (line_num, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse line {} in {}", line_num + 1, path.display())
        })?;

        let decoded: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        let fields: Vec<&str> = decoded.iter().map(|field| field.as_ref()).collect();
        if fields.len() != 3 {
            warn!(
                line = line_num + 1,
                fields = fields.len(),
                "book line does not have exactly 3 fields"
            );
        }

        books.push(BookRecord::from_fields(&fields));
    }

    info!(count = books.len(), file = %path.display(), "loaded books");
    Ok(books)
}

// ============================================================================
// MEMBER / RATING FILE
// ============================================================================

pub fn load_member_ratings(path: &Path) -> Result<Vec<MemberRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open ratings file: {}", path.display()))?;

    parse_member_ratings(BufReader::new(file))
        .with_context(|| format!("Failed to load ratings file: {}", path.display()))
}

/// Parse name/ratings line pairs from any buffered reader
pub fn parse_member_ratings<R: BufRead>(reader: R) -> Result<Vec<MemberRecord>> {
    let mut members = Vec::new();
    let mut lines = LossyLines::new(reader).enumerate();

    while let Some((line_num, name)) = lines.next() {
        let name = name.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let name = name.as_str();

        // Blank lines between (or after) pairs carry no member
        if name.trim().is_empty() {
            continue;
        }

        let ratings = match lines.next() {
            Some((ratings_line_num, line)) => {
                let line = line
                    .with_context(|| format!("Failed to read line {}", ratings_line_num + 1))?;
                parse_scores(&line).with_context(|| {
                    format!("Invalid ratings for {} on line {}", name, ratings_line_num + 1)
                })?
            }
            None => {
                warn!(member = name, "ratings line missing at end of file");
                Vec::new()
            }
        };

        members.push(MemberRecord {
            name: name.to_string(),
            ratings,
        });
    }

    info!(count = members.len(), "loaded members");
    Ok(members)
}

/// Line iterator that decodes invalid UTF-8 lossily and drops `\n`/`\r\n`
struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    fn new(reader: R) -> Self {
        LossyLines {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                }
                if self.buf.ends_with(b"\r") {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

fn parse_scores(line: &str) -> Result<Vec<i32>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<i32>()
                .with_context(|| format!("Not an integer rating: {:?}", token))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_books() {
        let file = temp_file("Orwell,1984,1949\nTolkien,The Hobbit,1937\n");

        let books = load_books(file.path()).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(
            books[0],
            BookRecord {
                author: "Orwell".to_string(),
                title: "1984".to_string(),
                year: "1949".to_string(),
            }
        );
        assert_eq!(books[1].title, "The Hobbit");
    }

    #[test]
    fn test_load_books_without_trailing_newline() {
        let file = temp_file("Orwell,1984,1949\r\nTolkien,The Hobbit,1937");

        let books = load_books(file.path()).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].year, "1949");
        assert_eq!(books[1].year, "1937");
    }

    #[test]
    fn test_load_books_title_with_comma() {
        let file = temp_file("Adams,So Long, and Thanks for All the Fish,1984\n");

        let books = load_books(file.path()).unwrap();
        assert_eq!(books[0].author, "Adams");
        assert_eq!(books[0].title, "So Long, and Thanks for All the Fish");
        assert_eq!(books[0].year, "1984");
    }

    #[test]
    fn test_load_books_short_line() {
        let file = temp_file("Anonymous,Beowulf\n");

        let books = load_books(file.path()).unwrap();
        assert_eq!(books[0].title, "Beowulf");
        assert_eq!(books[0].year, "");
    }

    #[test]
    fn test_load_books_quotes_are_literal() {
        let file = temp_file("King,\"It\",1986\n");

        let books = load_books(file.path()).unwrap();
        assert_eq!(books[0].title, "\"It\"");
    }

    #[test]
    fn test_load_books_latin1_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Orwell,1984,1949\nGarc\xeda M\xe1rquez,Cien a\xf1os,1967\nTolkien,The Hobbit,1937\n")
            .unwrap();

        let books = load_books(file.path()).unwrap();
        assert_eq!(books.len(), 3);
        assert_eq!(books[1].author, "Garc\u{fffd}a M\u{fffd}rquez");
        assert_eq!(books[1].title, "Cien a\u{fffd}os");
        assert_eq!(books[1].year, "1967");
        assert_eq!(books[2].title, "The Hobbit");
    }

    #[test]
    fn test_load_books_missing_file() {
        let result = load_books(Path::new("/nonexistent/books.txt"));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to open book file"));
    }

    #[test]
    fn test_parse_member_ratings() {
        let input = "Ana\n5 0 -3\nBen Smith\n1 3 5\n";

        let members = parse_member_ratings(Cursor::new(input)).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Ana");
        assert_eq!(members[0].ratings, vec![5, 0, -3]);
        assert_eq!(members[1].name, "Ben Smith");
        assert_eq!(members[1].ratings, vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_member_ratings_keeps_values_unchanged() {
        // Values outside the interactive scale are stored as-is
        let input = "Ana\n2 4 -1\n";

        let members = parse_member_ratings(Cursor::new(input)).unwrap();
        assert_eq!(members[0].ratings, vec![2, 4, -1]);
    }

    #[test]
    fn test_parse_member_ratings_missing_last_line() {
        let input = "Ana\n5 5\nBen";

        let members = parse_member_ratings(Cursor::new(input)).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[1].ratings.is_empty());
    }

    #[test]
    fn test_parse_member_ratings_crlf_and_blank_lines() {
        let input = "Ana\r\n5 3\r\n\r\nBen\r\n1 1\r\n";

        let members = parse_member_ratings(Cursor::new(input)).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Ana");
        assert_eq!(members[1].name, "Ben");
        assert_eq!(members[1].ratings, vec![1, 1]);
    }

    #[test]
    fn test_parse_member_ratings_latin1_name() {
        let input: &[u8] = b"Ana\n5 3 1\nJos\xe9\n1 1 1\n";

        let members = parse_member_ratings(Cursor::new(input)).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].name, "Jos\u{fffd}");
        assert_eq!(members[1].ratings, vec![1, 1, 1]);
    }

    #[test]
    fn test_parse_member_ratings_bad_token() {
        let input = "Ana\n5 x 3\n";

        let err = parse_member_ratings(Cursor::new(input)).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid ratings for Ana on line 2"));
        assert!(message.contains("\"x\""));
    }

    #[test]
    fn test_load_member_ratings_file() {
        let file = temp_file("Ana\n5 0\nBen\n-5 3\n");

        let members = load_member_ratings(file.path()).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].ratings, vec![-5, 3]);

        assert!(load_member_ratings(Path::new("/nonexistent/ratings.txt")).is_err());
    }
}
