use crate::types::Point;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::{error::Error, fmt::Display, io::Read, num::ParseFloatError};

#[derive(Debug)]
pub enum ImportError {
  Csv(csv::Error),
  MissingColumn(usize),
  ParseFloat(usize, String, ParseFloatError),
}

impl Display for ImportError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ImportError::Csv(err) => write!(f, "error reading points: {err}"),
      ImportError::MissingColumn(line) => {
        write!(f, "line {line}: expected two columns, lat and lng")
      }
      ImportError::ParseFloat(line, s, err) => write!(f, "line {line}: {err} @ {s}"),
    }
  }
}

impl Error for ImportError {}

impl From<csv::Error> for ImportError {
  fn from(value: csv::Error) -> Self {
    ImportError::Csv(value)
  }
}

fn parse_f64(line: usize, s: &str) -> Result<f64, ImportError> {
  s.parse::<f64>()
    .map_err(|err| ImportError::ParseFloat(line, s.to_owned(), err))
}

const LAT_HEADERS: &[&str] = &["lat", "latitude"];

fn is_header(rec: &StringRecord) -> bool {
  rec
    .get(0)
    .map(|v| LAT_HEADERS.contains(&v.to_lowercase().as_str()))
    .unwrap_or(false)
}

/// Reads `lat,lng` rows. A leading `lat`/`latitude` header line is skipped,
/// any other unparsable row is an error.
pub fn read_points<R: Read>(src: R) -> Result<Vec<Point>, ImportError> {
  let mut rdr = ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .trim(Trim::All)
    .comment(Some(b'#'))
    .from_reader(src);

  let mut points = vec![];
  for (idx, rec) in rdr.records().enumerate() {
    let rec = rec?;
    let line = idx + 1;
    if idx == 0 && is_header(&rec) {
      debug!("skipping header {rec:?}");
      continue;
    }
    let lat = rec.get(0).ok_or(ImportError::MissingColumn(line))?;
    let lng = rec.get(1).ok_or(ImportError::MissingColumn(line))?;
    points.push(Point {
      lat: parse_f64(line, lat)?,
      lng: parse_f64(line, lng)?,
    });
  }
  Ok(points)
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_with_header() {
    let src = "lat,lng\n37.77,-122.42\n37.78, -122.41\n";
    let points = read_points(src.as_bytes()).unwrap();
    assert_eq!(
      points,
      vec![Point::new(37.77, -122.42), Point::new(37.78, -122.41)]
    );
  }

  #[test]
  fn test_long_header_names() {
    let src = "Latitude,Longitude\n1,2\n";
    let points = read_points(src.as_bytes()).unwrap();
    assert_eq!(points, vec![Point::new(1.0, 2.0)]);
  }

  #[test]
  fn test_malformed_first_row_is_reported() {
    let err = read_points("37,77;-122\n1,2\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ImportError::ParseFloat(1, _, _)), "{err}");

    let err = read_points("north,west\n1,2\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ImportError::ParseFloat(1, _, _)), "{err}");
  }

  #[test]
  fn test_without_header() {
    let src = "# survey corner points\n1,2\n3,4\n";
    let points = read_points(src.as_bytes()).unwrap();
    assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
  }

  #[test]
  fn test_bad_rows() {
    let err = read_points("1,2\n3\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn(2)));

    let err = read_points("1,2\n3,x\n".as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "line 2: invalid float literal @ x");
  }
}
