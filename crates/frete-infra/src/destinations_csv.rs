//! CSV loader for destination lists
//!
//! Spreadsheet exports arrive either as UTF-8 or as Windows-1252, which is
//! what Excel writes on pt-BR Windows installs.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use frete_domain::model::PlaceInput;
use frete_types::Error;

const HEADER_WORDS: [&str; 8] = [
    "city", "cidade", "municipio", "município", "state", "estado", "uf", "cep",
];

/// Load destinations from a CSV file
///
/// Expected columns (header optional):
/// city, state, [cep], [neighborhood], [address]
///
/// Rows without a city are skipped.
pub fn load_destinations_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PlaceInput>, Error> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let text = decode_text(&bytes);
    parse_destinations(&text)
}

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                tracing::warn!("some characters could not be decoded from Windows-1252");
            }
            decoded
        }
    }
}

fn parse_destinations(text: &str) -> Result<Vec<PlaceInput>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut destinations = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv(format!("row {}: {}", row_idx + 1, e)))?;
        if row_idx == 0 && is_header(&record) {
            continue;
        }
        match parse_record(&record) {
            Some(place) => destinations.push(place),
            None => tracing::debug!(row = row_idx + 1, "skipping row without a city"),
        }
    }

    if destinations.is_empty() {
        return Err(Error::Csv("no destinations found".to_string()));
    }
    Ok(destinations)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record.iter().take(2).any(|field| {
        let field = field.to_lowercase();
        HEADER_WORDS.contains(&field.as_str())
    })
}

fn parse_record(record: &csv::StringRecord) -> Option<PlaceInput> {
    let city = record.get(0).filter(|s| !s.is_empty())?;
    let optional = |idx: usize| record.get(idx).filter(|s| !s.is_empty()).map(str::to_string);

    let mut place = PlaceInput::new(city, record.get(1).unwrap_or("").to_uppercase());
    place.cep = optional(2);
    place.neighborhood = optional(3);
    place.address = optional(4);
    Some(place)
}
