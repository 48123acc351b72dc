//! Request validation for the buku endpoints.
//!
//! Each endpoint runs an ordered list of field checks against the raw path
//! id and the JSON body, collecting every violation before failing. A body
//! field of the wrong JSON type (including an explicit null) fails its rule
//! the same way a bad value does; an absent optional field passes.

use serde_json::Value;
use shared::{CreateBookRequest, FieldError, UpdateBookRequest};

const MSG_ID_NOT_INT: &str = "ID harus angka";
const MSG_JUDUL_REQUIRED: &str = "Judul wajib diisi";
const MSG_PENULIS_REQUIRED: &str = "Penulis wajib diisi";
const MSG_JUDUL_EMPTY: &str = "Judul tidak boleh kosong";
const MSG_PENULIS_EMPTY: &str = "Penulis tidak boleh kosong";
const MSG_TAHUN_INVALID: &str = "Tahun tidak valid";

// Publication years accepted by the API
const TAHUN_RANGE: std::ops::RangeInclusive<i64> = 1000..=9999;

/// Validate the id path segment of the get/delete routes.
pub fn validate_path_id(raw: &str) -> Result<i64, Vec<FieldError>> {
    raw.parse::<i64>()
        .map_err(|_| vec![FieldError::new("id", MSG_ID_NOT_INT)])
}

/// Validate a creation body. All three fields are required.
pub fn validate_create(body: &Value) -> Result<CreateBookRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    let judul = required_string(body, "judul", MSG_JUDUL_REQUIRED, &mut errors);
    let penulis = required_string(body, "penulis", MSG_PENULIS_REQUIRED, &mut errors);
    let tahun = required_year(body, "tahun", &mut errors);

    match (judul, penulis, tahun) {
        (Some(judul), Some(penulis), Some(tahun)) if errors.is_empty() => Ok(CreateBookRequest {
            judul,
            penulis,
            tahun,
        }),
        _ => Err(errors),
    }
}

/// Validate an update request: the path id plus a body in which every field
/// is optional. Id and body rules are all evaluated so the error list is
/// complete.
pub fn validate_update(
    raw_id: &str,
    body: &Value,
) -> Result<(i64, UpdateBookRequest), Vec<FieldError>> {
    let mut errors = Vec::new();

    let id = match raw_id.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new("id", MSG_ID_NOT_INT));
            None
        }
    };
    let judul = optional_string(body, "judul", MSG_JUDUL_EMPTY, &mut errors);
    let penulis = optional_string(body, "penulis", MSG_PENULIS_EMPTY, &mut errors);
    let tahun = optional_year(body, "tahun", &mut errors);

    match id {
        Some(id) if errors.is_empty() => Ok((
            id,
            UpdateBookRequest {
                judul,
                penulis,
                tahun,
            },
        )),
        _ => Err(errors),
    }
}

/// Required non-empty string field. Records one error when the field is
/// missing, not a string, or empty.
fn required_string(
    body: &Value,
    field: &'static str,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Optional string field: absent passes, present must be non-empty.
fn optional_string(
    body: &Value,
    field: &'static str,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(field) {
        None => None,
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Required integer field within the accepted year range.
fn required_year(body: &Value, field: &'static str, errors: &mut Vec<FieldError>) -> Option<i64> {
    match body.get(field).and_then(Value::as_i64) {
        Some(tahun) if TAHUN_RANGE.contains(&tahun) => Some(tahun),
        _ => {
            errors.push(FieldError::new(field, MSG_TAHUN_INVALID));
            None
        }
    }
}

/// Optional integer field: absent passes, present must be an in-range year.
fn optional_year(body: &Value, field: &'static str, errors: &mut Vec<FieldError>) -> Option<i64> {
    match body.get(field) {
        None => None,
        Some(value) => match value.as_i64() {
            Some(tahun) if TAHUN_RANGE.contains(&tahun) => Some(tahun),
            _ => {
                errors.push(FieldError::new(field, MSG_TAHUN_INVALID));
                None
            }
        },
    }
}
