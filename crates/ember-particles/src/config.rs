//! TOML table accessors (handle integer/float coercion)
//!
//! Missing keys fall back to the caller's default; present keys with the
//! wrong shape are errors so a typo in a scene file is not silently ignored.

use ember_core::{Color, EmberError, Result, Vec3};
use toml::value::Table;

pub(crate) fn toml_f32(v: &toml::Value) -> Option<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
}

fn field(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{section}.{key}")
    }
}

pub(crate) fn read_f32(table: &Table, section: &str, key: &str, default: f32) -> Result<f32> {
    match table.get(key) {
        None => Ok(default),
        Some(v) => toml_f32(v).ok_or_else(|| EmberError::InvalidFieldType {
            field: field(section, key),
            expected: "number",
        }),
    }
}

pub(crate) fn read_opt_vec3(table: &Table, section: &str, key: &str) -> Result<Option<Vec3>> {
    let Some(v) = table.get(key) else {
        return Ok(None);
    };
    let invalid = || EmberError::InvalidFieldType {
        field: field(section, key),
        expected: "array of 3 numbers",
    };
    let arr = v.as_array().ok_or_else(invalid)?;
    if arr.len() != 3 {
        return Err(invalid());
    }
    let x = toml_f32(&arr[0]).ok_or_else(invalid)?;
    let y = toml_f32(&arr[1]).ok_or_else(invalid)?;
    let z = toml_f32(&arr[2]).ok_or_else(invalid)?;
    Ok(Some(Vec3::new(x, y, z)))
}

pub(crate) fn read_vec3(table: &Table, section: &str, key: &str, default: Vec3) -> Result<Vec3> {
    Ok(read_opt_vec3(table, section, key)?.unwrap_or(default))
}

/// `[r, g, b]` or `[r, g, b, a]` with integer channels in 0..=255
pub(crate) fn read_color(table: &Table, section: &str, key: &str, default: Color) -> Result<Color> {
    let Some(v) = table.get(key) else {
        return Ok(default);
    };
    let name = field(section, key);
    let arr = v
        .as_array()
        .filter(|a| a.len() == 3 || a.len() == 4)
        .ok_or_else(|| EmberError::InvalidFieldType {
            field: name.clone(),
            expected: "array of 3 or 4 integers",
        })?;

    let mut channels = [255u8; 4];
    for (i, c) in arr.iter().enumerate() {
        let raw = c.as_integer().ok_or_else(|| EmberError::InvalidFieldType {
            field: name.clone(),
            expected: "array of 3 or 4 integers",
        })?;
        channels[i] = u8::try_from(raw).map_err(|_| EmberError::ValueOutOfRange {
            field: name.clone(),
            requirement: "in 0..=255",
            value: raw as f64,
        })?;
    }
    Ok(Color::new(channels[0], channels[1], channels[2], channels[3]))
}

pub(crate) fn read_table<'a>(table: &'a Table, key: &str) -> Result<Option<&'a Table>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_table()
            .map(Some)
            .ok_or_else(|| EmberError::InvalidFieldType {
                field: key.to_string(),
                expected: "table",
            }),
    }
}
