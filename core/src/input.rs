/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

/// Parses a build id path parameter. Only ASCII digits are allowed, so a
/// label or a signed number never reaches the database.
pub fn parse_build_id(s: &str) -> Result<i32, String> {
    if s.is_empty() || s.contains(|c: char| !c.is_ascii_digit()) {
        return Err(format!("`{s}` is not a build id"));
    }

    s.parse::<i32>()
        .map_err(|_| format!("`{s}` is not a build id"))
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}
