//! Two-line element set parsing
//!
//! Catalog files hold a name line followed by the two element lines for
//! each satellite. Name lines are recognised by length alone: anything
//! shorter than a data line is a name.

use crate::{PlanisphereError, Result};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Lines shorter than this (after trimming) are name lines
pub const TITLE_LINE_MAX_LEN: usize = 65;

/// One satellite's elements as read from a catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TleSet {
    /// Catalog number, columns 3-7 of line 2
    pub id: String,
    pub name: String,
    pub line1: String,
    pub line2: String,
    /// Whether a catalog update may add this satellite if it is not already tracked
    pub add_this: bool,
}

impl TleSet {
    /// Build a set from its lines, taking the catalog number from line 2
    pub fn new(name: &str, line1: &str, line2: &str, add_this: bool) -> Result<Self> {
        let id = catalog_number(line2)
            .ok_or_else(|| PlanisphereError::InvalidTle(format!("no catalog number in '{}'", line2)))?;
        Ok(Self {
            id,
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            add_this,
        })
    }

    /// Two-digit launch year from the international designator (columns 10-11 of line 1)
    pub fn launch_year(&self) -> Option<i32> {
        let yy: i32 = self.line1.get(9..11)?.trim().parse().ok()?;
        Some(if yy < 57 { 2000 + yy } else { 1900 + yy })
    }
}

/// Catalog number in the fixed-width field of line 2, with surrounding blanks removed
pub fn catalog_number(line2: &str) -> Option<String> {
    let field = line2.get(2..7)?.trim();
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

fn is_title_line(line: &str) -> bool {
    line.chars().count() < TITLE_LINE_MAX_LEN
}

/// Parse a TLE catalog.
///
/// Sets already in `sets` are only replaced by flagged sets, so that a
/// satellite listed in several files keeps the flag of the file that asked
/// for it to be added.
pub fn parse_tle_catalog_into<R: BufRead>(
    reader: R,
    add_flag: bool,
    sets: &mut BTreeMap<String, TleSet>,
) -> Result<()> {
    let status_code = Regex::new(r"\s*\[[^\]]*\]\s*$")
        .map_err(|e| PlanisphereError::CalculationError(format!("Failed to compile regex: {}", e)))?;

    let mut name = String::new();
    let mut line1 = String::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if is_title_line(line) {
            name = status_code.replace(line, "").into_owned();
            line1.clear();
        } else if line.starts_with("1 ") {
            line1 = line.to_string();
        } else if line.starts_with("2 ") {
            if name.is_empty() || line1.is_empty() {
                continue;
            }
            let Some(id) = catalog_number(line) else {
                continue;
            };
            if add_flag || !sets.contains_key(&id) {
                sets.insert(
                    id.clone(),
                    TleSet {
                        id,
                        name: name.clone(),
                        line1: line1.clone(),
                        line2: line.to_string(),
                        add_this: add_flag,
                    },
                );
            }
        } else {
            debug!("unprocessed TLE line {}: '{}'", number + 1, line);
        }
    }
    Ok(())
}

/// Parse a TLE catalog into a fresh map keyed by catalog number
pub fn parse_tle_catalog<R: BufRead>(reader: R, add_flag: bool) -> Result<BTreeMap<String, TleSet>> {
    let mut sets = BTreeMap::new();
    parse_tle_catalog_into(reader, add_flag, &mut sets)?;
    Ok(sets)
}

/// Parse TLE text held in memory
pub fn parse_tle_str(text: &str, add_flag: bool) -> Result<BTreeMap<String, TleSet>> {
    parse_tle_catalog(text.as_bytes(), add_flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)             [+]
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
";

    #[test]
    fn test_parse_single_set() {
        let sets = parse_tle_str(ISS, true).unwrap();
        assert_eq!(sets.len(), 1);

        let iss = &sets["25544"];
        assert_eq!(iss.name, "ISS (ZARYA)");
        assert!(iss.line1.starts_with("1 25544U"));
        assert!(iss.line2.starts_with("2 25544"));
        assert!(iss.add_this);
        assert_eq!(iss.launch_year(), Some(1998));
    }

    #[test]
    fn test_title_line_boundary() {
        let line64 = "X".repeat(64);
        let line65 = "X".repeat(65);
        assert!(is_title_line(&line64));
        assert!(!is_title_line(&line65));

        // A 65-character line is not a name, so the set that follows has none
        let text = format!("{}\n{}", line65, ISS.lines().skip(1).collect::<Vec<_>>().join("\n"));
        assert!(parse_tle_str(&text, true).unwrap().is_empty());

        let text = format!("{}\n{}", line64, ISS.lines().skip(1).collect::<Vec<_>>().join("\n"));
        let sets = parse_tle_str(&text, true).unwrap();
        assert_eq!(sets["25544"].name, line64);
    }

    #[test]
    fn test_name_resets_pending_lines() {
        let mut lines: Vec<&str> = ISS.lines().collect();
        // A name between the two element lines drops line 1
        lines.insert(2, "OTHER");
        let sets = parse_tle_str(&lines.join("\n"), false).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn test_flagged_sets_take_precedence() {
        let mut sets = parse_tle_str(ISS, false).unwrap();
        assert!(!sets["25544"].add_this);

        let renamed = ISS.replace("ISS (ZARYA)", "ZARYA");
        parse_tle_catalog_into(renamed.as_bytes(), false, &mut sets).unwrap();
        assert_eq!(sets["25544"].name, "ISS (ZARYA)");

        parse_tle_catalog_into(renamed.as_bytes(), true, &mut sets).unwrap();
        assert_eq!(sets["25544"].name, "ZARYA");
        assert!(sets["25544"].add_this);
    }

    #[test]
    fn test_catalog_number_field() {
        assert_eq!(
            catalog_number("2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667"),
            Some("00005".to_string())
        );
        assert_eq!(catalog_number("2 "), None);
        assert!(TleSet::new("X", "1 ", "2      ", false).is_err());
    }
}
