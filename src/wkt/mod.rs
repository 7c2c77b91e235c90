//! Well-known-text surface: parsing and display for POINT, LINESTRING and
//! MULTILINESTRING with optional Z and M coordinates.
//!
//! This is the round-trip/debug format the tests compare against. `NULL` is
//! accepted in the Z position of a four-coordinate point, preserving the
//! 2D+M dimensional kind.

use std::fmt::{self, Write as _};

use crate::error::{GeometryError, Result, WktError};
use crate::geometry::{Geometry, LrsLine, LrsMultiLine, LrsPoint};

/// Parses a WKT string into a [`Geometry`] with the given SRID.
///
/// # Errors
///
/// Returns [`WktError`] for malformed text and
/// [`GeometryError::UnsupportedGeometryType`] for well-formed tags outside
/// the line-geometry family (POLYGON and friends).
pub fn parse(text: &str, srid: i32) -> Result<Geometry> {
    let mut cur = Cursor::new(text);
    let tag = cur.word()?;
    let geometry = match tag.to_ascii_uppercase().as_str() {
        "POINT" => {
            cur.expect(b'(')?;
            let p = cur.coordinates(srid)?;
            cur.expect(b')')?;
            Geometry::Point(p)
        }
        "LINESTRING" => {
            if cur.take_empty() {
                Geometry::LineString(LrsLine::new(srid))
            } else {
                Geometry::LineString(cur.line_body(srid)?)
            }
        }
        "MULTILINESTRING" => {
            let mut ml = LrsMultiLine::new(srid);
            if !cur.take_empty() {
                cur.expect(b'(')?;
                loop {
                    ml.add_line(cur.line_body(srid)?);
                    if !cur.take(b',') {
                        break;
                    }
                }
                cur.expect(b')')?;
            }
            Geometry::MultiLineString(ml)
        }
        "POLYGON" | "MULTIPOINT" | "MULTIPOLYGON" | "GEOMETRYCOLLECTION" | "CIRCULARSTRING"
        | "COMPOUNDCURVE" | "CURVEPOLYGON" => {
            return Err(GeometryError::UnsupportedGeometryType {
                found: unsupported_tag_name(&tag),
                expected: "POINT, LINESTRING or MULTILINESTRING",
            }
            .into())
        }
        _ => return Err(WktError::UnknownTag(tag).into()),
    };
    cur.expect_end()?;
    Ok(geometry)
}

fn unsupported_tag_name(tag: &str) -> &'static str {
    match tag.to_ascii_uppercase().as_str() {
        "POLYGON" => "POLYGON",
        "MULTIPOINT" => "MULTIPOINT",
        "MULTIPOLYGON" => "MULTIPOLYGON",
        "GEOMETRYCOLLECTION" => "GEOMETRYCOLLECTION",
        "CIRCULARSTRING" => "CIRCULARSTRING",
        "COMPOUNDCURVE" => "COMPOUNDCURVE",
        _ => "CURVEPOLYGON",
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn skip_ws(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        let skipped = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
        self.pos += skipped;
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.text.as_bytes().get(self.pos).copied()
    }

    fn take(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.take(byte) {
            Ok(())
        } else {
            Err(WktError::Unexpected {
                offset: self.pos,
                expected: match byte {
                    b'(' => "`(`",
                    b')' => "`)`",
                    _ => "punctuation",
                },
            }
            .into())
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        if self.peek().is_none() {
            Ok(())
        } else {
            Err(WktError::Unexpected {
                offset: self.pos,
                expected: "end of input",
            }
            .into())
        }
    }

    fn word(&mut self) -> Result<String> {
        self.skip_ws();
        let rest = &self.text.as_bytes()[self.pos..];
        let len = rest.iter().take_while(|b| b.is_ascii_alphabetic()).count();
        if len == 0 {
            return Err(WktError::Unexpected {
                offset: self.pos,
                expected: "a geometry tag",
            }
            .into());
        }
        let word = self.text[self.pos..self.pos + len].to_owned();
        self.pos += len;
        Ok(word)
    }

    /// Whether the keyword is next, compared byte-wise so malformed input
    /// with multibyte characters cannot split a char boundary.
    fn peek_keyword(&mut self, keyword: &[u8]) -> bool {
        self.skip_ws();
        self.text
            .as_bytes()
            .get(self.pos..self.pos + keyword.len())
            .is_some_and(|bytes| bytes.eq_ignore_ascii_case(keyword))
    }

    /// Consumes the `EMPTY` keyword if it is next.
    fn take_empty(&mut self) -> bool {
        if self.peek_keyword(b"EMPTY") {
            self.pos += 5;
            true
        } else {
            false
        }
    }

    fn take_null(&mut self) -> bool {
        if self.peek_keyword(b"NULL") {
            self.pos += 4;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_ws();
        let rest = &self.text.as_bytes()[self.pos..];
        let len = rest
            .iter()
            .take_while(|b| matches!(**b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
            .count();
        let parsed = self.text[self.pos..self.pos + len].parse::<f64>();
        match parsed {
            Ok(value) if len > 0 => {
                self.pos += len;
                Ok(value)
            }
            _ => Err(WktError::InvalidNumber { offset: self.pos }.into()),
        }
    }

    fn peek_number(&mut self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9' | b'+' | b'-' | b'.')) || self.peek_keyword(b"NULL")
    }

    /// Parses `x y [z|NULL [m]]`.
    fn coordinates(&mut self, srid: i32) -> Result<LrsPoint> {
        let x = self.number()?;
        let y = self.number()?;
        let mut z = None;
        let mut m = None;
        if self.peek_number() {
            if !self.take_null() {
                z = Some(self.number()?);
            }
            if self.peek_number() && !self.take_null() {
                m = Some(self.number()?);
            }
        }
        Ok(LrsPoint::new(x, y, z, m, srid))
    }

    /// Parses `( coords (, coords)* )`.
    fn line_body(&mut self, srid: i32) -> Result<LrsLine> {
        self.expect(b'(')?;
        let mut line = LrsLine::new(srid);
        loop {
            line.push(self.coordinates(srid)?);
            if !self.take(b',') {
                break;
            }
        }
        self.expect(b')')?;
        Ok(line)
    }
}

fn write_point(f: &mut fmt::Formatter<'_>, p: &LrsPoint) -> fmt::Result {
    write!(f, "{} {}", p.x, p.y)?;
    match (p.z, p.m) {
        (Some(z), Some(m)) => write!(f, " {z} {m}"),
        (Some(z), None) => write!(f, " {z}"),
        (None, Some(m)) => write!(f, " NULL {m}"),
        (None, None) => Ok(()),
    }
}

fn write_line_body(f: &mut fmt::Formatter<'_>, line: &LrsLine) -> fmt::Result {
    f.write_char('(')?;
    for (i, p) in line.points().iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_point(f, p)?;
    }
    f.write_char(')')
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(p) => {
                f.write_str("POINT (")?;
                write_point(f, p)?;
                f.write_char(')')
            }
            Geometry::LineString(line) => {
                if line.point_count() == 0 {
                    return f.write_str("LINESTRING EMPTY");
                }
                f.write_str("LINESTRING ")?;
                write_line_body(f, line)
            }
            Geometry::MultiLineString(ml) => {
                if ml.is_empty() {
                    return f.write_str("MULTILINESTRING EMPTY");
                }
                f.write_str("MULTILINESTRING (")?;
                for (i, line) in ml.lines().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_line_body(f, line)?;
                }
                f.write_char(')')
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LinrefError;
    use crate::geometry::CoordDim;

    #[test]
    fn parses_point_with_z_as_measure() {
        let g = parse("POINT (1 2 10)", 0).unwrap();
        match g {
            Geometry::Point(p) => {
                assert_eq!(p.dim(), CoordDim::Xyz);
                assert!((p.measure().unwrap() - 10.0).abs() < 1e-12);
            }
            _ => panic!("expected POINT"),
        }
    }

    #[test]
    fn parses_point_with_null_z() {
        let g = parse("POINT (1 2 NULL 10)", 0).unwrap();
        match g {
            Geometry::Point(p) => assert_eq!(p.dim(), CoordDim::Xym),
            _ => panic!("expected POINT"),
        }
    }

    #[test]
    fn parses_line_string() {
        let g = parse("LINESTRING (2 2 2, 2 4 4, 8 4 8)", 0).unwrap();
        match g {
            Geometry::LineString(l) => {
                assert_eq!(l.point_count(), 3);
                assert!((l.end_measure() - 8.0).abs() < 1e-12);
            }
            _ => panic!("expected LINESTRING"),
        }
    }

    #[test]
    fn parses_multi_line_string() {
        let g = parse("MULTILINESTRING ((1 1 1, 2 2 2), (4 4 4, 5.125 5.125 5.125))", 0).unwrap();
        match g {
            Geometry::MultiLineString(ml) => {
                assert_eq!(ml.line_count(), 2);
                assert!((ml.lines()[1].points()[1].x - 5.125).abs() < 1e-12);
            }
            _ => panic!("expected MULTILINESTRING"),
        }
    }

    #[test]
    fn parses_empty_forms() {
        assert!(matches!(
            parse("LINESTRING EMPTY", 0).unwrap(),
            Geometry::LineString(l) if l.point_count() == 0
        ));
        assert!(matches!(
            parse("MULTILINESTRING EMPTY", 0).unwrap(),
            Geometry::MultiLineString(ml) if ml.is_empty()
        ));
    }

    #[test]
    fn rejects_polygon() {
        let err = parse("POLYGON ((0 0, 1 0, 1 1, 0 0))", 0).unwrap_err();
        assert!(matches!(
            err,
            LinrefError::Geometry(GeometryError::UnsupportedGeometryType { .. })
        ));
    }

    #[test]
    fn rejects_unknown_tag_and_garbage() {
        assert!(parse("BLOB (1 2)", 0).is_err());
        assert!(parse("LINESTRING (1 1, 2 2) trailing", 0).is_err());
        assert!(parse("LINESTRING (1, 2 2)", 0).is_err());
    }

    #[test]
    fn rejects_multibyte_garbage_without_panicking() {
        // Multibyte characters where a keyword is expected must fail as a
        // parse error, never as a char-boundary panic.
        assert!(parse("LINESTRING \u{e4}\u{e4}\u{e4}\u{e4}\u{e4}", 0).is_err());
        assert!(parse("MULTILINESTRING \u{fc}\u{fc}", 0).is_err());
        assert!(parse("POINT (1 2 N\u{dc}LL)", 0).is_err());
        assert!(parse("LINESTRING (1 1, 2 \u{e9})", 0).is_err());
    }

    #[test]
    fn display_round_trips() {
        for text in [
            "POINT (1 2 NULL 10)",
            "POINT (1 2 3 4)",
            "LINESTRING (2 2 2, 2 4 4, 8 4 8)",
            "MULTILINESTRING ((1 1 1, 2 2 2), (4 4 4, 6 6 6))",
            "LINESTRING EMPTY",
            "MULTILINESTRING EMPTY",
        ] {
            let g = parse(text, 0).unwrap();
            assert_eq!(g.to_string(), text);
            assert_eq!(parse(&g.to_string(), 0).unwrap(), g);
        }
    }

    #[test]
    fn srid_is_attached_to_vertices() {
        let g = parse("LINESTRING (0 0, 1 1)", 4326).unwrap();
        assert_eq!(g.srid(), 4326);
    }
}
