//! Classification of free-form location input.
//!
//! A query resolves to exactly one kind, checked in a fixed priority order:
//! an IPv4-shaped substring wins, then a full `lat,lng` decimal pair, and
//! anything else is a keyword (place name or administrative code).

/// The classified form of a location query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// The first IPv4-shaped substring found in the input.
    Ip(String),
    /// A `lat,lng` pair with any whitespace after the comma removed.
    Coordinates(String),
    /// The raw input, to be sent to the district search.
    Keyword(String),
}

impl LocationQuery {
    pub fn classify(raw: &str) -> Self {
        if let Some(ip) = find_ipv4(raw) {
            return LocationQuery::Ip(ip.to_string());
        }
        if let Some(coordinates) = parse_coordinates(raw) {
            return LocationQuery::Coordinates(coordinates);
        }
        LocationQuery::Keyword(raw.to_string())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Finds the first substring of four 1-3 digit groups separated by dots,
/// delimited by non-word characters or the ends of the input.
fn find_ipv4(input: &str) -> Option<&str> {
    for (start, c) in input.char_indices() {
        if !c.is_ascii_digit() {
            continue;
        }
        if input[..start].chars().next_back().is_some_and(is_word_char) {
            continue;
        }
        if let Some(end) = match_ipv4_at(input, start) {
            return Some(&input[start..end]);
        }
    }
    None
}

/// Matches `\d{1,3}(\.\d{1,3}){3}` starting at `start`, requiring a word
/// boundary after the final group. Returns the end byte offset on match.
fn match_ipv4_at(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut pos = start;
    for group in 0..4 {
        if group > 0 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
        let digits = bytes[pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 || digits > 3 {
            return None;
        }
        pos += digits;
    }
    let boundary = input[pos..].chars().next().is_none_or(|c| !is_word_char(c));
    boundary.then_some(pos)
}

/// Matches a full `<decimal>,<whitespace?><decimal>` pair and returns it
/// with the whitespace dropped.
fn parse_coordinates(input: &str) -> Option<String> {
    let (lat, rest) = input.split_once(',')?;
    let lng = rest.trim_start();
    (is_decimal(lat) && is_decimal(lng)).then(|| format!("{lat},{lng}"))
}

/// An optionally negative number with at least one digit on each side of
/// a single decimal point.
fn is_decimal(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((int_part, frac_part)) => {
            !int_part.is_empty()
                && !frac_part.is_empty()
                && int_part.bytes().all(|b| b.is_ascii_digit())
                && frac_part.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bare_ip() {
        assert_eq!(
            LocationQuery::classify("61.135.17.68"),
            LocationQuery::Ip("61.135.17.68".to_string())
        );
    }

    #[test]
    fn finds_ip_embedded_in_text() {
        assert_eq!(
            LocationQuery::classify("weather for 61.135.17.68 please"),
            LocationQuery::Ip("61.135.17.68".to_string())
        );
    }

    #[test]
    fn ip_requires_word_boundaries() {
        // A leading word character breaks the boundary, as does a four
        // digit group.
        assert_eq!(
            LocationQuery::classify("a61.135.17.68"),
            LocationQuery::Keyword("a61.135.17.68".to_string())
        );
        assert_eq!(
            LocationQuery::classify("1234.5.6.7"),
            LocationQuery::Keyword("1234.5.6.7".to_string())
        );
    }

    #[test]
    fn classifies_coordinates() {
        assert_eq!(
            LocationQuery::classify("39.90469,116.40717"),
            LocationQuery::Coordinates("39.90469,116.40717".to_string())
        );
        assert_eq!(
            LocationQuery::classify("-39.90469, 116.40717"),
            LocationQuery::Coordinates("-39.90469,116.40717".to_string())
        );
    }

    #[test]
    fn coordinates_require_a_full_match() {
        assert_eq!(
            LocationQuery::classify("39.90469,116"),
            LocationQuery::Keyword("39.90469,116".to_string())
        );
        assert_eq!(
            LocationQuery::classify("around 39.90469,116.40717"),
            LocationQuery::Keyword("around 39.90469,116.40717".to_string())
        );
        assert_eq!(
            LocationQuery::classify("39.90469,116.40717,1.0"),
            LocationQuery::Keyword("39.90469,116.40717,1.0".to_string())
        );
    }

    #[test]
    fn falls_back_to_keyword() {
        assert_eq!(
            LocationQuery::classify("北京"),
            LocationQuery::Keyword("北京".to_string())
        );
        assert_eq!(
            LocationQuery::classify("110105"),
            LocationQuery::Keyword("110105".to_string())
        );
    }

    #[test]
    fn ip_takes_priority_over_keyword_content() {
        assert_eq!(
            LocationQuery::classify("北京 61.135.17.68"),
            LocationQuery::Ip("61.135.17.68".to_string())
        );
    }
}
