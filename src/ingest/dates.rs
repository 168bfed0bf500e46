// src/ingest/dates.rs
//! Lenient date extraction for scraper-supplied `published` strings.
//!
//! Strict RFC 3339 and RFC 2822 are tried first. Anything else goes through a
//! fuzzy token scan that skips words it does not understand, so inputs like
//! `"Posted on January 5th, 2023 at 3:30 pm"` still resolve.
//!
//! Components missing from the text default to the reference date (today) and
//! midnight. An explicit offset (`+02:00`, or `UTC`/`Z`) directly after a
//! clock time is honored; naive values are taken as UTC.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
          (?P<iso>\d{4}[-/.]\d{1,2}[-/.]\d{1,2})
        | (?P<numeric>\d{1,2}[/.]\d{1,2}(?:[/.]\d{2,4})?)
        | (?P<time>\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)
        | (?P<offset>[+-]\d{2}:?\d{2})
        | (?P<num>\d+)(?:st|nd|rd|th)?
        | (?P<word>[^\W\d_]+)",
    )
    .expect("date token regex")
});

/// Parse `text` into unix seconds, relative to the current date.
pub fn parse_date(text: &str) -> Option<f64> {
    parse_date_at(text, Utc::now())
}

/// Same as [`parse_date`], with an explicit reference instant used to fill
/// in missing year/month/day.
pub fn parse_date_at(text: &str, now: DateTime<Utc>) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(epoch_secs(dt.timestamp(), dt.timestamp_subsec_nanos()));
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return Some(epoch_secs(dt.unix_timestamp(), dt.nanosecond()));
    }
    parse_fuzzy(s, now)
}

fn epoch_secs(secs: i64, nanos: u32) -> f64 {
    secs as f64 + f64::from(nanos) / 1_000_000_000.0
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Date { year: i32, month: u32, day: u32 },
    // first two numbers of a slashed/dotted date, order not yet decided
    Numeric { a: u32, b: u32, year: Option<i32> },
    Time { hour: u32, minute: u32, second: u32, nanos: u32 },
    Offset(i32),
    Num { value: u64, digits: usize },
    Word(String),
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut out = Vec::new();
    for caps in TOKEN_RE.captures_iter(s) {
        let tok = if let Some(m) = caps.name("iso") {
            split_date(m.as_str(), &['-', '/', '.']).map(|(y, mo, d)| Token::Date {
                year: y as i32,
                month: mo,
                day: d,
            })
        } else if let Some(m) = caps.name("numeric") {
            split_numeric(m.as_str())
        } else if let Some(m) = caps.name("time") {
            parse_clock(m.as_str())
        } else if let Some(m) = caps.name("offset") {
            parse_offset(m.as_str()).map(Token::Offset)
        } else if let Some(m) = caps.name("num") {
            m.as_str().parse::<u64>().ok().map(|value| Token::Num {
                value,
                digits: m.as_str().len(),
            })
        } else {
            caps.name("word")
                .map(|m| Token::Word(m.as_str().to_ascii_lowercase()))
        };
        if let Some(t) = tok {
            out.push(t);
        }
    }
    out
}

/// `5/1` or `5/1/23`; the year part is optional.
fn split_numeric(s: &str) -> Option<Token> {
    let mut parts = s.split(['/', '.']);
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    let year = match parts.next() {
        Some(y) => Some(expand_year(y.parse().ok()?, y.len())),
        None => None,
    };
    Some(Token::Numeric { a, b, year })
}

/// `1-2-3` style triple; the first part is returned unchanged in position 0.
fn split_date(s: &str, seps: &[char]) -> Option<(u32, u32, u32)> {
    let mut parts = s.split(|c: char| seps.contains(&c));
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    let c = parts.next()?.parse().ok()?;
    Some((a, b, c))
}

/// Two-digit years follow the strftime `%y` convention (69 → 2069, 70 → 1970).
fn expand_year(y: u32, digits: usize) -> i32 {
    match (digits, y) {
        (2, 0..=69) => 2000 + y as i32,
        (2, _) => 1900 + y as i32,
        _ => y as i32,
    }
}

fn parse_clock(s: &str) -> Option<Token> {
    let (hms, frac) = match s.split_once('.') {
        Some((hms, frac)) => (hms, Some(frac)),
        None => (s, None),
    };
    let mut parts = hms.split(':');
    let hour = parts.next()?.parse().ok()?;
    let minute = parts.next()?.parse().ok()?;
    let second = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let nanos = match frac {
        // nanosecond precision: truncate past nine digits, right-pad below
        // (".5" is 500ms)
        Some(f) => format!("{:0<9}", &f[..f.len().min(9)]).parse().ok()?,
        None => 0,
    };
    Some(Token::Time {
        hour,
        minute,
        second,
        nanos,
    })
}

fn parse_offset(s: &str) -> Option<i32> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

fn month_token_to_number(token: &str) -> Option<u32> {
    match token {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn is_meridiem(tok: Option<&Token>) -> bool {
    matches!(tok, Some(Token::Word(w)) if w == "am" || w == "pm")
}

#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: u32,
    second: u32,
    nanos: u32,
    pm: Option<bool>,
    offset: Option<i32>,
}

impl Parts {
    fn has_date(&self) -> bool {
        self.month.is_some() || self.day.is_some()
    }
}

fn parse_fuzzy(s: &str, now: DateTime<Utc>) -> Option<f64> {
    let tokens = tokenize(s);
    let mut p = Parts::default();
    let mut found = false;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::Date { year, month, day } if !p.has_date() => {
                p.year = Some(*year);
                p.month = Some(*month);
                p.day = Some(*day);
                found = true;
            }
            Token::Numeric { a, b, year } if !p.has_date() => {
                // month-first unless the first number cannot be a month
                let (month, day) = if *a > 12 { (*b, *a) } else { (*a, *b) };
                p.year = *year;
                p.month = Some(month);
                p.day = Some(day);
                found = true;
            }
            Token::Time {
                hour,
                minute,
                second,
                nanos,
            } if p.hour.is_none() => {
                p.hour = Some(*hour);
                p.minute = *minute;
                p.second = *second;
                p.nanos = *nanos;
                found = true;
            }
            Token::Offset(secs) if p.offset.is_none() => {
                // only meaningful right after a clock time
                if i > 0 && matches!(tokens[i - 1], Token::Time { .. }) {
                    p.offset = Some(*secs);
                }
            }
            Token::Num { value, digits } => {
                let v = *value;
                if is_meridiem(tokens.get(i + 1)) && p.hour.is_none() && (1..=12).contains(&v) {
                    p.hour = Some(v as u32);
                    found = true;
                } else if *digits == 4 && p.year.is_none() {
                    p.year = Some(v as i32);
                    found = true;
                } else if *digits == 8 && p.year.is_none() && !p.has_date() {
                    p.year = Some((v / 10_000) as i32);
                    p.month = Some((v / 100 % 100) as u32);
                    p.day = Some((v % 100) as u32);
                    found = true;
                } else if *digits == 2 && p.year.is_none() && p.day.is_some() && p.month.is_some() {
                    // "5 Jan 23"
                    p.year = Some(expand_year(v as u32, 2));
                    found = true;
                } else if *digits <= 2 && p.day.is_none() && (1..=31).contains(&v) {
                    p.day = Some(v as u32);
                    found = true;
                }
            }
            Token::Word(w) => {
                if let Some(m) = month_token_to_number(w) {
                    if p.month.is_none() {
                        p.month = Some(m);
                        found = true;
                    }
                } else if (w == "am" || w == "pm") && p.hour.is_some() && p.pm.is_none() {
                    p.pm = Some(w == "pm");
                } else if matches!(w.as_str(), "utc" | "gmt" | "z")
                    && p.offset.is_none()
                    && i > 0
                    && matches!(tokens[i - 1], Token::Time { .. })
                {
                    p.offset = Some(0);
                }
            }
            _ => {}
        }
    }

    if !found {
        return None;
    }
    assemble(&p, now)
}

fn assemble(p: &Parts, now: DateTime<Utc>) -> Option<f64> {
    let year = p.year.unwrap_or(now.year());
    let month = p.month.unwrap_or(now.month());
    let date = match p.day {
        Some(d) => NaiveDate::from_ymd_opt(year, month, d)?,
        // borrowed day-of-month may overflow a shorter month; clamp down
        None => (1..=now.day())
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))?,
    };

    let mut hour = p.hour.unwrap_or(0);
    if let Some(pm) = p.pm {
        if hour == 0 || hour > 12 {
            return None;
        }
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, h) if h < 12 => h + 12,
            (_, h) => h,
        };
    }
    let time = NaiveTime::from_hms_nano_opt(hour, p.minute, p.second, p.nanos)?;
    let naive = date.and_time(time);

    let dt = match p.offset {
        Some(secs) => FixedOffset::east_opt(secs)?
            .from_local_datetime(&naive)
            .single()?
            .with_timezone(&Utc),
        None => naive.and_utc(),
    };
    Some(epoch_secs(dt.timestamp(), dt.timestamp_subsec_nanos()))
}
