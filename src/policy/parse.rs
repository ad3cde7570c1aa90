//! Policy document parsing.
//!
//! The document at `https://mta-sts.<domain>/.well-known/mta-sts.txt` is a
//! list of `key: value` lines. Parsing is strict: any malformed line, repeated
//! single-valued field, missing field or out-of-range value rejects the whole
//! document.

use std::str::FromStr;

use super::matching::MxPattern;
use super::types::{Policy, PolicyMode};
use crate::config::{
    MAX_POLICY_AGE_DIGITS, MAX_POLICY_AGE_SECS, MAX_POLICY_FIELD_NAME_LEN, POLICY_MEDIA_TYPE,
    STS_VERSION,
};
use crate::error_handling::PolicyError;

/// Parses a fetched policy body.
///
/// # Arguments
///
/// * `body` - Raw body bytes, already capped by the caller
/// * `content_type` - The `Content-Type` header of the response, if any
///
/// # Errors
///
/// Returns `PolicyError::ContentType` if the media type is missing or not
/// `text/plain`, `PolicyError::NotUtf8` for undecodable bodies, and any error
/// of `Policy::parse`.
pub fn parse_policy_document(body: &[u8], content_type: Option<&str>) -> Result<Policy, PolicyError> {
    check_content_type(content_type)?;
    let text = std::str::from_utf8(body).map_err(|_| PolicyError::NotUtf8)?;
    Policy::parse(text)
}

impl Policy {
    /// Parses policy text.
    ///
    /// # Example
    ///
    /// ```
    /// use mta_sts::{Policy, PolicyMode};
    ///
    /// let policy = Policy::parse(
    ///     "version: STSv1\nmode: enforce\nmx: mail.example.com\nmax_age: 604800\n",
    /// )
    /// .unwrap();
    /// assert_eq!(policy.mode(), PolicyMode::Enforce);
    /// assert!(policy.matches_mx("mail.example.com"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `PolicyError` naming the first problem found.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let mut version: Option<&str> = None;
        let mut mode: Option<PolicyMode> = None;
        let mut max_age: Option<u64> = None;
        let mut mx = Vec::new();

        for (index, raw_line) in text.split('\n').enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = split_line(line).ok_or_else(|| PolicyError::MalformedLine {
                line: index + 1,
                content: line.to_string(),
            })?;

            match key {
                "version" => {
                    set_once(&mut version, value, "version")?;
                    if value != STS_VERSION {
                        return Err(PolicyError::InvalidVersion(value.to_string()));
                    }
                }
                "mode" => {
                    let parsed = PolicyMode::from_str(value)
                        .map_err(|_| PolicyError::InvalidMode(value.to_string()))?;
                    set_once(&mut mode, parsed, "mode")?;
                }
                "max_age" => {
                    let parsed = parse_max_age(value)?;
                    set_once(&mut max_age, parsed, "max_age")?;
                }
                "mx" => mx.push(MxPattern::parse(value)?),
                // unknown fields are reserved for extensions
                _ => {}
            }
        }

        version.ok_or(PolicyError::MissingField("version"))?;
        let mode = mode.ok_or(PolicyError::MissingField("mode"))?;
        let max_age = max_age.ok_or(PolicyError::MissingField("max_age"))?;

        if mode != PolicyMode::None && mx.is_empty() {
            return Err(PolicyError::MissingMx(mode.to_string()));
        }

        Ok(Policy { mode, mx, max_age })
    }
}

impl FromStr for Policy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn check_content_type(content_type: Option<&str>) -> Result<(), PolicyError> {
    let Some(content_type) = content_type else {
        return Err(PolicyError::ContentType("<missing>".to_string()));
    };
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if media_type.eq_ignore_ascii_case(POLICY_MEDIA_TYPE) {
        Ok(())
    } else {
        Err(PolicyError::ContentType(media_type.to_string()))
    }
}

/// Splits `key: value`; the key may not carry whitespace, the value may not
/// be empty.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let value = value.trim_matches(|c| c == ' ' || c == '\t');
    let key_ok = !key.is_empty()
        && key.len() <= MAX_POLICY_FIELD_NAME_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if key_ok && !value.is_empty() {
        Some((key, value))
    } else {
        None
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<(), PolicyError> {
    if slot.is_some() {
        return Err(PolicyError::DuplicateField(field));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_max_age(value: &str) -> Result<u64, PolicyError> {
    if value.is_empty()
        || value.len() > MAX_POLICY_AGE_DIGITS
        || !value.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PolicyError::InvalidMaxAge(value.to_string()));
    }
    let max_age: u64 = value
        .parse()
        .map_err(|_| PolicyError::InvalidMaxAge(value.to_string()))?;
    if max_age > MAX_POLICY_AGE_SECS {
        return Err(PolicyError::MaxAgeOutOfRange(max_age));
    }
    Ok(max_age)
}
