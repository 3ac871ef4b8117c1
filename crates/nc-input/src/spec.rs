//! Input descriptor parsing.
//!
//! An input descriptor is `TYPE:paths` where `TYPE` names a registered
//! handler family and `paths` is a comma-separated file list, optionally
//! wrapped in parentheses to mark the group as one jointly normalized
//! input: `NEUT:(fhc_a.json,fhc_b.json)`.

use nc_core::{Error, Result};
use std::path::PathBuf;

/// A parsed input descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    /// Handler family, upper-cased; `None` when no prefix was given and
    /// the type must be guessed from file contents.
    pub handler_type: Option<String>,
    /// The file list.
    pub files: Vec<PathBuf>,
    /// Was the group parenthesized as a joint input?
    pub joint: bool,
}

/// Parse one raw input descriptor.
pub fn parse_input_spec(raw: &str) -> Result<InputSpec> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::Config("empty input descriptor".into()));
    }

    // A leading TYPE: prefix; colons inside paths are not supported.
    let (handler_type, rest) = match raw.split_once(':') {
        Some((ty, rest))
            if !ty.is_empty() && ty.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            (Some(ty.to_ascii_uppercase()), rest)
        }
        _ => (None, raw),
    };

    let joint = rest.starts_with('(');
    if joint && !rest.ends_with(')') {
        return Err(Error::Config(format!(
            "joint input specified as a list of files wrapped in parentheses, \
             e.g. (filea.json,fileb.json), but '{rest}' does not end in ')'"
        )));
    }
    let inner = if joint { &rest[1..rest.len() - 1] } else { rest };

    let files: Vec<PathBuf> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    if files.is_empty() {
        return Err(Error::Config(format!("no input files in descriptor '{raw}'")));
    }

    Ok(InputSpec { handler_type, files, joint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_single_file() {
        let s = parse_input_spec("NEUT:events.json").unwrap();
        assert_eq!(s.handler_type.as_deref(), Some("NEUT"));
        assert_eq!(s.files, vec![PathBuf::from("events.json")]);
        assert!(!s.joint);
    }

    #[test]
    fn joint_group() {
        let s = parse_input_spec("GENIE:(a.json, b.json,c.json)").unwrap();
        assert_eq!(s.handler_type.as_deref(), Some("GENIE"));
        assert_eq!(s.files.len(), 3);
        assert!(s.joint);
    }

    #[test]
    fn type_prefix_is_case_insensitive() {
        let s = parse_input_spec("nuwro:events.json").unwrap();
        assert_eq!(s.handler_type.as_deref(), Some("NUWRO"));
    }

    #[test]
    fn missing_prefix_means_guess() {
        let s = parse_input_spec("plain.json").unwrap();
        assert_eq!(s.handler_type, None);
        // A path with a directory component is not a type prefix.
        let s = parse_input_spec("data/run1.json").unwrap();
        assert_eq!(s.handler_type, None);
        assert_eq!(s.files, vec![PathBuf::from("data/run1.json")]);
    }

    #[test]
    fn unbalanced_parens_are_fatal() {
        assert!(parse_input_spec("NEUT:(a.json,b.json").is_err());
        assert!(parse_input_spec("").is_err());
        assert!(parse_input_spec("NEUT:()").is_err());
    }
}
