// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Serialization or deserialization failed for a reason other than an
    /// unregistered type tag (malformed JSON, wrong field shape).
    Codec(String),

    /// A decode call met a type tag that names no registered entity.
    ///
    /// This is a programming-contract violation: the encoded data was
    /// produced by an incompatible writer. The offending tag is carried
    /// verbatim for diagnosis.
    UnknownTag(String),

    /// Options file could not be read, written, or parsed.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Codec(e) => write!(f, "Codec Error: {}", e),
            Error::UnknownTag(tag) => write!(f, "Unknown type tag: {}", tag),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_codec_error() {
        let err = Error::Codec("truncated payload".to_string());
        assert_eq!(format!("{}", err), "Codec Error: truncated payload");
    }

    #[test]
    fn display_surfaces_the_offending_tag() {
        let err = Error::UnknownTag("hologram".to_string());
        assert_eq!(format!("{}", err), "Unknown type tag: hologram");
    }

    #[test]
    fn from_json_error_produces_codec_variant() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json")
            .expect_err("parse should fail");
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn from_io_error_produces_config_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Config(message) => assert!(message.contains("boom")),
            _ => panic!("expected Config variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }
}
