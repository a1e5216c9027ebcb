//! Parsing of image source locators

use std::fmt;
use std::path::PathBuf;

use base64::Engine as Base64Engine;
use url::Url;

use crate::{Error, Result};

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline `data:` URL payload
    Data { mime: Option<String>, bytes: Vec<u8> },
    /// `http://` or `https://` URL
    Http(Url),
    /// Local file, from a `file://` URL or a plain path
    File(PathBuf),
}

impl ImageSource {
    /// Parse a locator string the way an `<img src>` attribute is resolved,
    /// with relative references treated as filesystem paths.
    pub fn parse(src: &str) -> Result<Self> {
        let src = src.trim();
        if src.is_empty() {
            return Err(Error::InvalidSource("empty source locator".into()));
        }

        if let Some(rest) = strip_prefix_ignore_case(src, "data:") {
            return parse_data_url(rest);
        }

        match Url::parse(src) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(ImageSource::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(ImageSource::File)
                    .map_err(|_| Error::InvalidSource(format!("bad file URL: {}", src))),
                // Windows drive letters parse as one-letter schemes
                s if s.len() == 1 => Ok(ImageSource::File(PathBuf::from(src))),
                s => Err(Error::InvalidSource(format!("unsupported scheme '{}'", s))),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(ImageSource::File(PathBuf::from(src)))
            }
            Err(e) => Err(Error::InvalidSource(format!("{}: {}", src, e))),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Data { mime, bytes } => write!(
                f,
                "data:{} ({} bytes)",
                mime.as_deref().unwrap_or("text/plain"),
                bytes.len()
            ),
            ImageSource::Http(url) => write!(f, "{}", url),
            ImageSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

// `rest` is everything after "data:"
fn parse_data_url(rest: &str) -> Result<ImageSource> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidSource("data URL without ',' separator".into()))?;

    let mut params = meta.split(';');
    let mime = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_ascii_lowercase);
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| Error::InvalidSource(format!("bad base64 in data URL: {}", e)))?
    } else {
        percent_decode(payload)?
    };

    Ok(ImageSource::Data { mime, bytes })
}

fn percent_decode(s: &str) -> Result<Vec<u8>> {
    let raw = s.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| Error::InvalidSource("bad percent escape in data URL".into()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base64_data_url() {
        let src = ImageSource::parse("data:image/png;base64,AAEC").unwrap();
        assert_eq!(
            src,
            ImageSource::Data {
                mime: Some("image/png".into()),
                bytes: vec![0, 1, 2]
            }
        );
    }

    #[test]
    fn parses_percent_encoded_data_url() {
        match ImageSource::parse("DATA:,a%20b").unwrap() {
            ImageSource::Data { mime, bytes } => {
                assert_eq!(mime, None);
                assert_eq!(bytes, b"a b");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(ImageSource::parse("data:,%zz").is_err());
        assert!(ImageSource::parse("data:image/png;base64").is_err());
    }

    #[test]
    fn parses_urls_and_paths() {
        assert!(matches!(
            ImageSource::parse("https://example.com/a.png").unwrap(),
            ImageSource::Http(_)
        ));
        assert_eq!(
            ImageSource::parse("assets/noise.png").unwrap(),
            ImageSource::File(PathBuf::from("assets/noise.png"))
        );
        assert_eq!(
            ImageSource::parse("/tmp/a.png").unwrap(),
            ImageSource::File(PathBuf::from("/tmp/a.png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn parses_file_url() {
        assert_eq!(
            ImageSource::parse("file:///tmp/a%20b.png").unwrap(),
            ImageSource::File(PathBuf::from("/tmp/a b.png"))
        );
    }

    #[test]
    fn rejects_empty_and_unknown_schemes() {
        assert!(matches!(ImageSource::parse("  "), Err(Error::InvalidSource(_))));
        assert!(matches!(
            ImageSource::parse("ftp://example.com/a.png"),
            Err(Error::InvalidSource(_))
        ));
    }
}
