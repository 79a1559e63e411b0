use std::fmt::{self, Display};
use std::path::PathBuf;

/// Downloads remote assets into the local media directory.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    http_client: reqwest::Client,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Self {
        MediaStore {
            root,
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch `url` and store it as the logo for `company_id`.
    ///
    /// Returns the path relative to the media root, which is what gets
    /// persisted on the company row.
    pub async fn attach_from_url(&self, company_id: i32, url: &str) -> Result<String, Error> {
        let response = self.http_client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = response.bytes().await?;

        let dir = self.root.join("logo");
        std::fs::create_dir_all(&dir)?;

        let file_name = format!("{}.{}", company_id, extension_for(content_type.as_deref(), url));
        std::fs::write(dir.join(&file_name), &bytes)?;

        Ok(format!("logo/{}", file_name))
    }
}

fn extension_for(content_type: Option<&str>, url: &str) -> String {
    match content_type {
        Some(t) if t.starts_with("image/png") => return "png".to_owned(),
        Some(t) if t.starts_with("image/jpeg") => return "jpg".to_owned(),
        Some(t) if t.starts_with("image/gif") => return "gif".to_owned(),
        Some(t) if t.starts_with("image/svg") => return "svg".to_owned(),
        Some(t) if t.starts_with("image/webp") => return "webp".to_owned(),
        _ => {}
    }

    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            std::path::Path::new(parsed.path())
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "img".to_owned())
}


#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_content_type() {
        assert_eq!(extension_for(Some("image/png"), "https://x/logo.jpg"), "png");
        assert_eq!(
            extension_for(Some("image/svg+xml"), "https://x/logo"),
            "svg"
        );
    }

    #[test]
    fn extension_falls_back_to_url_path() {
        assert_eq!(extension_for(None, "https://x/logo.jpg?v=2"), "jpg");
        assert_eq!(extension_for(Some("text/html"), "https://x/logo.webp"), "webp");
    }

    #[test]
    fn extension_defaults_when_unknown() {
        assert_eq!(extension_for(None, "https://x/logo"), "img");
    }
}
