use futures::TryFutureExt;

/// Namespace the feed uses for its job metadata extensions.
const METADATA_NS: &str = "https://larajobs.com";

/// One item from the ingested feed, reduced to the fields reconciliation
/// cares about. Everything except the identity is best-effort.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
}

#[derive(Clone)]
pub struct FeedClient {
    http_client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Self {
        FeedClient {
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, &'static str> {
        let feed_bytes = self
            .http_client
            .get(url)
            .send()
            .and_then(|resp| resp.bytes())
            .await
            .map_err(|e| {
                log::error!("{}", e);
                "Could not fetch feed."
            })?;

        parse(feed_bytes.as_ref())
    }
}

pub fn parse(bytes: &[u8]) -> Result<Vec<FeedEntry>, &'static str> {
    let channel = rss::Channel::read_from(bytes).map_err(|e| {
        log::error!("Parse error: {}", e);
        "Could not parse content as a feed."
    })?;

    // The metadata elements are namespaced; resolve whatever prefix the
    // feed declared for them.
    let meta_prefix = channel
        .namespaces()
        .iter()
        .find(|(_, uri)| uri.as_str() == METADATA_NS)
        .map(|(prefix, _)| prefix.clone());

    channel
        .items()
        .iter()
        .map(|item| entry_from_item(item, meta_prefix.as_deref()))
        .collect()
}

fn entry_from_item(item: &rss::Item, meta_prefix: Option<&str>) -> Result<FeedEntry, &'static str> {
    let id = item
        .guid()
        .map(|guid| guid.value().to_owned())
        .or_else(|| item.link().map(str::to_owned))
        .ok_or_else(|| {
            log::error!("Feed entry has neither guid nor link");
            log::debug!("{:#?}", item);
            "Feed entry has no identifier."
        })?;

    let author = item
        .author()
        .map(str::to_owned)
        .or_else(|| item.dublin_core_ext().and_then(|dc| dc.creators().first().cloned()));

    Ok(FeedEntry {
        id,
        title: item.title().map(str::to_owned),
        author,
        published: item.pub_date().map(str::to_owned),
        logo_url: meta_value(item, meta_prefix, "company_logo"),
        location: meta_value(item, meta_prefix, "location"),
        salary: meta_value(item, meta_prefix, "salary"),
    })
}

/// Look up the first value of a namespaced metadata element.
/// Absence at any step yields `None`.
fn meta_value(item: &rss::Item, meta_prefix: Option<&str>, element: &str) -> Option<String> {
    item.extensions()
        .get(meta_prefix?)?
        .get(element)?
        .first()?
        .value()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:job="https://larajobs.com" xmlns:dc="http://purl.org/dc/elements/1.1/">
<channel>
<title>Larajobs</title>
<link>https://larajobs.com</link>
<description>Job listings</description>
{}
</channel>
</rss>"#,
            items
        )
    }

    #[test]
    fn parses_entry_with_namespaced_metadata() {
        let xml = feed(
            r#"<item>
<title>Engineer</title>
<link>https://x/job/1</link>
<guid isPermaLink="true">https://x/job/1</guid>
<author>Acme</author>
<pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
<job:company_logo>https://x/logo.png</job:company_logo>
<job:location>Remote</job:location>
<job:salary>$100k</job:salary>
</item>"#,
        );

        let entries = parse(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.id, "https://x/job/1");
        assert_eq!(entry.title.as_deref(), Some("Engineer"));
        assert_eq!(entry.author.as_deref(), Some("Acme"));
        assert_eq!(entry.published.as_deref(), Some("Mon, 01 Jan 2024 00:00:00 +0000"));
        assert_eq!(entry.logo_url.as_deref(), Some("https://x/logo.png"));
        assert_eq!(entry.location.as_deref(), Some("Remote"));
        assert_eq!(entry.salary.as_deref(), Some("$100k"));
    }

    #[test]
    fn missing_metadata_yields_none() {
        let xml = feed(
            r#"<item>
<title>Engineer</title>
<guid>https://x/job/1</guid>
<author>Acme</author>
</item>"#,
        );

        let entries = parse(xml.as_bytes()).unwrap();

        let entry = &entries[0];
        assert_eq!(entry.logo_url, None);
        assert_eq!(entry.location, None);
        assert_eq!(entry.salary, None);
        assert_eq!(entry.published, None);
    }

    #[test]
    fn metadata_is_matched_by_namespace_not_prefix() {
        // Same elements under an unrelated namespace must not be picked up.
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:job="https://example.com/other">
<channel>
<title>Feed</title>
<link>https://x</link>
<description>d</description>
<item>
<guid>https://x/job/1</guid>
<job:location>Remote</job:location>
</item>
</channel>
</rss>"#;

        let entries = parse(xml.as_bytes()).unwrap();
        assert_eq!(entries[0].location, None);
    }

    #[test]
    fn entry_identity_falls_back_to_link() {
        let xml = feed(
            r#"<item>
<title>Engineer</title>
<link>https://x/job/1</link>
</item>"#,
        );

        let entries = parse(xml.as_bytes()).unwrap();
        assert_eq!(entries[0].id, "https://x/job/1");
    }

    #[test]
    fn entry_without_identity_is_an_error() {
        let xml = feed("<item><title>Engineer</title></item>");

        assert!(parse(xml.as_bytes()).is_err());
    }

    #[test]
    fn author_falls_back_to_dublin_core_creator() {
        let xml = feed(
            r#"<item>
<guid>https://x/job/1</guid>
<dc:creator>Acme</dc:creator>
</item>"#,
        );

        let entries = parse(xml.as_bytes()).unwrap();
        assert_eq!(entries[0].author.as_deref(), Some("Acme"));
    }
}
