use serde::Serialize;

use super::schema::{companies, job_items};
use crate::feed::FeedEntry;

#[derive(Debug, Clone, Serialize, Identifiable, Queryable)]
#[diesel(table_name = companies)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompany<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize, Identifiable, Queryable)]
#[diesel(table_name = job_items)]
pub struct JobItem {
    pub id: i32,
    pub link: String,
    pub title: String,
    pub company_id: i32,
    pub published_at: chrono::NaiveDateTime,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub applied_at: Option<chrono::NaiveDateTime>,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl JobItem {
    /// Body of the desktop notification shown when this posting is first seen.
    pub fn notification_message(&self, company: &Company) -> String {
        let mut parts = vec![company.name.as_str()];
        if let Some(location) = &self.location {
            parts.push(location);
        }
        if let Some(salary) = &self.salary {
            parts.push(salary);
        }
        parts.join(" · ")
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = job_items)]
pub struct NewJobItem {
    pub link: String,
    pub title: String,
    pub company_id: i32,
    pub published_at: chrono::NaiveDateTime,
    pub location: Option<String>,
    pub salary: Option<String>,
}

impl NewJobItem {
    pub fn try_from(entry: &FeedEntry, company: &Company) -> Result<Self, &'static str> {
        let title = entry.title.as_ref().ok_or("Missing title")?.clone();
        let published_at = entry
            .published
            .as_deref()
            .ok_or("Missing publish date")
            .and_then(parse_pub_date)?;

        Ok(Self {
            link: entry.id.clone(),
            title,
            company_id: company.id,
            published_at,
            location: entry.location.clone(),
            salary: entry.salary.clone(),
        })
    }
}

/// Parse the feed's publish date.
///
/// RSS mandates RFC 2822, but the wild also serves RFC 3339 and bare dates.
fn parse_pub_date(raw: &str) -> Result<chrono::NaiveDateTime, &'static str> {
    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(raw) {
        return Ok(date.naive_utc());
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(date.naive_utc());
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(date) = date.and_hms_opt(0, 0, 0) {
            return Ok(date);
        }
    }

    Err("Invalid publish date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        Company {
            id: 7,
            name: "Acme".to_owned(),
            logo: None,
        }
    }

    fn entry() -> FeedEntry {
        FeedEntry {
            id: "https://x/job/1".to_owned(),
            title: Some("Engineer".to_owned()),
            author: Some("Acme".to_owned()),
            published: Some("2024-01-01".to_owned()),
            logo_url: None,
            location: Some("Remote".to_owned()),
            salary: Some("$100k".to_owned()),
        }
    }

    #[test]
    fn try_from_maps_entry_fields() {
        let job = NewJobItem::try_from(&entry(), &company()).unwrap();

        assert_eq!(job.link, "https://x/job/1");
        assert_eq!(job.title, "Engineer");
        assert_eq!(job.company_id, 7);
        assert_eq!(job.location.as_deref(), Some("Remote"));
        assert_eq!(job.salary.as_deref(), Some("$100k"));
        assert_eq!(
            job.published_at,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn try_from_requires_title() {
        let mut entry = entry();
        entry.title = None;

        assert_eq!(
            NewJobItem::try_from(&entry, &company()).unwrap_err(),
            "Missing title"
        );
    }

    #[test]
    fn try_from_requires_publish_date() {
        let mut entry = entry();
        entry.published = None;

        assert_eq!(
            NewJobItem::try_from(&entry, &company()).unwrap_err(),
            "Missing publish date"
        );
    }

    #[test]
    fn pub_date_accepts_rfc2822() {
        let date = parse_pub_date("Mon, 01 Jan 2024 10:30:00 +0000").unwrap();

        assert_eq!(
            date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn pub_date_accepts_rfc3339() {
        let date = parse_pub_date("2024-01-01T10:30:00+02:00").unwrap();

        assert_eq!(
            date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn pub_date_rejects_garbage() {
        assert!(parse_pub_date("next tuesday").is_err());
    }

    #[test]
    fn notification_message_skips_missing_parts() {
        let job = JobItem {
            id: 1,
            link: "https://x/job/1".to_owned(),
            title: "Engineer".to_owned(),
            company_id: 7,
            published_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            location: None,
            salary: Some("$100k".to_owned()),
            applied_at: None,
            deleted_at: None,
        };

        assert_eq!(job.notification_message(&company()), "Acme · $100k");
    }
}
