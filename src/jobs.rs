use actix_web::dev::HttpServiceFactory;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::reconciler;

pub fn service() -> impl HttpServiceFactory {
    web::scope("/jobs")
        .route("", web::get().to(list))
        .route("/sync", web::post().to(sync))
        .route("/{id}/applied", web::post().to(toggle_applied))
        .route("/{id}", web::delete().to(delete))
}


#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AppliedParam {
    Yes,
    No,
    All,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TrashedParam {
    Without,
    With,
    Only,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    applied: Option<AppliedParam>,
    company: Option<i32>,
    search: Option<String>,
    trashed: Option<TrashedParam>,
    dir: Option<SortDir>,
}

impl ListQuery {
    fn into_job_query(self) -> db::JobQuery {
        db::JobQuery {
            applied: match self.applied.unwrap_or(AppliedParam::No) {
                AppliedParam::Yes => Some(true),
                AppliedParam::No => Some(false),
                AppliedParam::All => None,
            },
            company_id: self.company,
            search: self.search,
            trashed: match self.trashed.unwrap_or(TrashedParam::Without) {
                TrashedParam::Without => db::TrashedFilter::Exclude,
                TrashedParam::With => db::TrashedFilter::Include,
                TrashedParam::Only => db::TrashedFilter::Only,
            },
            oldest_first: matches!(self.dir, Some(SortDir::Asc)),
        }
    }
}


#[derive(Debug, Serialize)]
struct ListResponse<'a> {
    jobs: &'a Vec<JobRow<'a>>,
    poll_secs: u64,
}

#[derive(Debug, Serialize)]
struct JobRow<'a> {
    id: i32,
    title: &'a str,
    link: &'a str,
    published_at: &'a chrono::NaiveDateTime,
    company: CompanyRow<'a>,
    location: &'a Option<String>,
    salary: &'a Option<String>,
    applied_at: &'a Option<chrono::NaiveDateTime>,
    deleted_at: &'a Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Serialize)]
struct CompanyRow<'a> {
    id: i32,
    name: &'a str,
    logo: &'a Option<String>,
}

async fn list(
    data: web::Data<AppData>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, db::Error> {
    let mut db = data.db.clone();

    let items = db.find_job_items(query.into_inner().into_job_query()).await?;

    let jobs: Vec<JobRow> = items
        .iter()
        .map(|(job, company)| JobRow {
            id: job.id,
            title: &job.title,
            link: &job.link,
            published_at: &job.published_at,
            company: CompanyRow {
                id: company.id,
                name: &company.name,
                logo: &company.logo,
            },
            location: &job.location,
            salary: &job.salary,
            applied_at: &job.applied_at,
            deleted_at: &job.deleted_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ListResponse {
        jobs: &jobs,
        poll_secs: data.cfg.poll_secs,
    }))
}


#[derive(Debug, Serialize)]
struct SyncResponse {
    created: usize,
}

/// Run on view mount by the wrapping UI.
async fn sync(data: web::Data<AppData>) -> Result<HttpResponse, reconciler::Error> {
    let created = data.reconciler.sync().await?;

    Ok(HttpResponse::Ok().json(SyncResponse { created }))
}


async fn toggle_applied(
    data: web::Data<AppData>,
    path: web::Path<i32>,
) -> Result<HttpResponse, db::Error> {
    let job = data.db.clone().toggle_applied(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(job))
}


async fn delete(
    data: web::Data<AppData>,
    path: web::Path<i32>,
) -> Result<HttpResponse, db::Error> {
    let job = data.db.clone().soft_delete_job_item(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(job))
}
