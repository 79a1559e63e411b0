use actix::dev::ToEnvelope;
use actix::prelude::*;
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use std::fmt::{self, Display};

use super::executor::*;
use super::models::*;


#[derive(Debug)]
pub enum Error {
    MailboxError(MailboxError),
    DatabaseError(diesel::result::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MailboxError(e) => write!(f, "MailboxError: {}", e),
            Self::DatabaseError(e) => write!(f, "DatabaseError: {}", e),
        }
    }
}


#[derive(Clone)]
pub struct Helper {
    executor: Addr<Executor>,
}

impl Helper {
    pub fn new(executor: Addr<Executor>) -> Self {
        Helper { executor }
    }

    async fn send<M, T>(&mut self, msg: M) -> Result<T, Error>
    where
        M: Message<Result = diesel::QueryResult<T>> + Send + 'static,
        diesel::QueryResult<T>: Send,
        Executor: Handler<M>,
        <Executor as Actor>::Context: ToEnvelope<Executor, M>,
    {
        match self.executor.send(msg).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::DatabaseError(e)),
            Err(e) => Err(Error::MailboxError(e)),
        }
    }

    pub async fn get_or_create_company(&mut self, name: String) -> Result<Company, Error> {
        self.send(GetOrCreateCompany { name }).await
    }

    pub async fn set_company_logo(&mut self, company_id: i32, path: String) -> Result<(), Error> {
        self.send(SetCompanyLogo { company_id, path }).await
    }

    pub async fn find_companies(&mut self, search: Option<String>) -> Result<Vec<Company>, Error> {
        self.send(FindCompanies { search }).await
    }

    pub async fn get_or_create_job_item(
        &mut self,
        new_job: NewJobItem,
    ) -> Result<(JobItem, bool), Error> {
        self.send(GetOrCreateJobItem(new_job)).await
    }

    pub async fn find_job_items(
        &mut self,
        query: JobQuery,
    ) -> Result<Vec<(JobItem, Company)>, Error> {
        self.send(FindJobItems(query)).await
    }

    pub async fn toggle_applied(&mut self, job_id: i32) -> Result<JobItem, Error> {
        self.send(ToggleApplied(job_id)).await
    }

    pub async fn soft_delete_job_item(&mut self, job_id: i32) -> Result<JobItem, Error> {
        self.send(SoftDeleteJobItem(job_id)).await
    }
}
