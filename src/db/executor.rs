use actix::prelude::*;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::result::Error::DatabaseError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::models::*;
use super::schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub struct Executor {
    conn: SqliteConnection,
}

impl Executor {
    pub fn connect(connspec: &str) -> ConnectionResult<Self> {
        let mut conn = SqliteConnection::establish(connspec)?;

        // Several executors share the database file.
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(ConnectionError::CouldntSetupConfiguration)?;

        Ok(Executor { conn })
    }

    pub fn run_migrations(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.conn.run_pending_migrations(MIGRATIONS)?;

        Ok(())
    }
}

impl Actor for Executor {
    type Context = SyncContext<Self>;
}


/// Filter on the soft-delete marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashedFilter {
    Exclude,
    Include,
    Only,
}

impl Default for TrashedFilter {
    fn default() -> Self {
        TrashedFilter::Exclude
    }
}

/// Dynamic filter and sort parameters for the job table.
#[derive(Debug, Default)]
pub struct JobQuery {
    pub applied: Option<bool>,
    pub company_id: Option<i32>,
    pub search: Option<String>,
    pub trashed: TrashedFilter,
    pub oldest_first: bool,
}


impl Executor {
    fn get_or_create_company(&mut self, company_name: &str) -> QueryResult<Company> {
        self.conn.transaction(|conn| {
            use schema::companies::dsl::*;

            if let Some(company) = company_by_name(conn, company_name)? {
                return Ok(company);
            }

            let inserted = diesel::insert_into(companies)
                .values(&NewCompany { name: company_name })
                .execute(conn);

            match inserted {
                Ok(_) => companies.order(id.desc()).first(conn),
                // Another writer won the insert: return its row.
                Err(DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    company_by_name(conn, company_name)?.ok_or(diesel::result::Error::NotFound)
                }
                Err(e) => Err(e),
            }
        })
    }

    fn set_company_logo(&mut self, company_id: i32, path: &str) -> QueryResult<()> {
        use schema::companies::dsl::*;

        diesel::update(companies.filter(id.eq(company_id).and(logo.is_null())))
            .set(logo.eq(Some(path)))
            .execute(&mut self.conn)?;

        Ok(())
    }

    fn find_companies(&mut self, search: Option<&str>) -> QueryResult<Vec<Company>> {
        use schema::companies::dsl::*;

        let mut query = companies.into_boxed();

        if let Some(term) = search {
            query = query.filter(name.like(format!("%{}%", term)));
        }

        query.order(name.asc()).load(&mut self.conn)
    }

    fn get_or_create_job_item(&mut self, new_job: &NewJobItem) -> QueryResult<(JobItem, bool)> {
        self.conn.transaction(|conn| {
            use schema::job_items::dsl::*;

            if let Some(job) = job_by_link(conn, &new_job.link)? {
                return Ok((job, false));
            }

            let inserted = diesel::insert_into(job_items).values(new_job).execute(conn);

            match inserted {
                Ok(_) => job_items
                    .order(id.desc())
                    .first(conn)
                    .map(|job| (job, true)),
                // Another writer won the insert: return its row.
                Err(DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    job_by_link(conn, &new_job.link)?
                        .ok_or(diesel::result::Error::NotFound)
                        .map(|job| (job, false))
                }
                Err(e) => Err(e),
            }
        })
    }

    fn find_job_items(&mut self, query: &JobQuery) -> QueryResult<Vec<(JobItem, Company)>> {
        use schema::{companies, job_items};

        let mut items = job_items::table.inner_join(companies::table).into_boxed();

        match query.applied {
            Some(true) => items = items.filter(job_items::applied_at.is_not_null()),
            Some(false) => items = items.filter(job_items::applied_at.is_null()),
            None => {}
        }

        if let Some(company_id) = query.company_id {
            items = items.filter(job_items::company_id.eq(company_id));
        }

        if let Some(term) = &query.search {
            items = items.filter(job_items::title.like(format!("%{}%", term)));
        }

        items = match query.trashed {
            TrashedFilter::Exclude => items.filter(job_items::deleted_at.is_null()),
            TrashedFilter::Only => items.filter(job_items::deleted_at.is_not_null()),
            TrashedFilter::Include => items,
        };

        items = if query.oldest_first {
            items.order(job_items::published_at.asc())
        } else {
            items.order(job_items::published_at.desc())
        };

        items.load(&mut self.conn)
    }

    fn toggle_applied(&mut self, job_id: i32) -> QueryResult<JobItem> {
        self.conn.transaction(|conn| {
            use schema::job_items::dsl::*;

            let job: JobItem = job_items.find(job_id).first(conn)?;

            let stamp = match job.applied_at {
                Some(_) => None,
                None => Some(chrono::Utc::now().naive_utc()),
            };

            diesel::update(job_items.find(job_id))
                .set(applied_at.eq(stamp))
                .execute(conn)?;

            job_items.find(job_id).first(conn)
        })
    }

    fn soft_delete_job_item(&mut self, job_id: i32) -> QueryResult<JobItem> {
        self.conn.transaction(|conn| {
            use schema::job_items::dsl::*;

            let job: JobItem = job_items.find(job_id).first(conn)?;

            if job.deleted_at.is_none() {
                diesel::update(job_items.find(job_id))
                    .set(deleted_at.eq(Some(chrono::Utc::now().naive_utc())))
                    .execute(conn)?;
            }

            job_items.find(job_id).first(conn)
        })
    }
}

fn company_by_name(conn: &mut SqliteConnection, company_name: &str) -> QueryResult<Option<Company>> {
    use schema::companies::dsl::*;

    companies
        .filter(name.eq(company_name))
        .first(conn)
        .optional()
}

fn job_by_link(conn: &mut SqliteConnection, job_link: &str) -> QueryResult<Option<JobItem>> {
    use schema::job_items::dsl::*;

    job_items.filter(link.eq(job_link)).first(conn).optional()
}


pub struct GetOrCreateCompany {
    pub name: String,
}

impl Message for GetOrCreateCompany {
    type Result = diesel::QueryResult<Company>;
}

impl Handler<GetOrCreateCompany> for Executor {
    type Result = <GetOrCreateCompany as Message>::Result;

    fn handle(&mut self, msg: GetOrCreateCompany, _: &mut Self::Context) -> Self::Result {
        self.get_or_create_company(&msg.name)
    }
}


pub struct SetCompanyLogo {
    pub company_id: i32,
    pub path: String,
}

impl Message for SetCompanyLogo {
    type Result = diesel::QueryResult<()>;
}

impl Handler<SetCompanyLogo> for Executor {
    type Result = <SetCompanyLogo as Message>::Result;

    fn handle(&mut self, msg: SetCompanyLogo, _: &mut Self::Context) -> Self::Result {
        self.set_company_logo(msg.company_id, &msg.path)
    }
}


pub struct FindCompanies {
    pub search: Option<String>,
}

impl Message for FindCompanies {
    type Result = diesel::QueryResult<Vec<Company>>;
}

impl Handler<FindCompanies> for Executor {
    type Result = <FindCompanies as Message>::Result;

    fn handle(&mut self, msg: FindCompanies, _: &mut Self::Context) -> Self::Result {
        self.find_companies(msg.search.as_deref())
    }
}


pub struct GetOrCreateJobItem(pub NewJobItem);

impl Message for GetOrCreateJobItem {
    type Result = diesel::QueryResult<(JobItem, bool)>;
}

impl Handler<GetOrCreateJobItem> for Executor {
    type Result = <GetOrCreateJobItem as Message>::Result;

    fn handle(&mut self, msg: GetOrCreateJobItem, _: &mut Self::Context) -> Self::Result {
        self.get_or_create_job_item(&msg.0)
    }
}


pub struct FindJobItems(pub JobQuery);

impl Message for FindJobItems {
    type Result = diesel::QueryResult<Vec<(JobItem, Company)>>;
}

impl Handler<FindJobItems> for Executor {
    type Result = <FindJobItems as Message>::Result;

    fn handle(&mut self, msg: FindJobItems, _: &mut Self::Context) -> Self::Result {
        self.find_job_items(&msg.0)
    }
}


pub struct ToggleApplied(pub i32);

impl Message for ToggleApplied {
    type Result = diesel::QueryResult<JobItem>;
}

impl Handler<ToggleApplied> for Executor {
    type Result = <ToggleApplied as Message>::Result;

    fn handle(&mut self, msg: ToggleApplied, _: &mut Self::Context) -> Self::Result {
        self.toggle_applied(msg.0)
    }
}


pub struct SoftDeleteJobItem(pub i32);

impl Message for SoftDeleteJobItem {
    type Result = diesel::QueryResult<JobItem>;
}

impl Handler<SoftDeleteJobItem> for Executor {
    type Result = <SoftDeleteJobItem as Message>::Result;

    fn handle(&mut self, msg: SoftDeleteJobItem, _: &mut Self::Context) -> Self::Result {
        self.soft_delete_job_item(msg.0)
    }
}
