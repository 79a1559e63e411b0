use actix_web::dev::HttpServiceFactory;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::models::Company;
use crate::prelude::*;

/// Backs the searchable company filter in the job table.
pub fn service() -> impl HttpServiceFactory {
    web::resource("/companies").route(web::get().to(list))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListResponse<'a> {
    companies: &'a Vec<Company>,
}

async fn list(
    data: web::Data<AppData>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, db::Error> {
    let companies = data
        .db
        .clone()
        .find_companies(query.into_inner().search)
        .await?;

    Ok(HttpResponse::Ok().json(ListResponse {
        companies: &companies,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use super::*;

    #[actix_web::test]
    async fn list_is_searchable_by_name() {
        let media_root = tempfile::tempdir().unwrap();
        let data = web::Data::new(AppData::for_tests(media_root.path().to_path_buf()));
        let mut db = data.db.clone();
        db.get_or_create_company("Acme".to_owned()).await.unwrap();
        db.get_or_create_company("Globex".to_owned()).await.unwrap();

        let app =
            test::init_service(App::new().app_data(data.clone()).service(service())).await;

        let req = test::TestRequest::get().uri("/companies").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["companies"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri("/companies?search=Glo")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let companies = body["companies"].as_array().unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0]["name"], "Globex");
    }
}
