#[macro_use]
extern crate diesel;

use actix_web::{middleware, web, App, HttpServer};

mod appdata;
mod companies;
mod config;
mod db;
mod feed;
mod jobs;
mod media;
mod notifier;
mod prelude;
mod reconciler;

use prelude::*;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("actix_web=info,larajobs_tracker=debug"),
    )
    .init();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let bind_addr = format!("{}:{}", cfg.http_host, cfg.http_port);

    let data = match AppData::new(cfg) {
        Ok(data) => web::Data::new(data),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(jobs::service())
            .service(companies::service())
    });

    #[cfg(feature = "dev")]
    let server = {
        let mut fds = listenfd::ListenFd::from_env();
        match fds.take_tcp_listener(0)? {
            Some(listener) => server.listen(listener)?,
            None => server.bind(&bind_addr)?,
        }
    };

    #[cfg(not(feature = "dev"))]
    let server = server.bind(&bind_addr)?;

    log::info!("Listening on http://{}", bind_addr);

    server.run().await
}
