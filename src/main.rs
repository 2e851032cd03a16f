use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use stagehand_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(|e| std::io::Error::other(e.to_string()))?;

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let media_base = config.media.public_base_url.clone();
    let media_service = MediaService::new(&config.media);
    std::fs::create_dir_all(media_service.upload_dir())?;
    let upload_dir = media_service.upload_dir().to_path_buf();

    let notification_service = NotificationService::new(pool.clone());
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let artist_service = ArtistService::new(pool.clone(), media_base.clone());
    let organiser_service = OrganiserService::new(pool.clone(), media_base.clone());
    let venue_service = VenueService::new(pool.clone(), media_base.clone());
    let event_service = EventService::new(
        pool.clone(),
        media_base.clone(),
        notification_service.clone(),
    );
    let favorite_service = FavoriteService::new(pool.clone(), notification_service.clone());
    let feature_service = FeatureService::new(pool.clone());

    tasks::spawn_all(&config.tasks, feature_service.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let cors_origins = config.server.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors(&cors_origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(artist_service.clone()))
            .app_data(web::Data::new(organiser_service.clone()))
            .app_data(web::Data::new(venue_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(favorite_service.clone()))
            .app_data(web::Data::new(feature_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(media_service.clone()))
            .configure(swagger_config)
            .service(Files::new(
                &format!("/{UPLOADS_URL_PREFIX}"),
                upload_dir.clone(),
            ))
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
