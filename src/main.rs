use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use secret_santa_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
    utils::DrawLocks,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
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

    // 加载配置
    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // 创建数据库连接池并运行迁移
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // 按版本导入初始数据
    if let Some(seed) = &config.seed {
        SeedService::new(pool.clone())
            .apply_seed(seed)
            .await
            .context("Failed to apply seed data")?;
    }

    // 创建服务（抽签锁在进程内唯一，所有请求共享）
    let draw_locks = Arc::new(DrawLocks::new());
    let draw_service = DrawService::new(
        pool.clone(),
        draw_locks.clone(),
        config.draw.max_attempts,
    );
    let participant_service = ParticipantService::new(pool.clone(), draw_locks);
    let event_service = EventService::new(pool.clone());
    let exclusion_service = ExclusionService::new(pool.clone());

    let admin_enabled = config.admin.enabled;
    if admin_enabled {
        log::warn!("Admin API is enabled without authentication");
    }

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(participant_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(exclusion_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api")
                    .configure(handlers::participant_config)
                    .configure(handlers::draw_config)
                    .configure(|cfg| {
                        if admin_enabled {
                            handlers::admin_config(cfg);
                        }
                    }),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
