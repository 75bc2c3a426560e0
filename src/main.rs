//! 가디언 게이트웨이 메인 애플리케이션
//!
//! 설정을 읽고 사용자 저장소, 토큰 엔진, OAuth 클라이언트, 인증 세션 저장소를 조립한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use guardian_gateway::config::{AppConfig, UserStoreKind};
use guardian_gateway::core::{Clock, SystemClock};
use guardian_gateway::db::Database;
use guardian_gateway::errors::AppError;
use guardian_gateway::repositories::users::{
    InMemoryUserRepository, MongoUserRepository, UserRepository,
};
use guardian_gateway::routes::configure_all_routes;
use guardian_gateway::services::auth::{HttpOAuthClient, TokenService};
use guardian_gateway::services::sessions::{CorrelationStore, SessionService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 가디언 게이트웨이 시작중...");

    // 필수 설정이 빠졌으면 요청을 받기 전에 종료
    let config = exit_on_error(AppConfig::from_env(), "설정 로드 실패");
    info!("환경: {:?}, JWT: {:?}", config.environment, config.jwt);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let users = exit_on_error(
        initialize_user_store(&config.store, clock.clone()).await,
        "사용자 저장소 초기화 실패",
    );
    let oauth = exit_on_error(HttpOAuthClient::new(config.oauth.clone()), "OAuth 클라이언트 생성 실패");
    let tokens = Arc::new(TokenService::new(config.jwt.clone(), clock.clone()));

    let correlations = Arc::new(CorrelationStore::new(config.session.window, clock.clone()));
    let sweeper = correlations.spawn_sweeper(config.session.sweep_interval);

    let sessions = web::Data::new(SessionService::new(
        users,
        tokens,
        correlations,
        Arc::new(oauth),
        config.oauth.clone(),
        clock,
    ));

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // HTTP 서버 시작
    let result = start_http_server(&config, sessions).await;
    sweeper.stop();
    result
}

/// 기동 단계의 설정 오류는 복구할 수 없으므로 로그를 남기고 종료합니다
fn exit_on_error<T>(result: Result<T, AppError>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("{}: {}", context, e);
            std::process::exit(1);
        }
    }
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(
    config: &AppConfig,
    sessions: web::Data<SessionService>,
) -> std::io::Result<()> {
    let workers = config.server.workers;
    let bind_address = config.server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    // Rate Limiting 설정
    let per_second = config.rate_limit.per_second;
    let burst_size = config.rate_limit.burst_size;
    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
    {
        Some(conf) => conf,
        None => {
            error!("Rate Limiting 설정이 올바르지 않습니다: {:?}", config.rate_limit);
            std::process::exit(1);
        }
    };

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        per_second,
        burst_size
    );

    let cors_origins = config.oauth.cors_origins();

    HttpServer::new(move || {
        App::new()
            .app_data(sessions.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&cors_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            // 라우트 설정
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 설정된 종류의 사용자 저장소를 만듭니다
///
/// MongoDB 를 사용하는 경우 `(provider, provider_user_id)` 유니크 인덱스를 보장합니다.
async fn initialize_user_store(
    kind: &UserStoreKind,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn UserRepository>, AppError> {
    match kind {
        UserStoreKind::Mongo { uri, database } => {
            info!("📡 데이터베이스 연결 중...");
            let database = Arc::new(Database::connect(uri, database).await?);
            let repo = MongoUserRepository::new(database, clock);
            repo.create_indexes().await?;
            Ok(Arc::new(repo))
        }
        UserStoreKind::Memory => {
            info!("💾 메모리 사용자 저장소 사용 (재시작 시 초기화)");
            Ok(Arc::new(InMemoryUserRepository::new(clock)))
        }
    }
}

/// CORS 설정을 구성합니다
///
/// 허용된 프론트엔드 주소만 Origin 으로 허용합니다.
fn configure_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        // 허용할 HTTP 메서드
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        // 허용할 헤더
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .allowed_header("X-Correlation-Id")
        // 자격 증명(쿠키 등) 지원
        .supports_credentials()
        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}
