mod config;
mod error;
mod ffi;
mod logger;
mod platform;
mod sample;

use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

use config::{ConfigSource, SampleConfig, DEFAULT_CONFIG_FILE};
use error::AppError;
use ffi::{MaaLibrary, NativeApi};
use platform::PlatformPaths;
use sample::Demo;

/// 写出默认配置模板后退出
const INIT_CONFIG_FLAG: &str = "--init-config";

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some(INIT_CONFIG_FLAG) {
        let path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        return match SampleConfig::default().write_template(&path) {
            Ok(()) => {
                println!("已写出默认配置: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::from(AppError::from(e).exit_code())
            }
        };
    }

    let config_path = first.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let (config, source) = match SampleConfig::load(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("加载配置失败: {}", e);
            return ExitCode::from(AppError::from(e).exit_code());
        }
    };

    // guard 必须活到 main 结束，否则文件日志会丢
    let _log_guard = match logger::init(&config.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("初始化日志失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match source {
        ConfigSource::File(path) => info!("加载配置文件: {}", path.display()),
        ConfigSource::Defaults(path) => info!("配置文件 {} 不存在，使用默认配置", path.display()),
    }
    debug!("生效配置: {:?}", config);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("示例运行失败: {:#}", e);
            let code = e.downcast_ref::<AppError>().map(AppError::exit_code).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(config: &SampleConfig) -> anyhow::Result<()> {
    let paths = PlatformPaths::resolve(&config.library_root);
    info!("原生库目录: {}", paths.dir().display());

    let library = MaaLibrary::load(&paths)?;
    let api = NativeApi::new(library);

    let report = Demo::new(&api, config).run().await?;
    debug!("运行报告: {}", serde_json::to_string(&report)?);

    println!("{}", report);
    Ok(())
}
