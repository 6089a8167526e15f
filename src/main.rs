// ==========================================
// 专机制造排产系统 - 命令行入口
// ==========================================
// 用法:
//   machining-aps plan <snapshot.json> [--db PATH] [--profile NAME] [--stock CSV]
//   machining-aps simulate <snapshot.json> --profiles a,b [--db PATH]
//   machining-aps track <snapshot.json> <entries.json>
// 通用选项: --json-log（JSON 日志）, --lang zh-CN|en（摘要语言）, --stock CSV
// 输出: stdout 为 JSON 结果,摘要与日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use machining_aps::api::PlanningApi;
use machining_aps::config::ConfigManager;
use machining_aps::db::get_default_db_path;
use machining_aps::domain::order::TimeTrackingEntry;
use machining_aps::domain::snapshot::PlanningSnapshot;
use machining_aps::engine::report;
use machining_aps::engine::simulator::compare_to_baseline;
use machining_aps::importer::{JsonSnapshotImporter, SnapshotImporter, StockCsvImporter};
use machining_aps::logging::{self, LogFormat};
use machining_aps::{i18n, APP_NAME, VERSION};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// 专机制造排产系统 - 产能与物料规划
#[derive(Debug, Parser)]
#[command(name = "machining-aps", version, about, long_about = None)]
struct Cli {
    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_log: bool,

    /// 摘要语言（zh-CN / en）
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 按单个配置排产
    Plan {
        #[command(flatten)]
        input: InputArgs,
        /// 配置库路径（缺省为用户数据目录）
        #[arg(long = "db")]
        db_path: Option<String>,
        /// 已保存的配置名或预设名
        #[arg(long)]
        profile: Option<String>,
    },
    /// 多配置并行模拟并与首个配置对比
    Simulate {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long = "db")]
        db_path: Option<String>,
        /// 逗号分隔的配置名,首个为对比基准
        #[arg(long, value_delimiter = ',', required = true, num_args = 1..)]
        profiles: Vec<String>,
    },
    /// 计划工时与报工实际对比
    Track {
        #[command(flatten)]
        input: InputArgs,
        /// 报工记录 JSON
        entries: PathBuf,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// 排产快照 JSON
    snapshot: PathBuf,
    /// 库存盘点 CSV,覆盖快照中的库存
    #[arg(long)]
    stock: Option<PathBuf>,
}

impl InputArgs {
    async fn load(&self) -> Result<PlanningSnapshot> {
        let mut snapshot = JsonSnapshotImporter
            .load(&self.snapshot)
            .await
            .with_context(|| format!("加载快照失败: {}", self.snapshot.display()))?;

        if let Some(stock_path) = &self.stock {
            let records = StockCsvImporter
                .parse(stock_path)
                .with_context(|| format!("读取库存 CSV 失败: {}", stock_path.display()))?;
            let summary = StockCsvImporter.apply(&mut snapshot, &records);
            tracing::info!(
                updated = summary.updated,
                unmatched = summary.unmatched.len(),
                "库存已覆盖"
            );
        }
        Ok(snapshot)
    }
}

fn open_api(db_path: Option<String>) -> Result<PlanningApi<ConfigManager>> {
    let db_path = db_path.unwrap_or_else(get_default_db_path);
    tracing::info!(db = %db_path, "使用配置库");
    let config_manager =
        ConfigManager::new(&db_path).with_context(|| format!("打开配置库失败: {}", db_path))?;
    Ok(PlanningApi::new(Arc::new(config_manager)))
}

fn clean_profiles(profiles: Vec<String>) -> Vec<String> {
    profiles
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn print_summary(lines: &[String]) {
    for line in lines {
        eprintln!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with_format(if cli.json_log {
        LogFormat::Json
    } else {
        LogFormat::Text
    });
    if let Some(lang) = &cli.lang {
        if !i18n::set_locale(lang) {
            tracing::warn!(lang = %lang, supported = ?i18n::SUPPORTED_LOCALES, "不支持的语言,沿用默认");
        }
    }

    tracing::info!(app = APP_NAME, version = VERSION, "启动");

    match cli.command {
        Command::Plan {
            input,
            db_path,
            profile,
        } => {
            let snapshot = Arc::new(input.load().await?);
            let result = open_api(db_path)?.plan(snapshot, profile.as_deref()).await?;
            print_summary(&report::plan_summary(&result));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Simulate {
            input,
            db_path,
            profiles,
        } => {
            let snapshot = Arc::new(input.load().await?);
            let reports = open_api(db_path)?
                .simulate(snapshot, &clean_profiles(profiles))
                .await?;
            let deltas = compare_to_baseline(&reports);
            print_summary(&report::scenario_summary(&reports));
            print_summary(&report::delta_summary(&deltas));
            let output = json!({
                "reports": reports,
                "deltas": deltas,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Track { input, entries } => {
            let snapshot = input.load().await?;
            let text = tokio::fs::read_to_string(&entries)
                .await
                .with_context(|| format!("读取报工文件失败: {}", entries.display()))?;
            let entries: Vec<TimeTrackingEntry> =
                serde_json::from_str(&text).context("报工文件解析失败")?;

            let engine = machining_aps::engine::TrackingEngine::new();
            let tracking = engine.plan_vs_actual(&snapshot.orders, &entries);
            print_summary(&report::tracking_summary(&tracking));
            println!("{}", serde_json::to_string_pretty(&tracking)?);
        }
    }

    Ok(())
}
