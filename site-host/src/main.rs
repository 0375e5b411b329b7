//! # Kola Site
//!
//! 站点宿主命令行：按脚本模拟导航，输出每一步的过渡事件。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p site-host
//! cargo run -p site-host -- run /about "/@door-swing" locale:ar plain:/contact
//! cargo run -p site-host -- run --config config/site.json --frame-rate 30 -v /services
//! cargo run -p site-host -- transitions
//! cargo run -p site-host -- init-config site.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use page_transition::{Locale, TransitionKind};
use site_host::{Site, SiteConfig, demo_steps, parse_steps};
use tracing::Level;

#[derive(Parser)]
#[command(name = "kola-site")]
#[command(about = "站点宿主 - 按脚本模拟带页面过渡的导航")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 日志详细程度（-v 调试，-vv 追踪）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行导航脚本（不给步骤时执行演示脚本）
    Run {
        /// 导航步骤：`/about`、`/about@door-swing`、`plain:/contact`、`locale:ar`
        steps: Vec<String>,

        /// 站点配置文件（默认：config/site.json）
        #[arg(short, long, default_value = "config/site.json")]
        config: PathBuf,

        /// 初始语言，覆盖配置文件
        #[arg(short, long)]
        locale: Option<Locale>,

        /// 帧率，覆盖配置文件
        #[arg(long)]
        frame_rate: Option<u32>,

        /// 默认过渡效果，覆盖配置文件
        #[arg(short, long)]
        default_transition: Option<TransitionKind>,

        /// 页面挂载延迟（毫秒），覆盖配置文件
        #[arg(long)]
        mount_delay_ms: Option<u64>,

        /// 遮罩配色随机种子，覆盖配置文件
        #[arg(long)]
        seed: Option<u64>,

        /// 每步之后停留的时长（毫秒）
        #[arg(long, default_value = "200")]
        settle_ms: u64,
    },

    /// 列出所有过渡效果及时长
    Transitions,

    /// 写出默认配置文件
    InitConfig {
        /// 输出路径
        #[arg(default_value = "config/site.json")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => run(Vec::new(), RunOptions::default()),
        Some(Commands::Run {
            steps,
            config,
            locale,
            frame_rate,
            default_transition,
            mount_delay_ms,
            seed,
            settle_ms,
        }) => run(
            steps,
            RunOptions {
                config,
                locale,
                frame_rate,
                default_transition,
                mount_delay_ms,
                seed,
                settle_ms,
            },
        ),
        Some(Commands::Transitions) => {
            list_transitions();
            Ok(())
        }
        Some(Commands::InitConfig { path }) => {
            SiteConfig::default()
                .save(&path)
                .with_context(|| format!("无法写入 {}", path.display()))?;
            println!("✅ 已写出默认配置: {}", path.display());
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// `run` 子命令的覆盖项
struct RunOptions {
    config: PathBuf,
    locale: Option<Locale>,
    frame_rate: Option<u32>,
    default_transition: Option<TransitionKind>,
    mount_delay_ms: Option<u64>,
    seed: Option<u64>,
    settle_ms: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config/site.json"),
            locale: None,
            frame_rate: None,
            default_transition: None,
            mount_delay_ms: None,
            seed: None,
            settle_ms: 200,
        }
    }
}

impl RunOptions {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut SiteConfig) {
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(kind) = self.default_transition {
            config.transition.default_transition = kind;
        }
        if let Some(delay) = self.mount_delay_ms {
            config.mount_delay_ms = delay;
        }
        if let Some(seed) = self.seed {
            config.transition.overlay.seed = Some(seed);
        }
    }
}

fn run(steps: Vec<String>, options: RunOptions) -> anyhow::Result<()> {
    let steps = if steps.is_empty() {
        demo_steps()
    } else {
        parse_steps(&steps)?
    };

    let mut config = SiteConfig::load(&options.config);
    options.apply(&mut config);

    let site = Site::new(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("无法创建异步运行时")?;

    let reports = runtime.block_on(
        site.run_script(&steps, Duration::from_millis(options.settle_ms)),
    );

    for report in &reports {
        println!("▶ {}  →  {}", report.step, report.href);
        for event in &report.events {
            println!("    {event}");
        }
    }
    println!();
    println!("✅ 共执行 {} 步", reports.len());
    Ok(())
}

fn list_transitions() {
    println!("{:<14} {:>8} {:>8}", "效果", "退出(s)", "进入(s)");
    println!("{}", "-".repeat(32));
    for kind in TransitionKind::ALL {
        let spec = kind.spec();
        println!(
            "{:<14} {:>8.2} {:>8.2}",
            kind.as_str(),
            spec.exit_timing.duration,
            spec.enter_timing.duration
        );
    }
}
