//! # xtask
//!
//! 本仓库的本地门禁：
//!
//! - `check-all`: fmt、clippy、test 依次执行，任一失败即停止
//! - `cov-core`: page-transition 的 llvm-cov 覆盖率报告
//! - `config-check [path]`: 解析并校验 config/ 下的配置文件

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use page_transition::TransitionConfig;
use site_host::SiteConfig;
use walkdir::WalkDir;

/// 过渡配置文件后缀
const TRANSITION_SUFFIX: &str = ".transition.json";
/// 站点配置文件名
const SITE_CONFIG_NAME: &str = "site.json";

/// 执行一条 cargo 子命令，非零退出视为失败
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let line = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {line}");
    let status = Command::new("cargo").args(args).status()?;
    anyhow::ensure!(status.success(), "{line} 失败（{status}）");
    Ok(())
}

fn main() -> ExitCode {
    match dispatch(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: Vec<String>) -> anyhow::Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("help");
    match sub {
        "check-all" => {
            cargo(&["fmt", "--all", "--", "--check"])?;
            cargo(&["clippy", "--workspace", "--all-targets"])?;
            cargo(&["test", "--workspace"])?;
        }
        "cov-core" => {
            if cargo(&["llvm-cov", "--version"]).is_err() {
                anyhow::bail!(
                    "需要 cargo-llvm-cov：cargo install cargo-llvm-cov && rustup component add llvm-tools-preview"
                );
            }
            cargo(&["llvm-cov", "-p", "page-transition", "--html"])?;
            eprintln!("\n报告: target/llvm-cov/html/index.html");
        }
        "config-check" => config_check(args.get(1).map(String::as_str))?,
        "help" | "-h" | "--help" => print_help(),
        other => anyhow::bail!("未知的 xtask 子命令: {other}"),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"用法: cargo run -p xtask -- <command>

  check-all             fmt、clippy、test
  cov-core              page-transition 覆盖率
  config-check [path]   校验配置，默认检查 config/

config-check 识别两类文件：
  *.transition.json     过渡配置
  site.json             站点配置（含内嵌过渡配置）
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 配置文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKind {
    Transition,
    Site,
}

impl ConfigKind {
    fn of(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(TRANSITION_SUFFIX) {
            Some(Self::Transition)
        } else if name == SITE_CONFIG_NAME {
            Some(Self::Site)
        } else {
            None
        }
    }
}

/// 执行配置检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or("config"));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
            root.display()
        );
    }

    let files = collect_config_files(&root);
    if files.is_empty() {
        eprintln!("未找到配置文件（*{TRANSITION_SUFFIX} 或 {SITE_CONFIG_NAME}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut errors = 0;
    for (file, kind) in &files {
        match check_config_file(file, *kind) {
            Ok(()) => eprintln!("[OK]    {}", file.display()),
            Err(e) => {
                eprintln!("[ERROR] {}: {}", file.display(), e);
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        eprintln!("❌ {} 个文件有错误", errors);
        anyhow::bail!("配置检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集路径下的配置文件，单个文件直接返回
fn collect_config_files(root: &Path) -> Vec<(PathBuf, ConfigKind)> {
    let mut files: Vec<(PathBuf, ConfigKind)> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.into_path();
            ConfigKind::of(&path).map(|kind| (path, kind))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

/// 解析并校验单个配置文件
fn check_config_file(file: &Path, kind: ConfigKind) -> anyhow::Result<()> {
    match kind {
        ConfigKind::Transition => TransitionConfig::read(file)?.validate()?,
        ConfigKind::Site => SiteConfig::read(file)?.validate()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_kind_by_name() {
        assert_eq!(
            ConfigKind::of(Path::new("config/default.transition.json")),
            Some(ConfigKind::Transition)
        );
        assert_eq!(
            ConfigKind::of(Path::new("config/site.json")),
            Some(ConfigKind::Site)
        );
        assert_eq!(ConfigKind::of(Path::new("config/notes.json")), None);
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(dispatch(vec!["cov-workspace".to_string()]).is_err());
        assert!(dispatch(vec!["help".to_string()]).is_ok());
    }

    #[test]
    fn test_bundled_configs_are_valid() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let files = collect_config_files(&root);
        assert!(!files.is_empty());
        for (file, kind) in &files {
            check_config_file(file, *kind).unwrap();
        }
    }
}
