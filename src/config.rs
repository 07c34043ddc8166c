//! 启动配置
//!
//! 世界大小和种子按优先级读取：命令行参数 > 环境变量 > 默认值
//!
//! 解析发生在日志插件安装之前，解析结果先记录在配置中，
//! 由启动系统 `SandboxConfig::log_summary` 统一输出。

use bevy::prelude::*;

use crate::voxel::{DEFAULT_WORLD_SIZE, WorldSeed};

/// 世界大小环境变量
pub const SIZE_ENV: &str = "VOXCRAFT_WORLD_SIZE";
/// 世界种子环境变量
pub const SEED_ENV: &str = "VOXCRAFT_SEED";

/// 沙盒启动配置 - 只在启动时被地形生成器读取一次
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    /// 世界半径，地形覆盖 [-world_size, world_size]²
    pub world_size: i32,
    /// 世界种子
    pub seed: WorldSeed,
    pub seed_source: SeedSource,
    /// 被拒绝的世界大小输入（已回退到默认值）
    pub rejected_size: Option<String>,
}

/// 种子来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedSource {
    #[default]
    Default,
    /// 命令行或环境变量
    Provided,
    /// 当前时间
    Clock,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            world_size: DEFAULT_WORLD_SIZE,
            seed: WorldSeed::default(),
            seed_source: SeedSource::Default,
            rejected_size: None,
        }
    }
}

impl SandboxConfig {
    /// 从进程参数和环境变量读取配置
    /// 未指定种子时使用当前时间作为随机种子
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::parse(&args, |key| std::env::var(key).ok());

        if find_value(&args, &["--seed", "-s"]).is_none() && std::env::var(SEED_ENV).is_err() {
            let random_seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(12345);
            config.seed = WorldSeed::new(random_seed);
            config.seed_source = SeedSource::Clock;
        }

        config
    }

    /// 解析参数列表，`env` 用于查询环境变量
    pub fn parse(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let size = find_value(args, &["--size", "-n"]).or_else(|| env(SIZE_ENV));
        if let Some(value) = size {
            match parse_size(&value) {
                Some(size) => config.world_size = size,
                None => config.rejected_size = Some(value),
            }
        }

        let seed = find_value(args, &["--seed", "-s"]).or_else(|| env(SEED_ENV));
        if let Some(value) = seed {
            config.seed = parse_seed(&value);
            config.seed_source = SeedSource::Provided;
        }

        config
    }

    /// 输出解析结果，需要在日志插件安装之后调用
    pub fn log_summary(&self) {
        if let Some(value) = &self.rejected_size {
            warn!(
                "Invalid world size {:?}, falling back to {}",
                value, DEFAULT_WORLD_SIZE
            );
        }
        let source = match self.seed_source {
            SeedSource::Default => "default",
            SeedSource::Provided => "provided",
            SeedSource::Clock => "random",
        };
        info!(
            "World size {}, {} seed {}",
            self.world_size, source, self.seed.seed
        );
    }
}

/// 查找 `--flag <value>` 形式的参数值
fn find_value(args: &[String], flags: &[&str]) -> Option<String> {
    args.windows(2)
        .find(|pair| flags.contains(&pair[0].as_str()))
        .map(|pair| pair[1].clone())
}

/// 世界大小必须是正整数
fn parse_size(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|size| *size > 0)
}

/// 数字种子直接使用，否则对字符串做哈希
fn parse_seed(value: &str) -> WorldSeed {
    match value.trim().parse::<u64>() {
        Ok(num) => WorldSeed::new(num),
        Err(_) => WorldSeed::from_string(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_input() {
        let config = SandboxConfig::parse(&args(&["voxcraft"]), |_| None);
        assert_eq!(config, SandboxConfig::default());
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = SandboxConfig::parse(&args(&["voxcraft", "--size", "8", "-s", "99"]), |key| {
            match key {
                SIZE_ENV => Some("30".to_string()),
                SEED_ENV => Some("1".to_string()),
                _ => None,
            }
        });
        assert_eq!(config.world_size, 8);
        assert_eq!(config.seed, WorldSeed::new(99));
    }

    #[test]
    fn test_env_used_when_no_flag() {
        let config = SandboxConfig::parse(&args(&["voxcraft"]), |key| match key {
            SIZE_ENV => Some("12".to_string()),
            SEED_ENV => Some("hello".to_string()),
            _ => None,
        });
        assert_eq!(config.world_size, 12);
        assert_eq!(config.seed, WorldSeed::from_string("hello"));
    }

    #[test]
    fn test_invalid_size_falls_back() {
        let config = SandboxConfig::parse(&args(&["voxcraft", "-n", "0"]), |_| None);
        assert_eq!(config.world_size, DEFAULT_WORLD_SIZE);
        assert_eq!(config.rejected_size.as_deref(), Some("0"));

        let config = SandboxConfig::parse(&args(&["voxcraft", "-n", "big"]), |_| None);
        assert_eq!(config.world_size, DEFAULT_WORLD_SIZE);
        assert_eq!(config.rejected_size.as_deref(), Some("big"));
    }

    #[test]
    fn test_valid_size_is_not_rejected() {
        let config = SandboxConfig::parse(&args(&["voxcraft", "--size", "5"]), |_| None);
        assert_eq!(config.rejected_size, None);
        assert_eq!(config.seed_source, SeedSource::Default);
    }

    #[test]
    fn test_seed_source_recorded() {
        let config = SandboxConfig::parse(&args(&["voxcraft", "--seed", "abc"]), |_| None);
        assert_eq!(config.seed_source, SeedSource::Provided);
    }
}
