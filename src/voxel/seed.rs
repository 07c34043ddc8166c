//! 世界种子与随机数生成器

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 世界种子 - 存储世界生成的随机种子
/// 使用相同的种子可以生成相同的世界（包括泥土斑块和树木分布）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSeed {
    /// 主种子值
    pub seed: u64,
}

impl WorldSeed {
    /// 从数字种子创建世界种子
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// 从字符串创建世界种子
    /// 通过简单的哈希算法将字符串转换为数字种子
    pub fn from_string(s: &str) -> Self {
        let seed = s
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        Self::new(seed)
    }

    /// 创建一个新的确定性随机数生成器
    /// 每次调用都从种子重新开始，因此两次生成结果完全一致
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self::new(12345)
    }
}
