//! 字母表细分
//!
//! 构造有穷自动机之前, 需要把所有终结符的字符类细分成公共的不相交划分,
//! 自动机在划分出来的块上转移, 而不是在单个字符上转移.

use std::{collections::BTreeSet, fmt::Display};

use tracing::debug;

use crate::{CharRange, CharSet};

/// 两两调用 [`CharSet::distinguish_ranges`], 直到没有任何集合再被拆分, 返回进行的轮数.
///
/// 每个集合也会与自身比较, 以拆开同一个字符类内部互相重叠的范围.
/// 到达不动点之后, 任意两个集合中的任意两个范围要么相同, 要么不相交.
pub fn refine_all(sets: &mut [CharSet]) -> usize {
    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut changes = false;
        for i in 0..sets.len() {
            for j in 0..sets.len() {
                let other = sets[j].clone();
                changes |= sets[i].distinguish_ranges(&other);
            }
        }
        debug!("alphabet refinement round {rounds}, changes: {changes}");
        if !changes {
            return rounds;
        }
    }
}

/// 细分之后的公共字母表, 各个块互不相交并且按顺序排列.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    blocks: Vec<CharRange>,
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: String = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{i}: {r}\n"))
            .collect();
        f.pad(s.trim_end())
    }
}

impl Alphabet {
    /// 原地细分 `sets`, 并收集所有块.
    pub fn refine(sets: &mut [CharSet]) -> Self {
        refine_all(sets);
        let blocks: BTreeSet<CharRange> = sets
            .iter()
            .flat_map(|cs| cs.ranges().iter().copied())
            .collect();
        Self {
            blocks: blocks.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[CharRange] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 包含字符 `c` 的块编号.
    #[must_use]
    pub fn block_of(&self, c: char) -> Option<usize> {
        let idx = self.blocks.partition_point(|r| r.to() < c);
        self.blocks
            .get(idx)
            .filter(|r| r.contains(c))
            .map(|_| idx)
    }

    /// 一个已经细分过的字符类所覆盖的块编号, 按顺序排列.
    ///
    /// 字符类没有参与细分时, 部分覆盖的块不会被列出.
    #[must_use]
    pub fn blocks_of(&self, cs: &CharSet) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| cs.ranges().contains(b))
            .map(|(i, _)| i)
            .collect()
    }
}
