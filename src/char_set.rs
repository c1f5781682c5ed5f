use std::{collections::BTreeSet, fmt::Display};

use tracing::trace;

use crate::{
    CharRange,
    char_range::{char_after, char_before},
    error::{Error, InvariantViolation},
};

/// 字符类, 由若干闭区间 [`CharRange`] 组成, 保持插入顺序.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<CharRange>,
}

impl Display for CharSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.any() {
            return f.pad("ε");
        }
        f.pad(
            &self
                .ranges
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl FromIterator<CharRange> for CharSet {
    fn from_iter<I: IntoIterator<Item = CharRange>>(iter: I) -> Self {
        let mut cs = CharSet::new();
        for range in iter {
            cs.add_range(range.from(), range.to());
        }
        cs
    }
}

impl CharSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 由成对的边界构造, `bounds` 为 `[from0, to0, from1, to1, ...]`.
    pub fn from_pairs(bounds: &[char]) -> Result<Self, Error> {
        if bounds.len() % 2 != 0 {
            Err(Error::OddRangeBounds(bounds.len()))?
        }
        let mut cs = CharSet::new();
        for pair in bounds.chunks_exact(2) {
            cs.add_range(pair[0], pair[1]);
        }
        Ok(cs)
    }

    #[must_use]
    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn add(&mut self, c: char) {
        self.add_range(c, c);
    }

    /// 添加一个范围, 并尝试与已有范围合并.
    ///
    /// 只有端点相等时才会合并: 已有范围的 `to` 等于新范围的 `from` 时向上扩展,
    /// 否则已有范围的 `from` 等于新范围的 `to` 时向下扩展.
    /// `a-c` 与 `d-f` 虽然相邻, 但是并不共享端点, 不会被合并.
    pub fn add_range(&mut self, from: char, to: char) {
        self.add_range_with(from, to, true);
    }

    /// 不做合并, 直接追加一个范围.
    pub fn push_range(&mut self, from: char, to: char) {
        self.add_range_with(from, to, false);
    }

    fn add_range_with(&mut self, from: char, to: char, combine: bool) {
        let new = CharRange::new(from, to);
        if combine {
            if let Some(range) = self.ranges.iter_mut().find(|r| r.to() == new.from()) {
                *range = range.with_to(new.to());
                return;
            }
            if let Some(range) = self.ranges.iter_mut().find(|r| r.from() == new.to()) {
                *range = range.with_from(new.from());
                return;
            }
        }
        self.ranges.push(new);
    }

    #[must_use]
    pub fn any(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// 返回两个集合的并集, 所有范围都会经过 [`CharSet::add_range`] 重新合并.
    #[must_use]
    pub fn union(&self, other: &CharSet) -> CharSet {
        self.ranges.iter().chain(other.ranges.iter()).copied().collect()
    }

    /// 原地并入 `other` 中尚不存在的范围.
    ///
    /// 调用方需要保证输入已经划分好: 新范围不能与已有范围共享 `from` 或者 `to`,
    /// 否则返回 [`InvariantViolation::SharedBoundary`], 并且自身不会被修改.
    pub fn union_with(&mut self, other: &CharSet) -> Result<(), Error> {
        let mut incoming: Vec<CharRange> = Vec::new();
        for range in &other.ranges {
            if self.ranges.contains(range) || incoming.contains(range) {
                continue;
            }
            if let Some(existing) = self
                .ranges
                .iter()
                .chain(incoming.iter())
                .find(|f| f.from() == range.from() || f.to() == range.to())
            {
                Err(InvariantViolation::SharedBoundary {
                    existing: *existing,
                    incoming: *range,
                })?
            }
            incoming.push(*range);
        }
        self.ranges.extend(incoming);
        Ok(())
    }

    /// 返回自身中不属于 `excluded` 的字符.
    #[must_use]
    pub fn except(&self, excluded: &CharSet) -> CharSet {
        let mut clipped = Vec::new();
        for range in &self.ranges {
            clip_range(*range, &excluded.ranges, &mut clipped);
        }
        clipped.into_iter().collect()
    }

    #[must_use]
    pub fn contains_char(&self, c: char) -> bool {
        self.ranges.iter().any(|r| r.contains(c))
    }

    /// 拆分自身的范围, 使得每个范围与 `other` 中的任何范围要么不相交, 要么不被其边界切开.
    ///
    /// `other` 的某个范围的 `from` 落在自身范围内部 (不在下界上), 或者 `to` 落在内部 (不在上界上) 时,
    /// 在该处切开. 切出来的新范围会继续与 `other` 比较, 因此一次调用就能到达相对于 `other` 的不动点.
    /// 结果去重并按顺序排列, 返回是否发生过拆分.
    pub fn distinguish_ranges(&mut self, other: &CharSet) -> bool {
        let mut changes = false;
        let mut pending = self.ranges.clone();
        let mut new_ranges = BTreeSet::new();
        while let Some(mut r) = pending.pop() {
            for r2 in &other.ranges {
                if r2.from() > r.from()
                    && r2.from() <= r.to()
                    // 一定存在, 因为 r2.from > r.from.
                    && let Some(left_to) = char_before(r2.from())
                {
                    pending.push(CharRange::new(r2.from(), r.to()));
                    r = CharRange::new(r.from(), left_to);
                    changes = true;
                }
                if r2.to() >= r.from()
                    && r2.to() < r.to()
                    && let Some(right_from) = char_after(r2.to())
                {
                    pending.push(CharRange::new(right_from, r.to()));
                    r = CharRange::new(r.from(), r2.to());
                    changes = true;
                }
            }
            new_ranges.insert(r);
        }
        self.ranges = new_ranges.into_iter().collect();
        if changes {
            trace!("distinguished against [{}]: [{}]", other, self);
        }
        changes
    }
}

/// 把 `range` 中属于 `excluded` 的部分剪掉, 剩余部分写入 `out`.
///
/// 被排除范围严格落在内部时, 左右两半分别重新对全部 `excluded` 剪裁, 因此与排除范围的顺序无关.
fn clip_range(range: CharRange, excluded: &[CharRange], out: &mut Vec<CharRange>) {
    let mut from = range.from();
    let mut to = range.to();

    for ex in excluded {
        if ex.from() <= from && ex.to() >= to {
            return;
        }

        if ex.from() > from && ex.to() < to {
            if let Some(left_to) = char_before(ex.from()) {
                clip_range(CharRange::new(from, left_to), excluded, out);
            }
            if let Some(right_from) = char_after(ex.to()) {
                clip_range(CharRange::new(right_from, to), excluded, out);
            }
            return;
        }

        if to >= ex.from() && to <= ex.to() {
            match char_before(ex.from()) {
                Some(c) => to = c,
                None => return,
            }
        }
        if from >= ex.from() && from <= ex.to() {
            match char_after(ex.to()) {
                Some(c) => from = c,
                None => return,
            }
        }
        if to < from {
            return;
        }
    }

    out.push(CharRange::new(from, to));
}
